//! Minimal PDF typesetting: flow layout over the base-14 Helvetica faces.

mod layout;
mod metrics;
mod writer;

pub use layout::{
    paginate, Align, DrawOp, Flowable, Page, PageGeometry, Paragraph, ParagraphStyle, Region,
    Rgb, Run, Table, TableCommand, TableStyle, VAlign, MM,
};
pub use metrics::{encode_win_ansi, unmappable_chars, Font};
pub use writer::{write_pdf, DocumentInfo};
