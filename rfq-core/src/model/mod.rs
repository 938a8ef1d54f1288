//! Data model for the quote documents.

mod cell;
mod fbg;

pub use cell::{CellRef, CellValue};
pub use fbg::{FbgLayout, FbgRecord, FbgSpacing};
