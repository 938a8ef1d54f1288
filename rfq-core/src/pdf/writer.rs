//! Serialize laid-out pages with lopdf.

use super::layout::{DrawOp, Page, PageGeometry, Rgb};
use super::metrics::{encode_win_ansi, Font};
use crate::error::Result;
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// Document information dictionary entries.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    /// Written as the creation date; no wall-clock time enters the file.
    pub date: NaiveDate,
}

/// Write `pages` to PDF bytes.
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry, info: &DocumentInfo) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in [Font::Helvetica, Font::HelveticaBold] {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(geometry.width),
        Object::Real(geometry.height),
    ];

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&info.title)),
        "Author" => Object::string_literal(encode_win_ansi(&info.author)),
        "Producer" => Object::string_literal(concat!("rfq-core ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(info.date.format("D:%Y%m%d000000").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![color.0.into(), color.1.into(), color.2.into()]
}

/// Content stream operators for one page.
fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("rg", color_operands(*fill)));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("RG", color_operands(*color)));
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
                ops.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                font,
                size,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        Page {
            ops: vec![
                DrawOp::Rect {
                    x: 10.0,
                    y: 10.0,
                    width: 50.0,
                    height: 20.0,
                    fill: Rgb::grey(0.9),
                },
                DrawOp::Text {
                    x: 12.0,
                    y: 15.0,
                    font: Font::HelveticaBold,
                    size: 9.0,
                    color: Rgb::BLACK,
                    text: "Offer No. 1".into(),
                },
            ],
        }
    }

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Offer No. 1".into(),
            author: "Test".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_written_pdf_loads_back() {
        let geometry = PageGeometry::a4(20.0);
        let bytes = write_pdf(&[sample_page(), Page::default()], &geometry, &info()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_output_is_deterministic() {
        let geometry = PageGeometry::a4(20.0);
        let first = write_pdf(&[sample_page()], &geometry, &info()).unwrap();
        let second = write_pdf(&[sample_page()], &geometry, &info()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_text_operators() {
        let ops = page_operations(&sample_page());
        let names: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(
            names,
            vec!["q", "rg", "re", "f", "Q", "BT", "Tf", "rg", "Td", "Tj", "ET"]
        );
    }
}
