//! Integration tests for quote document generation.
//!
//! Workbooks are read back with calamine and PDFs with lopdf, so these tests
//! check what a reader of the files sees rather than the builder internals.

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rfq_core::{
    generate_quote_documents_on, ErrorKind, GeneratedDocuments, QuoteConfig, QuoteError,
    SpecFields,
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type Workbook = Xlsx<BufReader<File>>;

const FIXTURE: &str = "tests/fixtures/nrl_specs.json";
const OFFER: &str = "41260018";

fn fixture() -> SpecFields {
    SpecFields::from_json_file(Path::new(FIXTURE)).expect("fixture should load")
}

fn quote_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn generate(fields: &SpecFields, dir: &Path) -> rfq_core::Result<GeneratedDocuments> {
    generate_quote_documents_on(fields, dir, OFFER, &QuoteConfig::default(), quote_date())
}

fn open(path: &Path) -> Workbook {
    open_workbook(path).expect("workbook should open")
}

/// Cell value by A1-style column letter and 1-based row.
fn value(workbook: &mut Workbook, sheet: &str, cell: (char, u32)) -> Data {
    let range = workbook.worksheet_range(sheet).expect("sheet should exist");
    let col = cell.0 as u32 - 'A' as u32;
    range
        .get_value((cell.1 - 1, col))
        .cloned()
        .unwrap_or(Data::Empty)
}

/// Formula text (without `=`) by column letter and 1-based row.
fn formula(workbook: &mut Workbook, sheet: &str, cell: (char, u32)) -> String {
    let range = workbook.worksheet_formula(sheet).expect("sheet should exist");
    let col = cell.0 as u32 - 'A' as u32;
    range
        .get_value((cell.1 - 1, col))
        .cloned()
        .unwrap_or_default()
}

fn pdf_text(path: &Path) -> String {
    let doc = lopdf::Document::load(path).expect("pdf should load");
    let mut text = String::new();
    for page_id in doc.get_pages().values() {
        let content = doc.get_page_content(*page_id).expect("page content");
        text.push_str(&String::from_utf8_lossy(&content));
    }
    text
}

// ==================== Output files ====================

#[test]
fn test_generates_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("output");

    let docs = generate(&fixture(), &output).unwrap();

    assert_eq!(docs.excel, output.join("41260018_NRL.xlsx"));
    assert_eq!(docs.pdf, output.join("41260018_NRL.pdf"));
    assert!(std::fs::metadata(&docs.excel).unwrap().len() > 0);
    assert!(std::fs::metadata(&docs.pdf).unwrap().len() > 0);
}

#[test]
fn test_regeneration_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let first = generate(&fixture(), dir.path()).unwrap();
    let second = generate(&fixture(), dir.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_identical_inputs_give_identical_bytes() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let first = generate(&fixture(), a.path()).unwrap();
    let second = generate(&fixture(), b.path()).unwrap();

    assert_eq!(
        std::fs::read(&first.excel).unwrap(),
        std::fs::read(&second.excel).unwrap()
    );
    assert_eq!(
        std::fs::read(&first.pdf).unwrap(),
        std::fs::read(&second.pdf).unwrap()
    );
}

// ==================== Workbook contents ====================

#[test]
fn test_sheet_order() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let workbook = open(&docs.excel);
    assert_eq!(
        workbook.sheet_names(),
        vec![
            "Fiber Specification",
            "Sensor Specification",
            "Definitions",
            "Drawings"
        ]
    );
}

#[test]
fn test_sensor_sheet_values() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    let sheet = "Sensor Specification";

    assert_eq!(value(&mut wb, sheet, ('C', 5)), Data::Float(41260018.0));
    assert_eq!(value(&mut wb, sheet, ('F', 5)), Data::String("NRL".into()));
    assert_eq!(value(&mut wb, sheet, ('F', 6)), Data::Float(10.0));
    assert_eq!(value(&mut wb, sheet, ('A', 18)), Data::String("Fiber Only".into()));
    assert_eq!(value(&mut wb, sheet, ('C', 18)), Data::Float(10050.0));

    // Nominal and tolerance rows
    assert_eq!(value(&mut wb, sheet, ('B', 27)), Data::String("-".into()));
    assert_eq!(value(&mut wb, sheet, ('C', 27)), Data::Float(0.1));
    assert_eq!(value(&mut wb, sheet, ('E', 27)), Data::Float(8.0));
    assert_eq!(value(&mut wb, sheet, ('G', 27)), Data::String("Yes".into()));
    assert_eq!(value(&mut wb, sheet, ('C', 28)), Data::Float(0.04));
    assert_eq!(value(&mut wb, sheet, ('E', 29)), Data::String("-".into()));
    assert_eq!(value(&mut wb, sheet, ('F', 29)), Data::Float(2.0));

    // Wavelength table
    assert_eq!(value(&mut wb, sheet, ('A', 38)), Data::String("FBG1".into()));
    assert_eq!(value(&mut wb, sheet, ('B', 38)), Data::Float(1550.39));
    assert_eq!(value(&mut wb, sheet, ('C', 38)), Data::Float(5000.0));
    assert_eq!(value(&mut wb, sheet, ('D', 38)), Data::Float(5050.0));
    assert_eq!(value(&mut wb, sheet, ('E', 38)), Data::String("-".into()));
    assert_eq!(value(&mut wb, sheet, ('A', 39)), Data::String("FBG2".into()));
    assert_eq!(value(&mut wb, sheet, ('C', 39)), Data::Float(5050.0));
    assert_eq!(value(&mut wb, sheet, ('D', 39)), Data::Float(5000.0));
    assert_eq!(value(&mut wb, sheet, ('E', 39)), Data::Float(50.0));
    assert_eq!(value(&mut wb, sheet, ('A', 40)), Data::Empty);

    // Auto-fill panel
    assert_eq!(value(&mut wb, sheet, ('H', 40)), Data::Float(2.0));
    assert_eq!(value(&mut wb, sheet, ('H', 50)), Data::Float(1550.39));
}

#[test]
fn test_fiber_sheet_links_to_sensor_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    let sheet = "Fiber Specification";

    assert_eq!(formula(&mut wb, sheet, ('F', 4)), "'Sensor Specification'!F4");
    assert_eq!(formula(&mut wb, sheet, ('C', 5)), "'Sensor Specification'!C5");
    assert_eq!(formula(&mut wb, sheet, ('C', 18)), "'Sensor Specification'!C27");
    assert_eq!(formula(&mut wb, sheet, ('F', 20)), "'Sensor Specification'!F29");
    assert_eq!(formula(&mut wb, sheet, ('C', 27)), "'Sensor Specification'!C34");
    assert_eq!(
        formula(&mut wb, sheet, ('B', 14)),
        "VLOOKUP($A$14,Definitions!C2:I16,2,0)"
    );
    assert_eq!(
        formula(&mut wb, sheet, ('C', 14)),
        "VLOOKUP($A$14,Definitions!C2:I16,7,0)"
    );
    assert_eq!(
        formula(&mut wb, sheet, ('A', 31)),
        "IF(ISBLANK('Sensor Specification'!A38),\"\",'Sensor Specification'!A38)"
    );
    assert_eq!(
        formula(&mut wb, sheet, ('D', 50)),
        "IF(ISNUMBER('Sensor Specification'!D57),'Sensor Specification'!D57,\"\")"
    );
    assert_eq!(
        formula(&mut wb, sheet, ('E', 32)),
        "IF(ISNUMBER(C32),C32-C31,\"\")"
    );

    assert_eq!(value(&mut wb, sheet, ('A', 14)), Data::String("SM1330-E9/125PI".into()));
    assert_eq!(value(&mut wb, sheet, ('E', 31)), Data::String("-".into()));
    assert_eq!(value(&mut wb, sheet, ('H', 18)), Data::String("yes".into()));
}

#[test]
fn test_definitions_and_drawings() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let mut wb = open(&docs.excel);

    assert_eq!(value(&mut wb, "Definitions", ('A', 1)), Data::String("Contact".into()));
    assert_eq!(value(&mut wb, "Definitions", ('A', 10)), Data::String("Hoffmann".into()));
    assert_eq!(value(&mut wb, "Definitions", ('C', 4)), Data::String("SM1330-E9/125PI".into()));
    assert_eq!(value(&mut wb, "Definitions", ('E', 2)), Data::Float(10.4));
    assert_eq!(
        value(&mut wb, "Definitions", ('C', 16)),
        Data::String("Other (see Remarks)".into())
    );
    assert_eq!(value(&mut wb, "Definitions", ('K', 3)), Data::String("customer".into()));

    assert_eq!(value(&mut wb, "Drawings", ('A', 5)), Data::String("Fiber Only".into()));
    insta::assert_snapshot!(
        formula(&mut wb, "Drawings", ('B', 1)),
        @"IF('Sensor Specification'!A18=Drawings!A3,3,IF('Sensor Specification'!A18=Drawings!A4,4,IF('Sensor Specification'!A18=Drawings!A5,5,IF('Sensor Specification'!A18=Drawings!A6,6,0))))"
    );
}

#[test]
fn test_unknown_fiber_type_still_generates() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Fiber Type", "Hollow Core Prototype");

    let docs = generate(&fields, dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    assert_eq!(
        value(&mut wb, "Fiber Specification", ('A', 14)),
        Data::String("Hollow Core Prototype".into())
    );
}

#[test]
fn test_more_gratings_than_default_wavelengths() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Number of FBGs", "4");
    fields.insert("FBG 3 Wavelength", "1560.39 nm");

    let docs = generate(&fields, dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    let sheet = "Sensor Specification";
    assert_eq!(value(&mut wb, sheet, ('B', 40)), Data::Float(1560.39));
    assert_eq!(value(&mut wb, sheet, ('B', 41)), Data::String("-".into()));
    assert_eq!(value(&mut wb, sheet, ('C', 41)), Data::Float(5150.0));
    assert_eq!(value(&mut wb, sheet, ('D', 41)), Data::Float(4900.0));
}

#[test]
fn test_empty_grating_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Number of FBGs", "0");

    let docs = generate(&fields, dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    let sheet = "Sensor Specification";
    assert_eq!(value(&mut wb, sheet, ('A', 38)), Data::Empty);
    assert_eq!(value(&mut wb, sheet, ('H', 40)), Data::Float(0.0));
    assert_eq!(value(&mut wb, sheet, ('H', 50)), Data::Float(1550.39));
    assert!(pdf_text(&docs.pdf).contains("10x Conn. 0FBG arrays"));
}

#[test]
fn test_gratings_beyond_linked_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Number of FBGs", "25");

    let docs = generate(&fields, dir.path()).unwrap();
    let mut wb = open(&docs.excel);
    let sensor = "Sensor Specification";
    assert_eq!(value(&mut wb, sensor, ('A', 62)), Data::String("FBG25".into()));
    assert_eq!(value(&mut wb, sensor, ('C', 62)), Data::Float(6200.0));
    assert_eq!(value(&mut wb, sensor, ('D', 62)), Data::Float(3850.0));

    let fiber = "Fiber Specification";
    assert_eq!(
        formula(&mut wb, fiber, ('A', 50)),
        "IF(ISBLANK('Sensor Specification'!A57),\"\",'Sensor Specification'!A57)"
    );
    assert_eq!(formula(&mut wb, fiber, ('A', 51)), "");
}

// ==================== PDF contents ====================

#[test]
fn test_pdf_contents() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let text = pdf_text(&docs.pdf);

    assert!(text.contains("Offer No. 41260018"));
    assert!(text.contains("Dear NRL,"));
    assert!(text.contains("10x Conn. 2FBG arrays"));
    assert!(text.contains("220.6400"));
    assert!(text.contains("2,206.40"));
    assert!(text.contains("2,266.40"));
    assert!(text.contains("02.03.2026"));
    assert!(text.contains("Incoterms 2020: EXW"));
}

#[test]
fn test_profile_overrides_pricing_and_agent() {
    let dir = tempfile::tempdir().unwrap();
    let profile = dir.path().join("profile.json");
    std::fs::write(
        &profile,
        r#"{"pricing": {"unit_price": 199.5, "quantity": 4}, "defaults": {"agent": "J. Doe"}}"#,
    )
    .unwrap();

    let config = QuoteConfig::from_json_file(&profile).unwrap();
    let output = dir.path().join("out");
    let docs =
        generate_quote_documents_on(&fixture(), &output, OFFER, &config, quote_date()).unwrap();
    let text = pdf_text(&docs.pdf);

    assert!(text.contains("4x Conn. 2FBG arrays"));
    assert!(text.contains("199.5000"));
    assert!(text.contains("798.00"));
    assert!(text.contains("J. Doe"));
}

// ==================== Failures ====================

#[test]
fn test_malformed_value_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Reflectivity", "high");

    let err = generate(&fields, dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(matches!(err, QuoteError::Format { ref field, .. } if field == "Reflectivity"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unparsable_fbg_count_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Number of FBGs", "two");

    let err = generate(&fields, dir.path()).unwrap_err();
    assert!(err.is_format());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_overflowing_spacing_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("FBG Spacing", "9223372036854775807 mm");

    let err = generate(&fields, dir.path()).unwrap_err();
    assert!(matches!(err, QuoteError::Format { ref field, .. } if field == "FBG Spacing"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_negative_fbg_count() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = fixture();
    fields.insert("Number of FBGs", "-2");

    let err = generate(&fields, dir.path()).unwrap_err();
    assert!(matches!(err, QuoteError::FbgCount { count: -2, .. }));
    assert!(err.is_format());
}

#[test]
fn test_non_numeric_offer_number() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate_quote_documents_on(
        &fixture(),
        dir.path(),
        "Q-2026-18",
        &QuoteConfig::default(),
        quote_date(),
    )
    .unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_output_dir_blocked_by_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("output");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = generate(&fixture(), &blocker).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, QuoteError::CreateDir { .. }));
}

#[test]
fn test_failed_pdf_write_removes_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("41260018_NRL.pdf");
    std::fs::create_dir(&pdf_path).unwrap();

    let err = generate(&fixture(), dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, QuoteError::Write { ref path, .. } if *path == pdf_path));

    assert!(!dir.path().join("41260018_NRL.xlsx").exists());
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries, vec![pdf_path]);
}

#[test]
fn test_failed_generation_keeps_previous_documents() {
    let dir = tempfile::tempdir().unwrap();
    let docs = generate(&fixture(), dir.path()).unwrap();
    let previous = std::fs::read(&docs.excel).unwrap();

    let mut fields = fixture();
    fields.insert("Quantity", "many");
    assert!(generate(&fields, dir.path()).is_err());

    assert_eq!(std::fs::read(&docs.excel).unwrap(), previous);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}
