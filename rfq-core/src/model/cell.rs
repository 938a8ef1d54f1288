//! Cell addresses and values shared by the literal and formula-linked sheets.

use rust_xlsxwriter::utility::column_number_to_name;
use std::fmt;

/// Address of a worksheet cell, optionally qualified by its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u16,
    sheet: Option<&'static str>,
}

impl CellRef {
    /// Cell by column letter and 1-based row, as written in A1 notation.
    pub const fn at(col: char, row: u32) -> Self {
        Self {
            row: row - 1,
            col: (col as u32 - 'A' as u32) as u16,
            sheet: None,
        }
    }

    /// Qualify this cell with a sheet name.
    pub const fn on(self, sheet: &'static str) -> Self {
        Self {
            sheet: Some(sheet),
            ..self
        }
    }

    /// Same column, `rows` further down.
    pub const fn down(self, rows: u32) -> Self {
        Self {
            row: self.row + rows,
            ..self
        }
    }

    /// Same row, `cols` further right.
    pub const fn right(self, cols: u16) -> Self {
        Self {
            col: self.col + cols,
            ..self
        }
    }

    /// Unqualified A1 address (`C27`).
    pub fn a1(&self) -> String {
        format!("{}{}", column_number_to_name(self.col), self.row + 1)
    }

    /// Unqualified absolute address (`$A$14`).
    pub fn absolute(&self) -> String {
        format!("${}${}", column_number_to_name(self.col), self.row + 1)
    }

    /// Formula that mirrors this cell (`='Sensor Specification'!C27`).
    pub fn link(&self) -> String {
        format!("={}", self)
    }

    /// Qualified range from this cell to `end` (`Definitions!C2:I16`).
    pub fn range_to(&self, end: CellRef) -> String {
        match self.sheet {
            Some(sheet) => format!("{}!{}:{}", quote_sheet_name(sheet), self.a1(), end.a1()),
            None => format!("{}:{}", self.a1(), end.a1()),
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sheet {
            Some(sheet) => write!(f, "{}!{}", quote_sheet_name(sheet), self.a1()),
            None => write!(f, "{}", self.a1()),
        }
    }
}

/// Quote a sheet name for use in a formula when it is not a plain identifier.
fn quote_sheet_name(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// Content of a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Formula text including the leading `=`.
    Formula(String),
}

impl CellValue {
    /// A formula cell.
    pub fn formula(text: impl Into<String>) -> Self {
        CellValue::Formula(text.into())
    }

    /// Number when present, else the `-` placeholder used by the template.
    pub fn number_or_dash(value: Option<f64>) -> Self {
        value.map_or_else(|| CellValue::from("-"), CellValue::Number)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}
