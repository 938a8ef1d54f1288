//! Worksheet builders for the specification workbook.

mod definitions;
mod drawings;
mod fiber;
mod sensor;

pub use drawings::{drawing_formula, drawing_index};
pub use fiber::{linked_wavelength_row, lookup_formula};

use crate::error::Result;
use crate::model::{CellRef, CellValue};
use rust_xlsxwriter::{Color, Format, FormatBorder, Worksheet};

/// Formats shared by all sheets.
pub(crate) struct SheetStyles {
    /// Shaded section title.
    pub section: Format,
    /// Bold column title on the definitions sheet.
    pub heading: Format,
    pub label: Format,
    pub value: Format,
    pub label_boxed: Format,
    pub value_boxed: Format,
    /// Small grey company line at the top of a sheet.
    pub banner: Format,
}

impl SheetStyles {
    pub fn new() -> Self {
        let label = Format::new().set_font_size(10);
        let value = Format::new().set_font_size(10).set_bold();

        Self {
            section: Format::new()
                .set_bold()
                .set_font_size(11)
                .set_background_color(Color::RGB(0xDAEEF3)),
            heading: Format::new().set_bold().set_font_size(11),
            label_boxed: label.clone().set_border(FormatBorder::Thin),
            value_boxed: value.clone().set_border(FormatBorder::Thin),
            label,
            value,
            banner: Format::new()
                .set_font_size(9)
                .set_font_color(Color::RGB(0x666666)),
        }
    }
}

/// Thin wrapper writing [`CellValue`]s at [`CellRef`] addresses.
pub(crate) struct SheetWriter<'w> {
    sheet: &'w mut Worksheet,
}

impl<'w> SheetWriter<'w> {
    pub fn new(sheet: &'w mut Worksheet) -> Self {
        Self { sheet }
    }

    /// Write an unformatted value.
    pub fn put(&mut self, cell: CellRef, value: impl Into<CellValue>) -> Result<()> {
        self.write(cell, value.into(), None)
    }

    /// Write a value with a format.
    pub fn put_styled(
        &mut self,
        cell: CellRef,
        value: impl Into<CellValue>,
        format: &Format,
    ) -> Result<()> {
        self.write(cell, value.into(), Some(format))
    }

    /// Write values left to right starting at `start`.
    pub fn put_row<I, V>(
        &mut self,
        start: CellRef,
        values: I,
        format: Option<&Format>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        for (offset, value) in values.into_iter().enumerate() {
            self.write(start.right(offset as u16), value.into(), format)?;
        }
        Ok(())
    }

    /// Set the width of a column given by letter.
    pub fn width(&mut self, col: char, width: f64) -> Result<()> {
        self.sheet.set_column_width(CellRef::at(col, 1).col, width)?;
        Ok(())
    }

    fn write(&mut self, cell: CellRef, value: CellValue, format: Option<&Format>) -> Result<()> {
        let (row, col) = (cell.row, cell.col);
        match (value, format) {
            (CellValue::Number(n), Some(f)) => {
                self.sheet.write_number_with_format(row, col, n, f)?;
            }
            (CellValue::Number(n), None) => {
                self.sheet.write_number(row, col, n)?;
            }
            // Empty headers only carry their border.
            (CellValue::Text(s), Some(f)) if s.is_empty() => {
                self.sheet.write_blank(row, col, f)?;
            }
            (CellValue::Text(s), _) if s.is_empty() => {}
            (CellValue::Text(s), Some(f)) => {
                self.sheet.write_string_with_format(row, col, s.as_str(), f)?;
            }
            (CellValue::Text(s), None) => {
                self.sheet.write_string(row, col, s.as_str())?;
            }
            (CellValue::Formula(s), Some(f)) => {
                self.sheet.write_formula_with_format(row, col, s.as_str(), f)?;
            }
            (CellValue::Formula(s), None) => {
                self.sheet.write_formula(row, col, s.as_str())?;
            }
        }
        Ok(())
    }
}
