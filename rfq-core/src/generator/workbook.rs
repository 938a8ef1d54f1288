//! Assemble the four sheets into an xlsx buffer.

use super::sheets::SheetStyles;
use super::QuoteDocumentGenerator;
use crate::config::{DEFINITIONS_SHEET, DRAWINGS_SHEET, FIBER_SHEET, SENSOR_SHEET};
use crate::error::Result;
use chrono::Datelike;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, Worksheet};

impl QuoteDocumentGenerator<'_> {
    /// Render the specification workbook in memory.
    ///
    /// Sheet order is Fiber, Sensor, Definitions, Drawings. The document
    /// creation time is the quote date, so equal inputs give equal bytes.
    pub fn render_spreadsheet(&self) -> Result<Vec<u8>> {
        let styles = SheetStyles::new();
        let mut workbook = Workbook::new();

        let date = self.date();
        let created =
            ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
        let properties = DocProperties::new()
            .set_title(&format!("Specification {}", self.offer_number()))
            .set_company(&self.config().company.name)
            .set_creation_datetime(&created);
        workbook.set_properties(&properties);

        let mut fiber = Worksheet::new();
        fiber.set_name(FIBER_SHEET)?;
        self.build_fiber_sheet(&mut fiber, &styles)?;

        let mut sensor = Worksheet::new();
        sensor.set_name(SENSOR_SHEET)?;
        self.build_sensor_sheet(&mut sensor, &styles)?;

        let mut definitions = Worksheet::new();
        definitions.set_name(DEFINITIONS_SHEET)?;
        self.build_definitions_sheet(&mut definitions, &styles)?;

        let mut drawings = Worksheet::new();
        drawings.set_name(DRAWINGS_SHEET)?;
        self.build_drawings_sheet(&mut drawings, &styles)?;

        for sheet in [fiber, sensor, definitions, drawings] {
            workbook.push_worksheet(sheet);
        }

        let buffer = workbook.save_to_buffer()?;
        tracing::debug!(
            offer = %self.offer_number(),
            fbgs = self.spec().fbg_count(),
            bytes = buffer.len(),
            "Rendered workbook"
        );
        Ok(buffer)
    }
}
