//! Drawings sheet: maps the sensor configuration to a drawing index.

use super::sensor::CONFIGURATION;
use super::{SheetStyles, SheetWriter};
use crate::config::{DRAWINGS_SHEET, SENSOR_CONFIGURATIONS};
use crate::error::Result;
use crate::generator::QuoteDocumentGenerator;
use crate::model::{CellRef, CellValue};
use rust_xlsxwriter::Worksheet;

/// Row (1-based) of the first configuration label; its drawing index equals its row.
const FIRST_OPTION_ROW: u32 = 3;

/// Nested IF formula computed in `Drawings!B1`.
pub fn drawing_formula() -> String {
    let mut formula = String::from("0");
    for (i, _) in SENSOR_CONFIGURATIONS.iter().enumerate().rev() {
        let row = FIRST_OPTION_ROW + i as u32;
        let option = CellRef::at('A', row).on(DRAWINGS_SHEET);
        formula = format!("IF({}={},{},{})", CONFIGURATION, option, row, formula);
    }
    format!("={}", formula)
}

/// Value the drawing formula evaluates to for `configuration`.
///
/// Excel text comparison ignores case, so this does too. Unknown labels give 0.
pub fn drawing_index(configuration: &str) -> u32 {
    SENSOR_CONFIGURATIONS
        .iter()
        .position(|option| option.eq_ignore_ascii_case(configuration))
        .map_or(0, |i| FIRST_OPTION_ROW + i as u32)
}

impl QuoteDocumentGenerator<'_> {
    pub(crate) fn build_drawings_sheet(
        &self,
        sheet: &mut Worksheet,
        styles: &SheetStyles,
    ) -> Result<()> {
        let mut w = SheetWriter::new(sheet);

        for (i, option) in SENSOR_CONFIGURATIONS.iter().enumerate() {
            w.put(CellRef::at('A', FIRST_OPTION_ROW + i as u32), *option)?;
        }
        w.put_styled(
            CellRef::at('B', 1),
            CellValue::formula(drawing_formula()),
            &styles.value,
        )?;
        w.width('A', 25.0)?;

        tracing::debug!(
            configuration = %self.spec().sensor_configuration,
            drawing = drawing_index(&self.spec().sensor_configuration),
            "Drawing selected"
        );
        Ok(())
    }
}
