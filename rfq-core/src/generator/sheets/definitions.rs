//! Definitions sheet: lookup lists backing the fiber sheet.

use super::{SheetStyles, SheetWriter};
use crate::config::CatalogValue;
use crate::error::Result;
use crate::generator::QuoteDocumentGenerator;
use crate::model::{CellRef, CellValue};
use rust_xlsxwriter::Worksheet;

const CATALOG_HEADERS: [&str; 7] = [
    "Fiber Type",
    "Core Type",
    "Mode Field",
    "Fiber Cladding",
    "Coating",
    "Manufacturer",
    "ITU-T",
];

impl From<CatalogValue> for CellValue {
    fn from(value: CatalogValue) -> Self {
        match value {
            CatalogValue::Number(n) => CellValue::Number(n),
            CatalogValue::Text(s) => CellValue::Text(s),
        }
    }
}

impl QuoteDocumentGenerator<'_> {
    pub(crate) fn build_definitions_sheet(
        &self,
        sheet: &mut Worksheet,
        styles: &SheetStyles,
    ) -> Result<()> {
        let catalog = &self.config().catalog;
        let mut w = SheetWriter::new(sheet);

        let lists: [(char, &str, &[String]); 3] = [
            ('A', "Contact", &catalog.contacts),
            ('K', "Provided", &catalog.provided_by),
            ('M', "FemtoPlus", &catalog.femto_plus),
        ];
        for (col, title, entries) in lists {
            w.put_styled(CellRef::at(col, 1), title, &styles.heading)?;
            for (i, entry) in entries.iter().enumerate() {
                w.put(CellRef::at(col, 2 + i as u32), entry.as_str())?;
            }
        }

        w.put_row(CellRef::at('C', 1), CATALOG_HEADERS, Some(&styles.heading))?;
        for (i, fiber) in catalog.fiber_types.iter().enumerate() {
            w.put_row(CellRef::at('C', 2 + i as u32), fiber.cells(), None)?;
        }

        for (col, width) in [
            ('C', 25.0),
            ('D', 15.0),
            ('E', 12.0),
            ('F', 15.0),
            ('G', 12.0),
            ('H', 15.0),
            ('I', 12.0),
        ] {
            w.width(col, width)?;
        }

        Ok(())
    }
}
