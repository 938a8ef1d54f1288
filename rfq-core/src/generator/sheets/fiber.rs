//! Fiber sheet: mirrors the sensor sheet through formulas.

use super::sensor::{self, FBG_HEADERS, WAVELENGTH_HEADERS};
use super::{SheetStyles, SheetWriter};
use crate::config::{FiberCatalog, DEFINITIONS_SHEET, FIBER_TABLE_FIRST_ROW, LINKED_FBG_ROWS};
use crate::error::Result;
use crate::generator::QuoteDocumentGenerator;
use crate::model::{CellRef, CellValue};
use rust_xlsxwriter::Worksheet;

/// Fiber type cell that drives the catalog lookups.
const FIBER_TYPE: CellRef = CellRef::at('A', 14);

/// Lookup columns (1-based, within the catalog range) for B14..F14:
/// core type, ITU-T, cladding, coating, manufacturer.
const LOOKUP_COLUMNS: [u32; 5] = [2, 7, 4, 5, 6];

const FIBER_HEADERS: [&str; 8] = [
    "Fiber Type",
    "Fiber Core Type",
    "ITU-T",
    "Fiber Cladding Diameter (µm)",
    "Fiber Coating Material",
    "Fiber Manufacturer",
    "",
    "Fiber Provided By",
];

const ADDITIONAL_HEADERS: [&str; 8] = [
    "Spectrum Datasheet",
    "Label",
    "Total Fiber Length (mm)",
    "Simplified Packaging",
    "Tolerance FBG Spacing (%)",
    "FBG Marking",
    "",
    "Fiber Input Marking",
];

/// Exact-match VLOOKUP of the fiber type into column `column` of the catalog.
pub fn lookup_formula(catalog: &FiberCatalog, column: u32) -> String {
    let last_row = catalog.fiber_types.len().max(1) as u32 + 1;
    let range = CellRef::at('C', 2)
        .on(DEFINITIONS_SHEET)
        .range_to(CellRef::at('I', last_row));
    format!(
        "=VLOOKUP({},{},{},0)",
        FIBER_TYPE.absolute(),
        range,
        column
    )
}

/// Formulas of the fiber wavelength table row `index` (0-based).
///
/// Columns A..D copy the sensor table when the source cell holds a value; the
/// spacing column is computed from adjacent positions, with `-` on the first row.
pub fn linked_wavelength_row(index: u32) -> [CellValue; 5] {
    let source = sensor::WAVELENGTH_TABLE.down(index);
    let position = CellRef::at('C', FIBER_TABLE_FIRST_ROW + index);

    let name = CellValue::formula(format!("=IF(ISBLANK({0}),\"\",{0})", source));
    let numeric = |col: u16| {
        CellValue::formula(format!(
            "=IF(ISNUMBER({0}),{0},\"\")",
            source.right(col)
        ))
    };
    let spacing = if index == 0 {
        CellValue::from("-")
    } else {
        let previous = CellRef::at('C', FIBER_TABLE_FIRST_ROW + index - 1);
        CellValue::formula(format!(
            "=IF(ISNUMBER({0}),{0}-{1},\"\")",
            position, previous
        ))
    };

    [name, numeric(1), numeric(2), numeric(3), spacing]
}

impl QuoteDocumentGenerator<'_> {
    pub(crate) fn build_fiber_sheet(
        &self,
        sheet: &mut Worksheet,
        styles: &SheetStyles,
    ) -> Result<()> {
        let spec = self.spec();
        let config = self.config();
        let mut w = SheetWriter::new(sheet);

        w.put_styled(
            CellRef::at('A', 2),
            config.company.fiber_sheet_banner.as_str(),
            &styles.banner,
        )?;
        w.put_styled(
            CellRef::at('H', 2),
            config.defaults.template_version.as_str(),
            &styles.banner,
        )?;

        // Production header, linked to the sensor sheet
        w.put_styled(CellRef::at('A', 4), "Production Sheet Number:", &styles.label)?;
        w.put_styled(CellRef::at('E', 4), "Position:", &styles.label)?;
        w.put(CellRef::at('F', 4), CellValue::formula(sensor::POSITION.link()))?;
        w.put_styled(CellRef::at('G', 4), "of:", &styles.label)?;
        w.put(CellRef::at('H', 4), CellValue::formula(sensor::POSITION_OF.link()))?;

        w.put_styled(CellRef::at('A', 5), "Offer Number:", &styles.label)?;
        w.put_styled(
            CellRef::at('C', 5),
            CellValue::formula(sensor::OFFER_NUMBER.link()),
            &styles.value,
        )?;
        w.put_styled(CellRef::at('E', 5), "Customer:", &styles.label)?;
        w.put_styled(
            CellRef::at('F', 5),
            CellValue::formula(sensor::CUSTOMER.link()),
            &styles.value,
        )?;
        w.put_styled(CellRef::at('A', 6), "Customer Product ID:", &styles.label)?;
        w.put_styled(CellRef::at('E', 6), "Quantity:", &styles.label)?;
        w.put_styled(
            CellRef::at('F', 6),
            CellValue::formula(sensor::QUANTITY.link()),
            &styles.value,
        )?;

        w.put_styled(CellRef::at('A', 8), "Contact:", &styles.label)?;
        w.put_styled(CellRef::at('D', 8), "Approved By:", &styles.label)?;
        w.put_styled(CellRef::at('G', 8), "Date:", &styles.label)?;
        w.put_styled(CellRef::at('A', 10), "Remarks:", &styles.label)?;

        // Fiber specification
        w.put_styled(CellRef::at('A', 12), "Fiber Specification", &styles.section)?;
        w.put_row(CellRef::at('A', 13), FIBER_HEADERS, Some(&styles.label))?;
        w.put_styled(FIBER_TYPE, spec.fiber_type.as_str(), &styles.value)?;
        w.put_row(
            FIBER_TYPE.right(1),
            LOOKUP_COLUMNS
                .iter()
                .map(|&column| CellValue::formula(lookup_formula(&config.catalog, column))),
            Some(&styles.value),
        )?;
        w.put_styled(
            CellRef::at('H', 14),
            config.defaults.fiber_provided_by.as_str(),
            &styles.value,
        )?;
        if config.catalog.find(&spec.fiber_type).is_none() {
            tracing::warn!(
                fiber = %spec.fiber_type,
                "Fiber type not in catalog, lookups will show #N/A"
            );
        }

        // FBG specification
        w.put_styled(CellRef::at('A', 16), "FBG Specification", &styles.section)?;
        w.put_row(
            CellRef::at('A', 17),
            FBG_HEADERS.iter().copied().chain(["Apodized"]),
            Some(&styles.label_boxed),
        )?;

        let nominal = CellRef::at('A', 18);
        w.put_styled(nominal, "Nominal Value", &styles.label_boxed)?;
        w.put_styled(nominal.right(1), "-", &styles.value_boxed)?;
        for col in 2..=6 {
            w.put_styled(
                nominal.right(col),
                CellValue::formula(sensor::NOMINAL_ROW.right(col).link()),
                &styles.value_boxed,
            )?;
        }
        w.put_styled(
            nominal.right(7),
            if spec.apodized { "yes" } else { "no" },
            &styles.value_boxed,
        )?;

        for (offset, title) in [(1, "Plus Tolerance"), (2, "Minus Tolerance")] {
            let target = nominal.down(offset);
            let source = sensor::NOMINAL_ROW.down(offset);
            w.put_styled(target, title, &styles.label_boxed)?;
            for col in [1, 2, 3, 5] {
                w.put_styled(
                    target.right(col),
                    CellValue::formula(source.right(col).link()),
                    &styles.label_boxed,
                )?;
            }
            w.put_styled(target.right(4), "-", &styles.label_boxed)?;
        }

        w.put_styled(CellRef::at('A', 22), "Fiber Design", &styles.section)?;

        // Additional specifications
        w.put_styled(CellRef::at('A', 25), "Additional Specifications", &styles.section)?;
        w.put_row(CellRef::at('A', 26), ADDITIONAL_HEADERS, Some(&styles.label))?;
        let additional: [CellValue; 8] = [
            spec.spectrum_datasheet.as_str().into(),
            CellValue::formula(sensor::LABEL.link()),
            CellValue::formula(sensor::TOTAL_LENGTH.link()),
            "no".into(),
            1_i64.into(),
            "black, FBG-length (1mm tolerance)".into(),
            "".into(),
            "black".into(),
        ];
        w.put_row(CellRef::at('A', 27), additional, Some(&styles.value))?;

        // Wavelength table
        w.put_styled(CellRef::at('A', 29), "Wavelength Table", &styles.section)?;
        w.put_row(
            CellRef::at('A', FIBER_TABLE_FIRST_ROW - 1),
            WAVELENGTH_HEADERS,
            Some(&styles.label_boxed),
        )?;
        for index in 0..LINKED_FBG_ROWS as u32 {
            w.put_row(
                CellRef::at('A', FIBER_TABLE_FIRST_ROW + index),
                linked_wavelength_row(index),
                Some(&styles.value_boxed),
            )?;
        }

        w.put_styled(
            CellRef::at('G', 53),
            "1) continuous fiber with multiple FBGs/arrays, to be coiled before delivery",
            &styles.label,
        )?;
        w.put_styled(
            CellRef::at('G', 55),
            "2) min. Tolerance Spacing: 1 mm",
            &styles.label,
        )?;
        w.put_styled(CellRef::at('A', 58), "Date:", &styles.label)?;
        w.put_styled(CellRef::at('C', 58), "Customer's Signature:", &styles.label)?;

        for (col, width) in [
            ('A', 22.0),
            ('B', 18.0),
            ('C', 20.0),
            ('D', 20.0),
            ('E', 22.0),
            ('F', 30.0),
            ('G', 15.0),
            ('H', 18.0),
        ] {
            w.width(col, width)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_formula_covers_catalog() {
        let catalog = FiberCatalog::default();
        assert_eq!(
            lookup_formula(&catalog, 2),
            "=VLOOKUP($A$14,Definitions!C2:I16,2,0)"
        );
    }

    #[test]
    fn test_first_linked_row() {
        let row = linked_wavelength_row(0);
        assert_eq!(
            row[0],
            CellValue::formula(
                "=IF(ISBLANK('Sensor Specification'!A38),\"\",'Sensor Specification'!A38)"
            )
        );
        assert_eq!(
            row[2],
            CellValue::formula(
                "=IF(ISNUMBER('Sensor Specification'!C38),'Sensor Specification'!C38,\"\")"
            )
        );
        assert_eq!(row[4], CellValue::from("-"));
    }

    #[test]
    fn test_spacing_is_difference_of_positions() {
        let row = linked_wavelength_row(19);
        assert_eq!(
            row[3],
            CellValue::formula(
                "=IF(ISNUMBER('Sensor Specification'!D57),'Sensor Specification'!D57,\"\")"
            )
        );
        assert_eq!(
            row[4],
            CellValue::formula("=IF(ISNUMBER(C50),C50-C49,\"\")")
        );
    }
}
