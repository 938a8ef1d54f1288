//! Sensor sheet: literal values, the source of every fiber-sheet link.

use super::{SheetStyles, SheetWriter};
use crate::config::{LINKED_FBG_ROWS, SENSOR_SHEET, SENSOR_TABLE_FIRST_ROW};
use crate::error::Result;
use crate::generator::QuoteDocumentGenerator;
use crate::model::{CellRef, CellValue, FbgSpacing};
use rust_xlsxwriter::Worksheet;

pub(crate) const POSITION: CellRef = CellRef::at('F', 4).on(SENSOR_SHEET);
pub(crate) const POSITION_OF: CellRef = CellRef::at('H', 4).on(SENSOR_SHEET);
pub(crate) const OFFER_NUMBER: CellRef = CellRef::at('C', 5).on(SENSOR_SHEET);
pub(crate) const CUSTOMER: CellRef = CellRef::at('F', 5).on(SENSOR_SHEET);
pub(crate) const QUANTITY: CellRef = CellRef::at('F', 6).on(SENSOR_SHEET);
pub(crate) const CONFIGURATION: CellRef = CellRef::at('A', 18).on(SENSOR_SHEET);
/// First cell of the "Nominal Value" row; the tolerance rows follow.
pub(crate) const NOMINAL_ROW: CellRef = CellRef::at('A', 27).on(SENSOR_SHEET);
pub(crate) const LABEL: CellRef = CellRef::at('B', 34).on(SENSOR_SHEET);
pub(crate) const TOTAL_LENGTH: CellRef = CellRef::at('C', 34).on(SENSOR_SHEET);
pub(crate) const WAVELENGTH_TABLE: CellRef =
    CellRef::at('A', SENSOR_TABLE_FIRST_ROW).on(SENSOR_SHEET);

pub(crate) const FBG_HEADERS: [&str; 7] = [
    "",
    "Wavelength (nm)",
    "Reflectivity (%)",
    "FWHM (nm)",
    "min SLSR (dB)",
    "FBG Length (mm)",
    "FemtoPlus",
];

pub(crate) const WAVELENGTH_HEADERS: [&str; 5] = [
    "FBG Name",
    "Wavelength (nm)",
    "FBG Position (mm)",
    "FBG Lead Out (mm)",
    "FBG Spacing (mm)",
];

impl QuoteDocumentGenerator<'_> {
    pub(crate) fn build_sensor_sheet(
        &self,
        sheet: &mut Worksheet,
        styles: &SheetStyles,
    ) -> Result<()> {
        let spec = self.spec();
        let defaults = &self.config().defaults;
        let mut w = SheetWriter::new(sheet);

        w.put_styled(
            CellRef::at('A', 2),
            self.config().company.sensor_sheet_banner.as_str(),
            &styles.banner,
        )?;
        w.put_styled(
            CellRef::at('H', 2),
            defaults.template_version.as_str(),
            &styles.banner,
        )?;

        // Production header
        w.put_styled(CellRef::at('A', 4), "Production Sheet Number:", &styles.label)?;
        w.put_styled(CellRef::at('E', 4), "Position:", &styles.label)?;
        w.put(CellRef::at('F', 4), 1_i64)?;
        w.put_styled(CellRef::at('G', 4), "of:", &styles.label)?;
        w.put(CellRef::at('H', 4), 1_i64)?;

        w.put_styled(CellRef::at('A', 5), "Offer Number:", &styles.label)?;
        w.put_styled(OFFER_NUMBER, self.offer_number().value(), &styles.value)?;
        w.put_styled(CellRef::at('E', 5), "Customer:", &styles.label)?;
        w.put_styled(CUSTOMER, spec.customer_short(), &styles.value)?;
        w.put_styled(CellRef::at('E', 6), "Quantity:", &styles.label)?;
        w.put_styled(QUANTITY, spec.quantity, &styles.value)?;

        w.put_styled(CellRef::at('A', 8), "Contact:", &styles.label)?;
        w.put_styled(CellRef::at('A', 10), "Remarks FBGs:", &styles.label)?;
        w.put(CellRef::at('B', 10), defaults.fbg_remarks.as_str())?;
        w.put_styled(CellRef::at('A', 12), "Remarks Sensor:", &styles.label)?;

        // Sensor configuration
        w.put_styled(CellRef::at('A', 14), "Sensor Configuration", &styles.section)?;
        w.put_row(
            CellRef::at('A', 16),
            ["Sensor Configuration", "Connector Type", "Fiber Length (mm)"],
            Some(&styles.label),
        )?;
        w.put_styled(CONFIGURATION, spec.sensor_configuration.as_str(), &styles.value)?;
        w.put_styled(CellRef::at('B', 18), spec.connector_type.as_str(), &styles.value)?;
        w.put_styled(CellRef::at('C', 18), spec.total_fiber_length_mm, &styles.value)?;

        // FBG specification
        w.put_styled(CellRef::at('A', 25), "FBG Specification", &styles.section)?;
        w.put_row(CellRef::at('A', 26), FBG_HEADERS, Some(&styles.label_boxed))?;

        let nominal: [CellValue; 7] = [
            "Nominal Value".into(),
            "-".into(),
            spec.reflectivity.into(),
            spec.fwhm_nm.into(),
            spec.slsr_min_db.into(),
            spec.fbg_length_mm.into(),
            spec.femto_plus.as_str().into(),
        ];
        w.put_styled(NOMINAL_ROW, nominal[0].clone(), &styles.label_boxed)?;
        w.put_row(
            NOMINAL_ROW.right(1),
            nominal.into_iter().skip(1),
            Some(&styles.value_boxed),
        )?;

        for (offset, title) in [(1, "Plus Tolerance"), (2, "Minus Tolerance")] {
            let row: [CellValue; 6] = [
                title.into(),
                spec.wavelength_tolerance_nm.into(),
                spec.reflectivity_tolerance.into(),
                spec.fwhm_tolerance_nm.into(),
                "-".into(),
                spec.fbg_length_tolerance_mm.into(),
            ];
            w.put_row(NOMINAL_ROW.down(offset), row, Some(&styles.label_boxed))?;
        }

        // Additional specifications
        w.put_styled(CellRef::at('A', 32), "Additional Specifications", &styles.section)?;
        w.put_styled(CellRef::at('B', 33), "Label", &styles.label)?;
        w.put_styled(CellRef::at('C', 33), "Total Fiber Length (mm)", &styles.label)?;
        w.put_styled(CellRef::at('E', 33), "Tolerance FBG Spacing (%)", &styles.label)?;
        w.put_styled(LABEL, spec.label.as_str(), &styles.value)?;
        w.put_styled(TOTAL_LENGTH, spec.total_fiber_length_mm, &styles.value)?;
        w.put_styled(CellRef::at('E', 34), 2_i64, &styles.value)?;

        // Wavelength table
        w.put_styled(CellRef::at('A', 36), "Wavelength Table", &styles.section)?;
        w.put_row(
            CellRef::at('A', SENSOR_TABLE_FIRST_ROW - 1),
            WAVELENGTH_HEADERS,
            Some(&styles.label_boxed),
        )?;

        if spec.fbg_count() > LINKED_FBG_ROWS {
            tracing::warn!(
                fbgs = spec.fbg_count(),
                linked = LINKED_FBG_ROWS,
                "Fiber sheet links only the first rows of the wavelength table"
            );
        }
        for (i, record) in self.fbg_table().iter().enumerate() {
            let spacing = match record.spacing {
                FbgSpacing::None => CellValue::from("-"),
                FbgSpacing::Mm(mm) => CellValue::from(mm),
            };
            let row: [CellValue; 5] = [
                record.name.as_str().into(),
                CellValue::number_or_dash(record.wavelength_nm),
                record.position_mm.into(),
                record.lead_out_mm.into(),
                spacing,
            ];
            w.put_row(WAVELENGTH_TABLE.down(i as u32), row, Some(&styles.value_boxed))?;
        }

        self.write_autofill_panel(&mut w, styles)?;

        for (col, width) in [
            ('A', 25.0),
            ('B', 20.0),
            ('C', 25.0),
            ('D', 18.0),
            ('E', 20.0),
            ('F', 15.0),
            ('G', 25.0),
            ('H', 15.0),
        ] {
            w.width(col, width)?;
        }

        Ok(())
    }

    /// Inputs of the template's auto-fill helper next to the wavelength table.
    fn write_autofill_panel(&self, w: &mut SheetWriter<'_>, styles: &SheetStyles) -> Result<()> {
        let spec = self.spec();

        w.put_styled(CellRef::at('G', 38), "Auto Fill Wavelength Table", &styles.section)?;
        w.put_styled(CellRef::at('G', 39), "Number of FBGs", &styles.label)?;
        w.put_styled(CellRef::at('H', 40), spec.fbg_count() as i64, &styles.value)?;
        w.put_styled(CellRef::at('G', 42), "Position First FBG (mm)", &styles.label)?;
        w.put_styled(CellRef::at('H', 43), spec.first_fbg_position_mm, &styles.value)?;
        w.put_styled(CellRef::at('G', 45), "FBG Wavelength (nm)", &styles.label)?;
        w.put_styled(CellRef::at('G', 46), "Equal Wavelength Spacing", &styles.label)?;
        w.put_styled(CellRef::at('G', 47), "Wavelength Spacing (nm)", &styles.label)?;
        w.put_styled(CellRef::at('H', 48), 0_i64, &styles.value)?;
        w.put_styled(CellRef::at('G', 49), "Wavelength first FBG", &styles.label)?;
        w.put_styled(
            CellRef::at('H', 50),
            CellValue::number_or_dash(spec.first_wavelength_nm),
            &styles.value,
        )?;
        w.put_styled(CellRef::at('G', 52), "FBG Spacing (mm)", &styles.label)?;
        w.put_styled(CellRef::at('G', 53), "Equal FBG Spacing", &styles.label)?;
        w.put_styled(CellRef::at('G', 54), "Spacing (mm)", &styles.label)?;
        w.put_styled(CellRef::at('H', 55), spec.fbg_spacing_mm, &styles.value)?;
        Ok(())
    }
}
