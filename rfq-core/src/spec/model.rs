//! Typed specification parsed once from free-text fields.

use crate::config::{QuoteDefaults, MAX_FBG_COUNT};
use crate::error::{QuoteError, Result};
use crate::model::FbgLayout;
use serde::Serialize;

use super::fields::{parse_decimal, parse_integer, SpecFields};

/// Field labels as they appear in RFQ specification mappings.
pub mod keys {
    pub const CUSTOMER: &str = "Customer";
    pub const CUSTOMER_COUNTRY: &str = "Customer Country";
    pub const QUANTITY: &str = "Quantity";
    pub const SENSOR_CONFIGURATION: &str = "Sensor Configuration";
    pub const CONNECTOR_TYPE: &str = "Connector Type";
    pub const FIBER_TYPE: &str = "Fiber Type";
    pub const TOTAL_FIBER_LENGTH: &str = "Total Fiber Length";
    pub const NUMBER_OF_FBGS: &str = "Number of FBGs";
    pub const WAVELENGTH_TOLERANCE: &str = "Wavelength Tolerance";
    pub const REFLECTIVITY: &str = "Reflectivity";
    pub const REFLECTIVITY_TOLERANCE: &str = "Reflectivity Tolerance";
    pub const FWHM: &str = "FWHM";
    pub const FWHM_TOLERANCE: &str = "FWHM Tolerance";
    pub const SLSR_MINIMUM: &str = "SLSR Minimum";
    pub const FBG_LENGTH: &str = "FBG Length";
    pub const FBG_LENGTH_TOLERANCE: &str = "FBG Length Tolerance";
    pub const FBG_SPACING: &str = "FBG Spacing";
    pub const FIRST_FBG_POSITION: &str = "First FBG Position";
    pub const FEMTO_PLUS: &str = "FemtoPlus";
    pub const APODIZED: &str = "Apodized";
    pub const SPECTRUM_DATASHEET: &str = "Spectrum Datasheet";
    pub const LABEL: &str = "Label";
    pub const OFFER_NUMBER: &str = "Offer Number";

    /// Label of the n-th (1-based) grating wavelength.
    pub fn fbg_wavelength(n: usize) -> String {
        format!("FBG {} Wavelength", n)
    }
}

/// Wavelengths used when the request does not name them.
const DEFAULT_WAVELENGTHS: [&str; 2] = ["1550.39 nm", "1555.39 nm"];

const DEFAULT_TOTAL_FIBER_LENGTH: &str = "10050";
const DEFAULT_FBG_SPACING: &str = "50";
const DEFAULT_FIRST_FBG_POSITION: &str = "5000";

/// Wavelength of the n-th (1-based) grating, falling back to the defaults.
fn fbg_wavelength(fields: &SpecFields, n: usize) -> Result<Option<f64>> {
    let key = keys::fbg_wavelength(n);
    match fields.decimal(&key)? {
        Some(value) => Ok(Some(value)),
        None => DEFAULT_WAVELENGTHS
            .get(n - 1)
            .map(|raw| parse_decimal(&key, raw))
            .transpose(),
    }
}

fn out_of_range(
    fields: &SpecFields,
    key: &str,
    default: &str,
    expected: &'static str,
) -> QuoteError {
    QuoteError::format(key, fields.text_or(key, default), expected)
}

/// A sensor order with every value in its target type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSpec {
    pub customer: String,
    pub customer_country: String,
    pub quantity: i64,
    pub sensor_configuration: String,
    pub connector_type: String,
    pub fiber_type: String,
    pub total_fiber_length_mm: i64,
    /// One entry per grating; `None` when the request gives no wavelength.
    pub wavelengths_nm: Vec<Option<f64>>,
    /// Seed of the auto-fill panel; present even when the array is empty.
    pub first_wavelength_nm: Option<f64>,
    pub wavelength_tolerance_nm: f64,
    /// Nominal reflectivity as a 0..1 fraction.
    pub reflectivity: f64,
    pub reflectivity_tolerance: f64,
    pub fwhm_nm: f64,
    pub fwhm_tolerance_nm: f64,
    pub slsr_min_db: i64,
    pub fbg_length_mm: i64,
    pub fbg_length_tolerance_mm: i64,
    pub fbg_spacing_mm: i64,
    pub first_fbg_position_mm: i64,
    pub femto_plus: String,
    pub apodized: bool,
    pub spectrum_datasheet: String,
    pub label: String,
}

impl QuoteSpec {
    /// Parse every field, applying defaults for absent keys.
    ///
    /// Fails on the first present value that does not parse, and on grating
    /// layouts whose positions or lead-outs overflow.
    pub fn from_fields(fields: &SpecFields, defaults: &QuoteDefaults) -> Result<Self> {
        let count = fields.integer_or(keys::NUMBER_OF_FBGS, "2")?;
        let fbg_count = usize::try_from(count)
            .ok()
            .filter(|n| *n <= MAX_FBG_COUNT)
            .ok_or(QuoteError::FbgCount {
                count,
                max: MAX_FBG_COUNT,
            })?;

        let wavelengths_nm = (1..=fbg_count)
            .map(|n| fbg_wavelength(fields, n))
            .collect::<Result<Vec<_>>>()?;

        let spec = Self {
            customer: fields
                .text_or(keys::CUSTOMER, "NRL - US Naval Research Laboratory")
                .to_string(),
            customer_country: fields
                .text_or(keys::CUSTOMER_COUNTRY, &defaults.customer_country)
                .to_string(),
            quantity: fields.integer_or(keys::QUANTITY, "10")?,
            sensor_configuration: fields
                .text_or(keys::SENSOR_CONFIGURATION, "Fiber Only")
                .to_string(),
            connector_type: fields
                .text_or(keys::CONNECTOR_TYPE, "FC/APC both ends")
                .to_string(),
            fiber_type: fields
                .text_or(keys::FIBER_TYPE, "SM1330-E9/125PI")
                .to_string(),
            total_fiber_length_mm: fields
                .integer_or(keys::TOTAL_FIBER_LENGTH, DEFAULT_TOTAL_FIBER_LENGTH)?,
            wavelengths_nm,
            first_wavelength_nm: fbg_wavelength(fields, 1)?,
            wavelength_tolerance_nm: fields.decimal_or(keys::WAVELENGTH_TOLERANCE, "±0.1")?,
            reflectivity: fields.fraction_or(keys::REFLECTIVITY, "10%")?,
            reflectivity_tolerance: fields.fraction_or(keys::REFLECTIVITY_TOLERANCE, "±4%")?,
            fwhm_nm: fields.decimal_or(keys::FWHM, "0.09")?,
            fwhm_tolerance_nm: fields.decimal_or(keys::FWHM_TOLERANCE, "±0.02")?,
            slsr_min_db: fields.integer_or(keys::SLSR_MINIMUM, "8")?,
            fbg_length_mm: fields.integer_or(keys::FBG_LENGTH, "12")?,
            fbg_length_tolerance_mm: fields.integer_or(keys::FBG_LENGTH_TOLERANCE, "±2")?,
            fbg_spacing_mm: fields.integer_or(keys::FBG_SPACING, DEFAULT_FBG_SPACING)?,
            first_fbg_position_mm: fields
                .integer_or(keys::FIRST_FBG_POSITION, DEFAULT_FIRST_FBG_POSITION)?,
            femto_plus: fields.text_or(keys::FEMTO_PLUS, "Yes").to_string(),
            apodized: fields
                .text_or(keys::APODIZED, "Yes")
                .trim()
                .eq_ignore_ascii_case("yes"),
            spectrum_datasheet: fields
                .text_or(keys::SPECTRUM_DATASHEET, "linear")
                .to_string(),
            label: fields.text_or(keys::LABEL, "on spool").to_string(),
        };
        spec.check_positions(fields)?;

        tracing::debug!(
            customer = %spec.customer,
            fbgs = spec.fbg_count(),
            fiber = %spec.fiber_type,
            "Parsed specification"
        );

        Ok(spec)
    }

    /// Positions run monotonically from the first to the last grating, so
    /// checking both ends covers every row of the table.
    fn check_positions(&self, fields: &SpecFields) -> Result<()> {
        let Some(last_index) = self.fbg_count().checked_sub(1) else {
            return Ok(());
        };
        let spacing_error = || {
            out_of_range(
                fields,
                keys::FBG_SPACING,
                DEFAULT_FBG_SPACING,
                "a spacing that keeps every FBG position in range",
            )
        };

        let offset = i64::try_from(last_index)
            .ok()
            .and_then(|i| i.checked_mul(self.fbg_spacing_mm))
            .ok_or_else(spacing_error)?;
        let last = self.first_fbg_position_mm.checked_add(offset).ok_or_else(|| {
            if offset.unsigned_abs() > self.first_fbg_position_mm.unsigned_abs() {
                spacing_error()
            } else {
                out_of_range(
                    fields,
                    keys::FIRST_FBG_POSITION,
                    DEFAULT_FIRST_FBG_POSITION,
                    "a position that keeps every FBG position in range",
                )
            }
        })?;

        for position in [self.first_fbg_position_mm, last] {
            self.total_fiber_length_mm
                .checked_sub(position)
                .ok_or_else(|| {
                    out_of_range(
                        fields,
                        keys::TOTAL_FIBER_LENGTH,
                        DEFAULT_TOTAL_FIBER_LENGTH,
                        "a length that keeps every FBG lead-out in range",
                    )
                })?;
        }
        Ok(())
    }

    /// Number of gratings in the array.
    pub fn fbg_count(&self) -> usize {
        self.wavelengths_nm.len()
    }

    /// Customer name without the descriptive tail (`"NRL - US Naval ..."` → `"NRL"`).
    pub fn customer_short(&self) -> &str {
        match self.customer.split_once(" - ") {
            Some((short, _)) => short,
            None => &self.customer,
        }
    }

    /// Grating placement along the fiber.
    pub fn fbg_layout(&self) -> FbgLayout {
        FbgLayout {
            first_position_mm: self.first_fbg_position_mm,
            spacing_mm: self.fbg_spacing_mm,
            total_length_mm: self.total_fiber_length_mm,
            count: self.fbg_count(),
        }
    }
}

/// Validated offer number; lands as a number on the sensor sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferNumber {
    text: String,
    value: i64,
}

impl OfferNumber {
    /// Parse an offer number; it must be an integer.
    pub fn parse(raw: &str) -> Result<Self> {
        let text = raw.trim();
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
            return Err(QuoteError::format(keys::OFFER_NUMBER, raw, "a numeric offer number"));
        }
        Ok(Self {
            text: text.to_string(),
            value: parse_integer(keys::OFFER_NUMBER, text)?,
        })
    }

    /// Offer number as written in file names and titles.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Offer number as a spreadsheet value.
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl std::fmt::Display for OfferNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
