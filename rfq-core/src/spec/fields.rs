//! Free-text specification fields and their normalization.

use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Unit suffixes removed before numeric parsing. Longer suffixes first.
const UNIT_SUFFIXES: &[&str] = &["pieces", "pcs", "dB", "nm", "mm", "%"];

/// Label → free-text value pairs describing a sensor order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecFields(BTreeMap<String, String>);

impl SpecFields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping from a JSON object of string values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QuoteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| QuoteError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get the raw text of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text of a field, or the default when absent.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Integer value of a field, parsing the default when absent.
    pub fn integer_or(&self, key: &str, default: &str) -> Result<i64> {
        parse_integer(key, self.text_or(key, default))
    }

    /// Decimal value of a field, parsing the default when absent.
    pub fn decimal_or(&self, key: &str, default: &str) -> Result<f64> {
        parse_decimal(key, self.text_or(key, default))
    }

    /// Decimal value of a field with no default.
    pub fn decimal(&self, key: &str) -> Result<Option<f64>> {
        self.get(key).map(|raw| parse_decimal(key, raw)).transpose()
    }

    /// Percentage of a field as a 0..1 fraction, parsing the default when absent.
    pub fn fraction_or(&self, key: &str, default: &str) -> Result<f64> {
        parse_fraction(key, self.text_or(key, default))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SpecFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Strip sign markers, unit suffixes and thousands separators from a value.
///
/// `"±0.1 nm"` → `"0.1"`, `"10,050 mm"` → `"10050"`, `"10 pcs"` → `"10"`.
pub fn strip_units(raw: &str) -> String {
    let cleaned = raw.trim().replace('±', "");
    let mut value = cleaned.trim();

    while let Some(suffix) = UNIT_SUFFIXES.iter().find(|s| value.ends_with(*s)) {
        value = value[..value.len() - suffix.len()].trim_end();
    }

    value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Parse an integer value.
pub fn parse_integer(field: &str, raw: &str) -> Result<i64> {
    strip_units(raw)
        .parse()
        .map_err(|_| QuoteError::format(field, raw, "an integer"))
}

/// Parse a decimal value.
pub fn parse_decimal(field: &str, raw: &str) -> Result<f64> {
    strip_units(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QuoteError::format(field, raw, "a decimal number"))
}

/// Parse a percentage into a 0..1 fraction (`"10%"` → `0.1`).
pub fn parse_fraction(field: &str, raw: &str) -> Result<f64> {
    strip_units(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / 100.0)
        .ok_or_else(|| QuoteError::format(field, raw, "a percentage"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_units() {
        assert_eq!(strip_units("±0.1 nm"), "0.1");
        assert_eq!(strip_units("10050 mm"), "10050");
        assert_eq!(strip_units("10,050 mm"), "10050");
        assert_eq!(strip_units("10 pcs"), "10");
        assert_eq!(strip_units("10 pieces"), "10");
        assert_eq!(strip_units("8 dB"), "8");
        assert_eq!(strip_units("±4%"), "4");
        assert_eq!(strip_units(" 2 "), "2");
        assert_eq!(strip_units("abc"), "abc");
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("Reflectivity", "10%").unwrap(), 0.10);
        assert_eq!(parse_fraction("Reflectivity Tolerance", "±4%").unwrap(), 0.04);
    }

    #[test]
    fn test_parse_integer_rejects_decimals() {
        assert_eq!(parse_integer("FBG Length", "12 mm").unwrap(), 12);
        let err = parse_integer("FBG Length", "12.5 mm").unwrap_err();
        assert!(err.is_format());
        assert_eq!(
            err.to_string(),
            "Invalid value for 'FBG Length': expected an integer, got '12.5 mm'"
        );
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal("FWHM", "0.09 nm").unwrap(), 0.09);
        assert!(parse_decimal("FWHM", "abc").is_err());
        assert!(parse_decimal("FWHM", "").is_err());
        assert!(parse_decimal("FWHM", "inf").is_err());
    }

    #[test]
    fn test_defaults_only_for_absent_keys() {
        let fields: SpecFields = [("Reflectivity", "abc")].into_iter().collect();
        assert!(fields.fraction_or("Reflectivity", "10%").is_err());
        assert_eq!(fields.fraction_or("Missing", "10%").unwrap(), 0.10);
        assert_eq!(fields.text_or("Label", "on spool"), "on spool");
        assert_eq!(fields.decimal("FBG 3 Wavelength").unwrap(), None);
    }
}
