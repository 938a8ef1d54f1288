//! Grating placement along the fiber.

use serde::Serialize;

/// Spacing to the previous grating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FbgSpacing {
    /// First grating of the array.
    None,
    /// Distance to the previous grating in mm.
    Mm(i64),
}

/// One row of the wavelength table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FbgRecord {
    /// Grating name (`FBG1`, `FBG2`, ...).
    pub name: String,
    /// Center wavelength, blank when not requested.
    pub wavelength_nm: Option<f64>,
    /// Position from the fiber origin.
    pub position_mm: i64,
    /// Remaining fiber after the grating.
    pub lead_out_mm: i64,
    pub spacing: FbgSpacing,
}

/// Equidistant grating layout on a fiber of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbgLayout {
    pub first_position_mm: i64,
    pub spacing_mm: i64,
    pub total_length_mm: i64,
    pub count: usize,
}

impl FbgLayout {
    /// Position of the grating at `index` (0-based).
    ///
    /// Saturates instead of overflowing; `QuoteSpec::from_fields` rejects
    /// layouts that would reach the limits.
    pub fn position(&self, index: usize) -> i64 {
        let offset = i64::try_from(index)
            .unwrap_or(i64::MAX)
            .saturating_mul(self.spacing_mm);
        self.first_position_mm.saturating_add(offset)
    }

    /// Derive the wavelength table.
    ///
    /// `wavelengths_nm[i]` belongs to grating `i`; missing entries stay blank.
    pub fn derive(&self, wavelengths_nm: &[Option<f64>]) -> Vec<FbgRecord> {
        (0..self.count)
            .map(|i| {
                let position_mm = self.position(i);
                FbgRecord {
                    name: format!("FBG{}", i + 1),
                    wavelength_nm: wavelengths_nm.get(i).copied().flatten(),
                    position_mm,
                    lead_out_mm: self.total_length_mm.saturating_sub(position_mm),
                    spacing: if i == 0 {
                        FbgSpacing::None
                    } else {
                        FbgSpacing::Mm(self.spacing_mm)
                    },
                }
            })
            .collect()
    }
}
