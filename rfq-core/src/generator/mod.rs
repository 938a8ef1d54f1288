//! Quote document generation: the specification workbook and the PDF quote.

mod format;
mod quote;
mod sheets;
mod workbook;

pub use format::{format_amount, format_date, DATE_FORMAT};
pub use sheets::{drawing_formula, drawing_index, linked_wavelength_row, lookup_formula};

use crate::config::QuoteConfig;
use crate::error::{QuoteError, Result};
use crate::model::FbgRecord;
use crate::spec::{OfferNumber, QuoteSpec, SpecFields};
use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Renders both quote documents for one request.
///
/// The specification is parsed when the generator is built, so a generator
/// that exists can always render.
#[derive(Debug, Clone)]
pub struct QuoteDocumentGenerator<'a> {
    spec: QuoteSpec,
    offer: OfferNumber,
    config: &'a QuoteConfig,
    date: NaiveDate,
}

impl<'a> QuoteDocumentGenerator<'a> {
    /// Parse `fields` and the offer number. The quote date is today.
    pub fn new(fields: &SpecFields, offer_number: &str, config: &'a QuoteConfig) -> Result<Self> {
        let offer = OfferNumber::parse(offer_number)?;
        let spec = QuoteSpec::from_fields(fields, &config.defaults)?;
        Ok(Self {
            spec,
            offer,
            config,
            date: Local::now().date_naive(),
        })
    }

    /// Use a fixed quote date instead of today.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn spec(&self) -> &QuoteSpec {
        &self.spec
    }

    pub fn offer_number(&self) -> &OfferNumber {
        &self.offer
    }

    pub fn config(&self) -> &'a QuoteConfig {
        self.config
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Rows of the wavelength table.
    pub fn fbg_table(&self) -> Vec<FbgRecord> {
        self.spec.fbg_layout().derive(&self.spec.wavelengths_nm)
    }

    /// Render the workbook and write it to `path`.
    pub fn generate_spreadsheet(&self, path: &Path) -> Result<PathBuf> {
        let bytes = self.render_spreadsheet()?;
        write_artifact(path, &bytes)?;
        Ok(path.to_path_buf())
    }

    /// Render the PDF quote and write it to `path`.
    pub fn generate_pdf(&self, path: &Path) -> Result<PathBuf> {
        let bytes = self.render_pdf()?;
        write_artifact(path, &bytes)?;
        Ok(path.to_path_buf())
    }
}

/// Write a fully rendered artifact.
///
/// The bytes go to a temporary file next to `path`, which is then renamed over
/// it, so `path` holds either its old content or the complete new one.
pub(crate) fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source: std::io::Error| QuoteError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote document");
    Ok(())
}
