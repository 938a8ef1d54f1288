//! rfq-core - Quote documents for femtosecond-written FBG sensor arrays.
//!
//! Turns the free-text specification of a request for quotation into two
//! documents: an Excel specification workbook (sensor, fiber, definitions and
//! drawing sheets) and a PDF offer.
//!
//! # Example
//!
//! ```no_run
//! use rfq_core::{generate_quote_documents, QuoteConfig, SpecFields};
//! use std::path::Path;
//!
//! let fields: SpecFields = [("Quantity", "10 pcs"), ("Number of FBGs", "2")]
//!     .into_iter()
//!     .collect();
//! let config = QuoteConfig::default();
//! let docs = generate_quote_documents(&fields, Path::new("output"), "41260018", &config).unwrap();
//! println!("{} {}", docs.excel.display(), docs.pdf.display());
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod pdf;
pub mod spec;

// Re-exports for convenience
pub use config::{QuoteConfig, DEFAULT_OFFER_NUMBER};
pub use error::{ErrorKind, QuoteError, Result};
pub use generator::QuoteDocumentGenerator;
pub use model::{FbgRecord, FbgSpacing};
pub use spec::{OfferNumber, QuoteSpec, SpecFields};

use chrono::NaiveDate;
use generator::write_artifact;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths of the two written documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocuments {
    pub excel: PathBuf,
    pub pdf: PathBuf,
}

/// Output paths for an offer inside `output_dir`.
pub fn output_paths(output_dir: &Path, offer: &OfferNumber) -> GeneratedDocuments {
    let stem = format!("{}{}", offer, config::OUTPUT_FILE_SUFFIX);
    GeneratedDocuments {
        excel: output_dir.join(format!("{}.xlsx", stem)),
        pdf: output_dir.join(format!("{}.pdf", stem)),
    }
}

/// Generate both quote documents, dated today.
///
/// Creates `output_dir` if needed and writes `<offer>_NRL.xlsx` and
/// `<offer>_NRL.pdf`. Existing files are overwritten.
pub fn generate_quote_documents(
    fields: &SpecFields,
    output_dir: &Path,
    offer_number: &str,
    config: &QuoteConfig,
) -> Result<GeneratedDocuments> {
    create_output_dir(output_dir)?;
    let generator = QuoteDocumentGenerator::new(fields, offer_number, config)?;
    write_documents(&generator, output_dir)
}

/// Generate both quote documents with a fixed quote date.
pub fn generate_quote_documents_on(
    fields: &SpecFields,
    output_dir: &Path,
    offer_number: &str,
    config: &QuoteConfig,
    date: NaiveDate,
) -> Result<GeneratedDocuments> {
    create_output_dir(output_dir)?;
    let generator = QuoteDocumentGenerator::new(fields, offer_number, config)?.with_date(date);
    write_documents(&generator, output_dir)
}

fn create_output_dir(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).map_err(|source| QuoteError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Render both documents, then write them.
///
/// Nothing is written unless both render, and the workbook is removed again
/// when the PDF cannot be written.
fn write_documents(
    generator: &QuoteDocumentGenerator<'_>,
    output_dir: &Path,
) -> Result<GeneratedDocuments> {
    let excel = generator.render_spreadsheet()?;
    let pdf = generator.render_pdf()?;

    let paths = output_paths(output_dir, generator.offer_number());
    write_artifact(&paths.excel, &excel)?;
    if let Err(err) = write_artifact(&paths.pdf, &pdf) {
        if let Err(cleanup) = std::fs::remove_file(&paths.excel) {
            tracing::warn!(
                path = %paths.excel.display(),
                error = %cleanup,
                "Failed to remove workbook after PDF write failure"
            );
        }
        return Err(err);
    }

    tracing::info!(
        offer = %generator.offer_number(),
        customer = %generator.spec().customer_short(),
        "Generated quote documents"
    );
    Ok(paths)
}
