//! rfq-docs - CLI tool to generate FBG quote documents from an RFQ specification.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rfq_core::generator::DATE_FORMAT;
use rfq_core::{
    generate_quote_documents, generate_quote_documents_on, QuoteConfig, QuoteDocumentGenerator,
    SpecFields, DEFAULT_OFFER_NUMBER,
};

/// Generate the Excel specification sheet and PDF offer for an FBG sensor request.
#[derive(Parser, Debug)]
#[command(name = "rfq-docs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON object mapping specification labels to values
    #[arg(short, long)]
    specs: PathBuf,

    /// Directory for the generated documents
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Offer number (digits only)
    #[arg(long, default_value = DEFAULT_OFFER_NUMBER)]
    offer_number: String,

    /// Company, pricing and catalog profile (JSON); built-in defaults when omitted
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Quote date as dd.mm.yyyy instead of today
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Print the parsed specification and wavelength table as JSON, don't generate
    #[arg(long)]
    print_spec: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| format!("expected dd.mm.yyyy, got '{}': {}", raw, e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout carries the JSON result
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let fields = SpecFields::from_json_file(&args.specs)
        .with_context(|| format!("Failed to load specification {}", args.specs.display()))?;
    info!("Loaded {} specification field(s)", fields.len());

    let config = match &args.profile {
        Some(path) => QuoteConfig::from_json_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => QuoteConfig::default(),
    };

    if args.print_spec {
        let generator = QuoteDocumentGenerator::new(&fields, &args.offer_number, &config)?;
        let json = serde_json::json!({
            "offer_number": generator.offer_number().as_str(),
            "spec": generator.spec(),
            "wavelength_table": generator.fbg_table(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let documents = match args.date {
        Some(date) => generate_quote_documents_on(
            &fields,
            &args.output_dir,
            &args.offer_number,
            &config,
            date,
        ),
        None => generate_quote_documents(&fields, &args.output_dir, &args.offer_number, &config),
    }
    .with_context(|| format!("Failed to generate offer {}", args.offer_number))?;

    info!("Generated: {}", documents.excel.display());
    info!("Generated: {}", documents.pdf.display());
    println!("{}", serde_json::to_string_pretty(&documents)?);

    Ok(())
}
