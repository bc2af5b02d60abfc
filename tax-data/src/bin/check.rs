use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::BracketProvider;
use tax_data::{CsvBracketLoader, StaticBracketProvider};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Validate a tax bracket CSV file before it is published.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2022)
/// - min: Inclusive lower bound of the band
/// - max: Exclusive upper bound (empty for the open-ended top band)
/// - rate: The marginal tax rate as a decimal (e.g., 0.205)
#[derive(Parser, Debug)]
#[command(name = "tax-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax bracket data
    #[arg(short, long)]
    file: PathBuf,

    /// Only check this tax year
    #[arg(short, long)]
    year: Option<i32>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let args = Args::parse();

    println!("Checking tax brackets in: {}", args.file.display());

    let provider = StaticBracketProvider::from_path(&args.file)
        .with_context(|| format!("Failed to load: {}", args.file.display()))?;

    let years = match args.year {
        Some(year) => vec![year],
        None => provider.years(),
    };
    debug!(?years, "Checking years");

    let mut violations = 0;
    for year in years {
        let brackets = provider
            .fetch_brackets(year)
            .await
            .map_err(tax_data::BracketLoaderError::from)
            .with_context(|| format!("No brackets for {year} in {}", args.file.display()))?;

        let top_rate = brackets
            .tax_brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or_default();
        println!(
            "{year}: {} brackets, top rate {}",
            brackets.tax_brackets.len(),
            top_rate.normalize()
        );

        for violation in CsvBracketLoader::validate(&brackets) {
            warn!(year, %violation, "Invalid bracket set");
            println!("  {year}: {violation}");
            violations += 1;
        }
    }

    if violations > 0 {
        println!("Found {violations} problem(s).");
        return Ok(ExitCode::FAILURE);
    }

    println!("All bracket sets are valid.");
    Ok(ExitCode::SUCCESS)
}
