use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::app;
use tax_cli::config::ConfigOverrides;
use tax_cli::input::CalculationRequest;
use tax_cli::logging::{enable_file_logging, init_logging};
use tax_cli::render::{format_currency, render_state};
use tax_cli::state::CalculationState;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Retrieves the marginal tax brackets for the requested year and prints
/// the tax owed in each band, the total, and the effective rate.
#[derive(Debug, Parser)]
#[command(name = "tax-calculator", version)]
struct Cli {
    /// Tax year (2019, 2020, 2021 or 2022).
    #[arg(long)]
    year: String,

    /// Annual income, e.g. `90000` or `90,000`.
    #[arg(long, allow_hyphen_values = true)]
    income: String,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bracket backend: `http` or `csv`.
    #[arg(long)]
    backend: Option<String>,

    /// Service base URL (`http`) or bracket file path (`csv`).
    #[arg(long)]
    location: Option<String>,

    /// Per-request timeout for the HTTP backend.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Retries after the first failed request.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Delay before the first retry; doubles for each later retry.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.clone(),
            location: self.location.clone(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if let Some(path) = &cli.log_file {
        enable_file_logging(path)?;
    }

    let request = CalculationRequest::parse(&cli.year, &cli.income)?;

    let config = app::resolve_config(cli.config.as_deref(), cli.overrides(), |key| {
        std::env::var(key).ok()
    })
    .context("invalid configuration")?;

    debug!("using {} backend at {}", config.backend, config.location);
    let source = app::build_source(&config)
        .await
        .with_context(|| format!("cannot create '{}' bracket provider", config.backend))?;

    println!(
        "Tax year {}, annual income {}",
        request.year(),
        format_currency(request.income())
    );
    println!();

    let mut state = CalculationState::new();
    state.begin();
    println!("{}", render_state(&state));
    let outcome = app::run_calculation(&source, &request, &mut state).await;
    println!("{}", render_state(&state));

    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}
