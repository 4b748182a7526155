//! gigatraffic - mobile data quota report
//!
//! Scrapes the carrier's QuickCheck status page and projects how the rest of
//! the billing period will go at the current burn rate:
//! - used/limit and percent of the period elapsed
//! - average bytes per second since the period started
//! - projected surplus or deficit at period end
//! - when the allowance runs out

mod cli;
mod core;
mod logging;
mod providers;

use anyhow::Context;
use clap::Parser;
use cli::{exit_codes, Cli};

use crate::core::{FetchContext, QuotaReport, QuotaSource, SystemClock};
use crate::providers::QuickCheckProvider;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.json_output) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    // one request, nothing to run in parallel
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    match rt.block_on(report(&cli)) {
        Ok(line) => {
            println!("{}", line);
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::for_error(&e)
        }
    }
}

/// Retrieve the quota and render it as a single line
async fn report(cli: &Cli) -> anyhow::Result<String> {
    let ctx = FetchContext::new(cli.url.clone(), cli.timeout);
    let provider = QuickCheckProvider::new();

    let quota = provider
        .retrieve(&ctx)
        .await
        .with_context(|| format!("retrieving quota from {}", provider.name()))?;

    let report = QuotaReport::capture(&quota, &SystemClock).context("computing quota report")?;
    tracing::debug!(?report, "Computed quota report");

    if cli.json {
        report.to_json().context("serializing quota report")
    } else {
        Ok(report.to_string())
    }
}
