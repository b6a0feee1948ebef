// ABOUTME: FitWell sync CLI - runs one health-data synchronization attempt from the command line
// ABOUTME: Selects the live or synthetic provider, drives the orchestrator, and reports the outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell
//!
//! Usage:
//! ```bash
//! # Sync the last 7 days from the Health Connect bridge
//! fitwell-sync
//!
//! # Sync deterministic sample data instead of live records
//! fitwell-sync --sample
//!
//! # Sync a 30-day window and print the report as JSON
//! fitwell-sync --days 30 --json
//! ```

use clap::Parser;
use fitwell_sync::api::ApiClient;
use fitwell_sync::config::SyncConfig;
use fitwell_sync::errors::SyncError;
use fitwell_sync::logging;
use fitwell_sync::providers::{HealthConnectProvider, HealthProvider, SyntheticProvider};
use fitwell_sync::sync::{SyncOrchestrator, SyncReport};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "fitwell-sync",
    about = "FitWell health-data synchronization",
    long_about = "Reads device health records, aggregates daily summaries, and uploads them to the FitWell backend.",
    version
)]
struct Cli {
    /// Use the deterministic synthetic provider instead of Health Connect
    #[arg(long)]
    sample: bool,

    /// Override the sync window in days
    #[arg(long)]
    days: Option<u32>,

    /// Print the sync report as JSON
    #[arg(long)]
    json: bool,
}

async fn run_sync<P>(
    provider: P,
    api: ApiClient,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError>
where
    P: HealthProvider,
{
    let orchestrator = SyncOrchestrator::new(provider, api, config);
    orchestrator.sync().await
}

fn print_report(report: &SyncReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "Synced {} days, {} heart-rate samples, {} sleep sessions, {} workouts ({})",
            report.days,
            report.heart_rate_samples,
            report.sleep_sessions,
            report.workouts,
            report.provider
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_from_env()?;

    let mut config = SyncConfig::from_env()?;
    if let Some(days) = cli.days {
        config.window_days = days;
        config
            .validate()
            .map_err(|e| SyncError::InvalidConfig(e.to_string()))?;
    }
    info!(config = %config.summary(), "Configuration loaded");

    let api = ApiClient::new(&config.api);
    let result = if cli.sample {
        run_sync(SyntheticProvider::new(), api, &config).await
    } else {
        run_sync(HealthConnectProvider::new(&config.bridge), api, &config).await
    };

    match result {
        Ok(report) => {
            print_report(&report, cli.json)?;
            Ok(())
        }
        Err(e) => {
            error!(reason = %e.tag(), "Sync failed: {e}");
            if e.sample_data_fallback() && !cli.sample {
                eprintln!("Sync failed: {e}. Re-run with --sample to upload sample data instead.");
            } else {
                eprintln!("Sync failed: {e}");
            }
            std::process::exit(1);
        }
    }
}
