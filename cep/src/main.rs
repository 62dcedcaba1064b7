//! cep - race address providers for a Brazilian postal code
//!
//! CLI entry point. Every race outcome exits 0; failures are printed, not
//! reported through the exit status.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use ceprace::cli::{Cli, parse_log_level, usage};
use ceprace::config::Config;
use ceprace::model::{AddressResult, LookupOutcome, RaceResult};
use ceprace::provider::build_providers;
use ceprace::race::RaceCoordinator;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ceprace")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_log_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("ceprace.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Nothing to look up: usage only, no config, no network
    let Some(cep) = cli.cep.as_deref() else {
        println!("{}", usage());
        return Ok(());
    };

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    // The log file is optional; the lookup still runs without it
    if let Err(e) = setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()) {
        eprintln!("Warning: Failed to setup logging, continuing without a log file: {:#}", e);
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let providers = build_providers(&config).context("Failed to build providers")?;
    let coordinator = RaceCoordinator::new(providers, config.race.to_race_config());
    info!(%cep, providers = ?coordinator.provider_ids(), "cep starting race");

    let result = coordinator.race(cep).await;
    debug!(?result, "main: race finished");
    print_result(&result);

    Ok(())
}

fn print_result(result: &RaceResult) {
    match result {
        RaceResult::Won(LookupOutcome::Success { provider, address }) => {
            println!("{} Response from {}", "✓".green(), provider.to_string().cyan());
            print_address(address);
        }
        RaceResult::Won(failure @ LookupOutcome::Failure { .. }) => {
            print_failure(failure);
        }
        RaceResult::TimedOut(timeout) => {
            println!(
                "{} Timeout: no provider answered within {}ms",
                "✗".red(),
                timeout.as_millis()
            );
        }
        RaceResult::AllFailed(outcomes) => {
            for outcome in outcomes {
                print_failure(outcome);
            }
            eprintln!("{} All providers failed", "✗".red());
        }
    }
}

fn print_failure(outcome: &LookupOutcome) {
    if let Some(error) = outcome.error() {
        eprintln!("{} Error from {}: {}", "✗".red(), outcome.provider().to_string().yellow(), error);
    }
}

fn print_address(address: &AddressResult) {
    println!("  CEP:      {}", address.postal_code);
    println!("  Street:   {}", address.street);
    println!("  District: {}", address.district);
    println!("  City:     {}", address.city);
    println!("  State:    {}", address.state_code);
}
