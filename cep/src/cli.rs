//! CLI argument parsing for cep

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// cep - resolve a Brazilian postal code by racing address providers
#[derive(Parser, Debug)]
#[command(
    name = "cep",
    version,
    about = "Resolve a Brazilian CEP by racing ViaCEP and ApiCEP",
    after_help = "Example:\n  cep 06233-030"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// CEP to look up, sent to the providers as typed
    pub cep: Option<String>,
}

/// Usage block printed when no CEP is given
pub fn usage() -> String {
    [
        "Busca CEP",
        "=========",
        "Usage:",
        "  cep [OPTIONS] <CEP>",
        "Example:",
        "  cep 06233-030",
    ]
    .join("\n")
}

/// Parse a log level name, case-insensitively
///
/// Returns `None` for unknown names; the caller decides the fallback.
pub fn parse_log_level(level: &str) -> Option<tracing::Level> {
    debug!(%level, "parse_log_level: called");
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}
