//! ceprace configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::http::CEP_PLACEHOLDER;
use crate::provider::{APICEP_URL_TEMPLATE, VIACEP_URL_TEMPLATE};
use crate::race::{RaceConfig, RacePolicy};

/// Project-local config file name
const LOCAL_CONFIG: &str = ".ceprace.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Race deadline and policy
    pub race: RaceSection,

    /// Shared HTTP client settings
    pub http: HttpConfig,

    /// Provider endpoints
    pub providers: ProvidersConfig,
}

impl Config {
    /// Reject settings that would make the race meaningless
    pub fn validate(&self) -> Result<()> {
        if self.race.timeout_ms == 0 {
            return Err(eyre::eyre!("race.timeout-ms must be greater than zero"));
        }

        if self.http.request_timeout_ms == 0 {
            return Err(eyre::eyre!("http.request-timeout-ms must be greater than zero"));
        }

        let enabled: Vec<(&str, &ProviderEndpoint)> = [
            ("viacep", &self.providers.viacep),
            ("apicep", &self.providers.apicep),
        ]
        .into_iter()
        .filter(|(_, p)| p.enabled)
        .collect();

        if enabled.is_empty() {
            return Err(eyre::eyre!("At least one provider must be enabled"));
        }

        for (name, endpoint) in enabled {
            if !endpoint.url_template.contains(CEP_PLACEHOLDER) {
                return Err(eyre::eyre!(
                    "providers.{}.url-template must contain {}: {}",
                    name,
                    CEP_PLACEHOLDER,
                    endpoint.url_template
                ));
            }
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Any error yields `None`; the full load reports it later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };

        candidates
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ceprace").join("ceprace.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Race settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSection {
    /// Global deadline in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Which outcomes may resolve the race
    pub policy: RacePolicy,

    /// Abort still-running lookups once the race resolves
    #[serde(rename = "cancel-losers")]
    pub cancel_losers: bool,
}

impl Default for RaceSection {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            policy: RacePolicy::default(),
            cancel_losers: false,
        }
    }
}

impl RaceSection {
    pub fn to_race_config(&self) -> RaceConfig {
        RaceConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            policy: self.policy,
            cancel_losers: self.cancel_losers,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Transport-level timeout per request, in milliseconds
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            user_agent: format!("ceprace/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Provider endpoint table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub viacep: ProviderEndpoint,
    pub apicep: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            viacep: ProviderEndpoint::new(VIACEP_URL_TEMPLATE),
            apicep: ProviderEndpoint::new(APICEP_URL_TEMPLATE),
        }
    }
}

/// One provider's endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// URL with `{cep}` where the raw CEP goes
    #[serde(rename = "url-template")]
    pub url_template: String,
}

fn default_enabled() -> bool {
    true
}

impl ProviderEndpoint {
    pub fn new(url_template: &str) -> Self {
        Self {
            enabled: true,
            url_template: url_template.to_string(),
        }
    }
}
