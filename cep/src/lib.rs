//! ceprace - Brazilian postal code lookup by provider race
//!
//! A CEP is sent to every configured address provider at once; the first
//! provider to answer decides the result, unless a global deadline fires
//! first. Losing lookups are abandoned (or cancelled, if configured).
//!
//! # Modules
//!
//! - [`model`] - Normalized address record and race outcomes
//! - [`provider`] - Provider trait plus the ViaCEP and ApiCEP clients
//! - [`race`] - Fan-out, select and deadline
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use ceprace::{Config, RaceCoordinator, build_providers};
//!
//! let config = Config::load(None)?;
//! let race = RaceCoordinator::new(build_providers(&config)?, config.race.to_race_config());
//! let result = race.race("06233-030").await;
//! ```

pub mod cli;
pub mod config;
pub mod model;
pub mod provider;
pub mod race;

pub use config::Config;
pub use model::{AddressResult, LookupOutcome, ProviderId, RaceResult};
pub use provider::{ApiCepProvider, CepProvider, LookupError, ViaCepProvider, build_providers};
pub use race::{RaceConfig, RaceCoordinator, RacePolicy};
