//! Address providers
//!
//! Each provider performs one HTTP round-trip per lookup and maps its own
//! JSON shape onto [`AddressResult`]. No retries and no caching.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod apicep;
mod error;
pub mod http;
mod viacep;

pub use apicep::{APICEP_NAME, APICEP_URL_TEMPLATE, ApiCepProvider};
pub use error::LookupError;
pub use viacep::{VIACEP_NAME, VIACEP_URL_TEMPLATE, ViaCepProvider};

use crate::config::Config;
use crate::model::{AddressResult, ProviderId};

/// A source that can resolve a CEP to an address
///
/// Implementations must make at most one outbound request per call and
/// report every failure through the returned error.
#[async_trait]
pub trait CepProvider: Send + Sync {
    /// Name used to attribute outcomes
    fn id(&self) -> ProviderId;

    /// Resolve the CEP; the input is passed through unvalidated
    async fn lookup(&self, cep: &str) -> Result<AddressResult, LookupError>;
}

/// Build every enabled provider from config, sharing one HTTP client
pub fn build_providers(config: &Config) -> Result<Vec<Arc<dyn CepProvider>>, LookupError> {
    debug!(?config.providers, "build_providers: called");
    let client = http::build_client(&config.http)?;
    let mut providers: Vec<Arc<dyn CepProvider>> = Vec::new();

    if config.providers.viacep.enabled {
        debug!("build_providers: ViaCEP enabled");
        providers.push(Arc::new(ViaCepProvider::new(
            client.clone(),
            config.providers.viacep.url_template.clone(),
        )));
    } else {
        debug!("build_providers: ViaCEP disabled");
    }

    if config.providers.apicep.enabled {
        debug!("build_providers: ApiCEP enabled");
        providers.push(Arc::new(ApiCepProvider::new(
            client,
            config.providers.apicep.url_template.clone(),
        )));
    } else {
        debug!("build_providers: ApiCEP disabled");
    }

    Ok(providers)
}
