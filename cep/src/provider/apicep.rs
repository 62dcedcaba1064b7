//! ApiCEP provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::{fetch_json, render_url};
use super::{CepProvider, LookupError};
use crate::model::{AddressResult, ProviderId};

pub const APICEP_NAME: &str = "ApiCEP";

pub const APICEP_URL_TEMPLATE: &str = "https://cdn.apicep.com/file/apicep/{cep}.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiCepResponse {
    code: String,
    address: String,
    district: String,
    city: String,
    state: String,
    ok: Option<bool>,
    message: Option<String>,
}

impl From<ApiCepResponse> for AddressResult {
    fn from(raw: ApiCepResponse) -> Self {
        Self {
            postal_code: raw.code,
            street: raw.address,
            district: raw.district,
            city: raw.city,
            state_code: raw.state,
        }
    }
}

/// Looks CEPs up on the ApiCEP static CDN
pub struct ApiCepProvider {
    http: Client,
    url_template: String,
}

impl ApiCepProvider {
    pub fn new(http: Client, url_template: impl Into<String>) -> Self {
        let url_template = url_template.into();
        debug!(%url_template, "ApiCepProvider::new: called");
        Self { http, url_template }
    }
}

#[async_trait]
impl CepProvider for ApiCepProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new(APICEP_NAME)
    }

    async fn lookup(&self, cep: &str) -> Result<AddressResult, LookupError> {
        debug!(%cep, "ApiCepProvider::lookup: called");
        let url = render_url(&self.url_template, cep);
        let raw: ApiCepResponse = fetch_json(&self.http, &url).await?;

        if raw.ok == Some(false) {
            debug!(%cep, message = ?raw.message, "ApiCepProvider::lookup: ok=false");
            return Err(LookupError::NotFound {
                cep: cep.to_string(),
                message: raw.message.unwrap_or_else(|| "ApiCEP reported ok=false".to_string()),
            });
        }

        Ok(raw.into())
    }
}
