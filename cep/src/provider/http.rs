//! Shared HTTP plumbing for JSON address providers

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::LookupError;
use crate::config::HttpConfig;

/// Placeholder replaced by the raw CEP in provider URL templates
pub const CEP_PLACEHOLDER: &str = "{cep}";

/// Build the HTTP client shared by every provider
pub fn build_client(config: &HttpConfig) -> Result<Client, LookupError> {
    debug!(?config, "build_client: called");
    Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(LookupError::Network)
}

/// Substitute the CEP into a URL template, verbatim
pub fn render_url(template: &str, cep: &str) -> String {
    template.replace(CEP_PLACEHOLDER, cep)
}

/// One GET round-trip, decoding the body as `T`
///
/// The status code is not inspected: whatever body comes back is decoded.
pub async fn fetch_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, LookupError> {
    debug!(%url, "fetch_json: called");
    let response = match http.get(url).send().await {
        Ok(r) => {
            debug!(status = %r.status(), "fetch_json: HTTP response received");
            r
        }
        Err(e) => {
            debug!(%e, "fetch_json: HTTP request failed");
            return Err(LookupError::Network(e));
        }
    };

    let body = match response.bytes().await {
        Ok(b) => {
            debug!(body_len = b.len(), "fetch_json: response body read");
            b
        }
        Err(e) => {
            debug!(%e, "fetch_json: failed to read response body");
            return Err(LookupError::Io(e));
        }
    };

    serde_json::from_slice(&body).map_err(|e| {
        debug!(%e, "fetch_json: failed to decode body");
        LookupError::Decode(e)
    })
}
