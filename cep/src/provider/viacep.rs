//! ViaCEP provider
//!
//! Response shape: `{"cep", "logradouro", "bairro", "localidade", "uf", ...}`.
//! Unknown CEPs come back as `{"erro": true}` with HTTP 200.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::http::{fetch_json, render_url};
use super::{CepProvider, LookupError};
use crate::model::{AddressResult, ProviderId};

/// Provider name reported in outcomes
pub const VIACEP_NAME: &str = "ViaCEP";

/// Default endpoint template
pub const VIACEP_URL_TEMPLATE: &str = "http://viacep.com.br/ws/{cep}/json/";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    cep: String,
    logradouro: String,
    bairro: String,
    localidade: String,
    uf: String,
    /// Older deployments send `"true"` as a string
    erro: Option<Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

impl From<ViaCepResponse> for AddressResult {
    fn from(raw: ViaCepResponse) -> Self {
        Self {
            postal_code: raw.cep,
            street: raw.logradouro,
            district: raw.bairro,
            city: raw.localidade,
            state_code: raw.uf,
        }
    }
}

/// Looks CEPs up on viacep.com.br
pub struct ViaCepProvider {
    http: Client,
    url_template: String,
}

impl ViaCepProvider {
    pub fn new(http: Client, url_template: impl Into<String>) -> Self {
        let url_template = url_template.into();
        debug!(%url_template, "ViaCepProvider::new: called");
        Self { http, url_template }
    }
}

#[async_trait]
impl CepProvider for ViaCepProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new(VIACEP_NAME)
    }

    async fn lookup(&self, cep: &str) -> Result<AddressResult, LookupError> {
        debug!(%cep, "ViaCepProvider::lookup: called");
        let url = render_url(&self.url_template, cep);
        let raw: ViaCepResponse = fetch_json(&self.http, &url).await?;

        if raw.is_error() {
            debug!(%cep, "ViaCepProvider::lookup: erro flag set");
            return Err(LookupError::NotFound {
                cep: cep.to_string(),
                message: "ViaCEP reported erro".to_string(),
            });
        }

        debug!(%cep, "ViaCepProvider::lookup: decoded address");
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::provider::http::build_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"{
        "cep": "06233-030",
        "logradouro": "Rua Paula Rodrigues",
        "complemento": "",
        "bairro": "Piratininga",
        "localidade": "Osasco",
        "uf": "SP",
        "ibge": "3534401"
    }"#;

    fn provider_for(server: &MockServer) -> ViaCepProvider {
        let http = build_client(&HttpConfig::default()).unwrap();
        ViaCepProvider::new(http, format!("{}/ws/{{cep}}/json/", server.uri()))
    }

    #[test]
    fn test_field_mapping() {
        let raw: ViaCepResponse = serde_json::from_str(BODY).unwrap();
        let address: AddressResult = raw.into();
        assert_eq!(address.postal_code, "06233-030");
        assert_eq!(address.street, "Rua Paula Rodrigues");
        assert_eq!(address.district, "Piratininga");
        assert_eq!(address.city, "Osasco");
        assert_eq!(address.state_code, "SP");
    }

    #[test]
    fn test_erro_flag_variants() {
        let raw: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(raw.is_error());
        let raw: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(raw.is_error());
        let raw: ViaCepResponse = serde_json::from_str(BODY).unwrap();
        assert!(!raw.is_error());
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/06233-030/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let address = provider.lookup("06233-030").await.unwrap();
        assert_eq!(address.city, "Osasco");
        assert_eq!(provider.id().as_str(), VIACEP_NAME);
    }

    #[tokio::test]
    async fn test_lookup_unknown_cep_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"erro": true}"#))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider.lookup("99999-999").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound { ref cep, .. } if cep == "99999-999"));
    }

    #[tokio::test]
    async fn test_lookup_malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"cep\": "))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider.lookup("06233-030").await.unwrap_err();
        assert!(err.is_decode());
    }
}
