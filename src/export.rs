//! Client for the export endpoint of the pseudonymization service.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use snafu::ResultExt;

use crate::error::{Result, TransportSnafu};
use crate::http::{JSON_CONTENT_TYPE, execute_json, join_url};

/// A column pattern and the pseudonymization function applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PseudoRule {
    pub name: String,
    pub pattern: String,
    pub func: String,
}

impl PseudoRule {
    /// Name `(pattern, func)` pairs `rule-1`, `rule-2`, ... in the given order.
    pub fn numbered(pairs: &[(String, String)]) -> Vec<PseudoRule> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (pattern, func))| PseudoRule {
                name: format!("rule-{}", i + 1),
                pattern: pattern.clone(),
                func: func.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub dataset_path: String,
    /// Epoch milliseconds, resolved remotely against the closest version.
    pub dataset_timestamp: i64,
    pub column_selectors: Vec<String>,
    pub target_path: String,
    pub target_content_name: String,
    #[serde(serialize_with = "expose_secret")]
    pub target_password: SecretString,
    pub depseudonymize: bool,
    pub pseudo_rules: Vec<PseudoRule>,
}

fn expose_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub target_uri: String,
}

/// Facade against the dapla-pseudo-service API.
pub struct ExportClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl ExportClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token,
        }
    }

    pub async fn export(&self, request: &ExportRequest) -> Result<ExportResponse> {
        log::debug!(
            "export dataset_path={} timestamp={} depseudonymize={} rules={}",
            request.dataset_path,
            request.dataset_timestamp,
            request.depseudonymize,
            request.pseudo_rules.len()
        );
        let http_request = self.export_request(request)?;
        execute_json(&self.http, http_request).await
    }

    fn export_request(&self, request: &ExportRequest) -> Result<Request> {
        let url = join_url(&self.base_url, "export");
        self.http
            .post(&url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(request)
            .build()
            .context(TransportSnafu { url })
    }
}
