//! HTTP client for the portfolio backend.
//!
//! Thin wrapper over reqwest: builds URLs against the configured base
//! address, decodes JSON bodies into the typed contracts, and turns
//! non-success responses into human-readable messages. No retry, no
//! client-side cache.

pub mod error;
pub mod types;

use anyhow::{Context, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub use error::ClientError;
use types::*;

/// API paths consumed by this client
pub mod paths {
    pub const ACTIVE_POSITIONS: &str = "/api/portfolio/active";
    pub const SELL: &str = "/api/portfolio/sell";
    pub const BUY: &str = "/api/portfolio/buy";
    pub const METRICS: &str = "/api/metrics";

    pub fn analyze(ticker: &str) -> String {
        format!("/api/analyze/{}", ticker)
    }
}

use crate::config::BackendConfig;

/// Backend API client. Cheap to clone the config in; the reqwest client
/// pools connections internally.
pub struct ApiClient {
    http: Client,
    config: BackendConfig,
}

impl ApiClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// GET `base_url + path` and decode the body as `T`
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.url_for(path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        Self::decode_response(response).await
    }

    /// POST a JSON-encoded `payload` to `base_url + path` and decode the
    /// body as `T`
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, ClientError> {
        let url = self.config.url_for(path);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(payload).send().await?;

        Self::decode_response(response).await
    }

    /// List current positions
    pub async fn active_positions(&self) -> Result<Vec<ActivePosition>, ClientError> {
        self.fetch_json(paths::ACTIVE_POSITIONS).await
    }

    /// On-demand analysis for a ticker. The caller is expected to have
    /// normalized the symbol already; it lands in the path verbatim.
    pub async fn analyze(&self, ticker: &str) -> Result<AnalyzeResponse, ClientError> {
        self.fetch_json(&paths::analyze(ticker)).await
    }

    /// Performance snapshot
    pub async fn metrics(&self) -> Result<MetricsResponse, ClientError> {
        self.fetch_json(paths::METRICS).await
    }

    /// Submit a sell request
    pub async fn sell(&self, request: &SellRequest) -> Result<SellResponse, ClientError> {
        self.post_json(paths::SELL, request).await
    }

    /// Submit a buy request. The backend does not promise a shape for the
    /// response, so it is passed through as raw JSON for display.
    pub async fn buy(&self, request: &BuyRequest) -> Result<Value, ClientError> {
        self.post_json(paths::BUY, request).await
    }

    async fn decode_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Request failed - Status: {}, Body: {}", status, body);
            return Err(ClientError::from_status(
                status.as_u16(),
                extract_detail(&body),
            ));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull the optional `{"detail": "..."}` message out of an error body.
/// An unparseable body is treated as no message at all.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_present() {
        assert_eq!(
            extract_detail(r#"{"detail": "not found"}"#),
            Some("not found".to_string())
        );
    }

    #[test]
    fn test_extract_detail_unparseable_body() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn test_extract_detail_missing_field() {
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
    }

    #[test]
    fn test_status_fallback_message() {
        let error = ClientError::from_status(500, None);
        assert_eq!(error.to_string(), "Request failed: 500");

        let error = ClientError::from_status(404, Some("not found".to_string()));
        assert_eq!(error.to_string(), "not found");

        // Empty detail also falls back to the status-code message
        let error = ClientError::from_status(502, Some(String::new()));
        assert_eq!(error.to_string(), "Request failed: 502");
    }

    #[test]
    fn test_analyze_path_segment() {
        assert_eq!(paths::analyze("AAPL"), "/api/analyze/AAPL");
    }
}
