//! Backend connection configuration.
//!
//! The base URL is resolved once at startup (CLI flag, then environment,
//! then the local default) and threaded explicitly into the HTTP client.
//! There is no module-global resolver and no runtime mutation.

use anyhow::{Context, Result};
use url::Url;

/// Environment variable selecting the backend base URL
pub const BACKEND_URL_ENV: &str = "FOLIOTERM_BACKEND_URL";

/// Default backend address when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Resolved backend configuration, immutable for the process lifetime
#[derive(Clone, Debug)]
pub struct BackendConfig {
    base_url: String,
}

impl BackendConfig {
    /// Resolve the base URL: explicit override first, then the
    /// environment variable, then the local default.
    pub fn resolve(override_url: Option<&str>) -> Result<Self> {
        let raw = match override_url {
            Some(url) => url.to_string(),
            None => std::env::var(BACKEND_URL_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        };

        let parsed = Url::parse(&raw)
            .with_context(|| format!("Invalid backend URL: {}", raw))?;

        // Keep the configured form but without a trailing slash so that
        // joining "/api/..." paths never doubles the separator.
        let mut base_url = parsed.to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url })
    }

    /// The backend base URL, no trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path ("/api/metrics" etc.). This is also the
    /// cache key identity used by polling subscriptions.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
