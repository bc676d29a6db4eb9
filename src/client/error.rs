use thiserror::Error;

/// Errors surfaced by the backend API client.
///
/// Both variants carry a human-readable message only; no structured
/// error code reaches the UI layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying transport failed (connection refused, DNS, timeout)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body did not match the declared contract
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Build the non-success variant, preferring the backend's `detail`
    /// message and falling back to a status-code message.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Request failed: {}", status));
        ClientError::Api { status, message }
    }
}
