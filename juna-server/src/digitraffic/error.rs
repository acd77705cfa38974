//! Digitraffic client error types.

/// Errors from the Digitraffic HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum DigitrafficError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by Digitraffic API")]
    RateLimited,

    /// Local mock data could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}
