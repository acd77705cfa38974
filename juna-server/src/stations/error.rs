//! Station directory error types.

use crate::digitraffic::DigitrafficError;

/// Errors that can occur when loading station metadata.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Fetching from the feed failed
    #[error("station fetch failed: {0}")]
    Feed(#[from] DigitrafficError),

    /// The feed answered with no stations at all
    #[error("station list is empty")]
    Empty,

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StationError::Empty;
        assert_eq!(err.to_string(), "station list is empty");

        let err = StationError::Cache {
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "cache error: disk full");

        let err = StationError::from(DigitrafficError::RateLimited);
        assert_eq!(
            err.to_string(),
            "station fetch failed: rate limited by Digitraffic API"
        );
    }
}
