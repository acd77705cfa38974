//! Tagged result of a live-trains request.
//!
//! The live-trains endpoints answer with either a JSON array of trains or an
//! error object such as `{"code": "TRAIN_NOT_FOUND", "errorMessage": ...}`,
//! both with status 200 in some cases. The shape is decided here, once, so
//! nothing downstream has to inspect raw JSON.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::DigitrafficError;
use super::types::ErrorPayload;

/// Either the requested data or a logical error reported by the API.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Upstream(ErrorPayload),
}

impl<T> FetchOutcome<T> {
    /// Decode a response body.
    ///
    /// A body is an error payload iff it is an object with a non-null
    /// `errorMessage` field; anything else must deserialize as `T`.
    pub fn from_body(body: &str) -> Result<Self, DigitrafficError>
    where
        T: DeserializeOwned,
    {
        let value: Value = serde_json::from_str(body).map_err(|e| json_error(e, body))?;

        let is_error = value
            .get("errorMessage")
            .is_some_and(|message| !message.is_null());

        if is_error {
            let payload = serde_json::from_value(value).map_err(|e| json_error(e, body))?;
            return Ok(FetchOutcome::Upstream(payload));
        }

        let data = serde_json::from_value(value).map_err(|e| json_error(e, body))?;
        Ok(FetchOutcome::Data(data))
    }

    pub fn is_upstream_error(&self) -> bool {
        matches!(self, FetchOutcome::Upstream(_))
    }
}

impl<T: Default> FetchOutcome<T> {
    /// Collapse a fetch result to its data, degrading every failure to an
    /// empty value. Failures are logged, not propagated.
    pub fn degrade(result: Result<Self, DigitrafficError>, what: &str) -> T {
        match result {
            Ok(FetchOutcome::Data(data)) => data,
            Ok(FetchOutcome::Upstream(payload)) => {
                tracing::warn!(
                    code = payload.code.as_deref().unwrap_or(""),
                    query = payload.query_string.as_deref().unwrap_or(""),
                    "{what}: upstream error: {}",
                    payload.error_message
                );
                T::default()
            }
            Err(e) => {
                tracing::warn!("{what}: fetch failed: {e}");
                T::default()
            }
        }
    }
}

fn json_error(e: serde_json::Error, body: &str) -> DigitrafficError {
    DigitrafficError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    }
}
