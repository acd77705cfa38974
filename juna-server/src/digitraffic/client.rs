//! Digitraffic rail API HTTP client.
//!
//! Provides async methods for the live-trains, train-locations and station
//! metadata endpoints. Live-train responses are decoded into a
//! [`FetchOutcome`] so upstream error payloads are told apart here.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::domain::{Direction, StationCode};

use super::error::DigitrafficError;
use super::outcome::FetchOutcome;
use super::types::{RawTrain, StationMetadata, TrainLocation};

/// Default base URL for the Digitraffic rail API.
pub const DEFAULT_BASE_URL: &str = "https://rata.digitraffic.fi/api/v1";

/// Default value of the `Digitraffic-User` header.
pub const DEFAULT_USER: &str = "juna-server";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default number of trains requested per live board.
pub const DEFAULT_BOARD_SIZE: u16 = 40;

/// Configuration for the Digitraffic client.
#[derive(Debug, Clone)]
pub struct DigitrafficConfig {
    /// Identifies this application to Digitraffic
    pub user: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Trains requested per live board
    pub board_size: u16,
}

impl DigitrafficConfig {
    /// Create a new config with the given `Digitraffic-User` value.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            board_size: DEFAULT_BOARD_SIZE,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of trains requested per board.
    pub fn with_board_size(mut self, n: u16) -> Self {
        self.board_size = n;
        self
    }
}

impl Default for DigitrafficConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER)
    }
}

/// Digitraffic rail API client.
///
/// Uses a semaphore to limit concurrent requests; Digitraffic throttles
/// clients that open too many connections.
#[derive(Debug, Clone)]
pub struct DigitrafficClient {
    http: reqwest::Client,
    base_url: String,
    board_size: u16,
    semaphore: Arc<Semaphore>,
}

impl DigitrafficClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DigitrafficConfig) -> Result<Self, DigitrafficError> {
        let mut headers = HeaderMap::new();

        let user = HeaderValue::from_str(&config.user).map_err(|_| DigitrafficError::Api {
            status: 0,
            message: "Invalid Digitraffic-User header value".to_string(),
        })?;
        headers.insert("digitraffic-user", user);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            board_size: config.board_size,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch the full station metadata list.
    pub async fn fetch_stations(&self) -> Result<Vec<StationMetadata>, DigitrafficError> {
        let body = self.get("/metadata/stations", &[]).await?;
        serde_json::from_str(&body).map_err(|e| DigitrafficError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Live trains arriving at or departing from a station.
    ///
    /// Only the requested direction is asked for; the other counts are zero.
    pub async fn live_trains_at(
        &self,
        station: &StationCode,
        direction: Direction,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        let (arriving, departing) = match direction {
            Direction::Arrival => (self.board_size, 0),
            Direction::Departure => (0, self.board_size),
        };

        let path = format!("/live-trains/station/{}", station.as_str());
        let body = self
            .get(
                &path,
                &[
                    ("arrived_trains", "0".to_string()),
                    ("arriving_trains", arriving.to_string()),
                    ("departed_trains", "0".to_string()),
                    ("departing_trains", departing.to_string()),
                    ("include_nonstopping", "false".to_string()),
                ],
            )
            .await?;

        FetchOutcome::from_body(&body)
    }

    /// Live trains running from one station to another.
    pub async fn live_trains_between(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        let path = format!("/live-trains/station/{}/{}", from.as_str(), to.as_str());
        let body = self
            .get(
                &path,
                &[
                    ("limit", self.board_size.to_string()),
                    ("include_nonstopping", "false".to_string()),
                ],
            )
            .await?;

        FetchOutcome::from_body(&body)
    }

    /// Latest location report for a train.
    pub async fn latest_location(
        &self,
        train_number: u32,
    ) -> Result<FetchOutcome<Vec<TrainLocation>>, DigitrafficError> {
        let path = format!("/train-locations/latest/{train_number}");
        let body = self.get(&path, &[]).await?;
        FetchOutcome::from_body(&body)
    }

    /// Issue a GET request and return the body of a successful response.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, DigitrafficError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DigitrafficError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "digitraffic request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DigitrafficError::RateLimited);
        }

        // Live-trains reports "not found" as 404 with an error payload body,
        // which the caller decodes into FetchOutcome::Upstream.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(DigitrafficError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
