//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::digitraffic::{DEFAULT_BASE_URL, DEFAULT_USER, DigitrafficConfig};
use crate::live::FeedConfig;
use crate::stations::StationCacheConfig;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,

    /// Digitraffic base URL.
    pub base_url: String,

    /// Sent as the `Digitraffic-User` header.
    pub user: String,

    /// Station metadata disk cache.
    pub station_cache: PathBuf,

    /// Serve from JSON files in this directory instead of the API.
    pub mock_dir: Option<PathBuf>,

    pub timetable_poll: Duration,

    pub location_poll: Duration,

    /// Idle time after which a live board is torn down.
    pub feed_idle: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: DEFAULT_BASE_URL.to_string(),
            user: DEFAULT_USER.to_string(),
            station_cache: PathBuf::from("stations_cache.json"),
            mock_dir: None,
            timetable_poll: Duration::from_secs(30),
            location_poll: Duration::from_secs(6),
            feed_idle: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults; set but unparsable ones fail.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("JUNA_BIND_ADDR") {
            config.bind_addr = value.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "JUNA_BIND_ADDR",
                value: value.clone(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(value) = get("DIGITRAFFIC_BASE_URL") {
            config.base_url = value;
        }
        if let Some(value) = get("DIGITRAFFIC_USER") {
            config.user = value;
        }
        if let Some(value) = get("JUNA_STATION_CACHE") {
            config.station_cache = PathBuf::from(value);
        }
        config.mock_dir = get("JUNA_MOCK_DIR").map(PathBuf::from);

        if let Some(value) = get("JUNA_TIMETABLE_POLL_SECS") {
            config.timetable_poll = parse_secs("JUNA_TIMETABLE_POLL_SECS", &value)?;
        }
        if let Some(value) = get("JUNA_LOCATION_POLL_SECS") {
            config.location_poll = parse_secs("JUNA_LOCATION_POLL_SECS", &value)?;
        }
        if let Some(value) = get("JUNA_FEED_IDLE_SECS") {
            config.feed_idle = parse_secs("JUNA_FEED_IDLE_SECS", &value)?;
        }

        Ok(config)
    }

    pub fn with_mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_dir = Some(dir.into());
        self
    }

    pub fn with_station_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.station_cache = path.into();
        self
    }

    /// Client settings. Requests time out within the shortest poll period,
    /// so a hung request fails before the poller would replace it.
    pub fn digitraffic(&self) -> DigitrafficConfig {
        let shortest_poll = self.timetable_poll.min(self.location_poll);
        DigitrafficConfig::new(&self.user)
            .with_base_url(&self.base_url)
            .with_timeout(shortest_poll.as_secs())
    }

    pub fn feeds(&self) -> FeedConfig {
        FeedConfig::default()
            .with_timetable_period(self.timetable_poll)
            .with_location_period(self.location_poll)
            .with_idle_timeout(self.feed_idle)
    }

    pub fn station_cache(&self) -> StationCacheConfig {
        StationCacheConfig::new(&self.station_cache)
    }
}

/// A positive number of seconds.
fn parse_secs(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    };

    let secs: u64 = value.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    if secs == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.user, "juna-server");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.station_cache, PathBuf::from("stations_cache.json"));
        assert!(config.mock_dir.is_none());
        assert_eq!(config.timetable_poll, Duration::from_secs(30));
        assert_eq!(config.location_poll, Duration::from_secs(6));
        assert_eq!(config.feed_idle, Duration::from_secs(300));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JUNA_BIND_ADDR", "0.0.0.0:8080"),
            ("DIGITRAFFIC_USER", "example/1.0"),
            ("JUNA_MOCK_DIR", "data/mock"),
            ("JUNA_TIMETABLE_POLL_SECS", "10"),
            ("JUNA_FEED_IDLE_SECS", " 60 "),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.user, "example/1.0");
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock")));
        assert_eq!(config.timetable_poll, Duration::from_secs(10));
        assert_eq!(config.feed_idle, Duration::from_secs(60));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = AppConfig::from_lookup(lookup(&[("JUNA_MOCK_DIR", "  ")])).unwrap();
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup(&[("JUNA_BIND_ADDR", "nope")])).unwrap_err();
        assert!(err.to_string().starts_with("JUNA_BIND_ADDR"));

        let err =
            AppConfig::from_lookup(lookup(&[("JUNA_LOCATION_POLL_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        assert!(AppConfig::from_lookup(lookup(&[("JUNA_FEED_IDLE_SECS", "-5")])).is_err());
    }

    #[test]
    fn derived_configs() {
        let config = AppConfig::default().with_station_cache("/tmp/s.json");
        assert_eq!(config.feeds().timetable_period, Duration::from_secs(30));
        assert_eq!(config.station_cache().path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.digitraffic().user, "juna-server");
    }

    #[test]
    fn request_timeout_fits_shortest_poll() {
        assert_eq!(AppConfig::default().digitraffic().timeout_secs, 6);

        let config = AppConfig::from_lookup(lookup(&[
            ("JUNA_TIMETABLE_POLL_SECS", "4"),
            ("JUNA_LOCATION_POLL_SECS", "9"),
        ]))
        .unwrap();
        assert_eq!(config.digitraffic().timeout_secs, 4);
    }
}
