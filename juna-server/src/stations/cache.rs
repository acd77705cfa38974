//! Disk cache for station metadata.
//!
//! The station list changes rarely, so it is written to disk after every
//! successful fetch and reused across restarts while it is fresh. A stale
//! copy is still better than nothing when Digitraffic is unreachable at
//! startup.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::digitraffic::StationMetadata;

use super::error::StationError;

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    stations: Vec<StationMetadata>,
}

/// Configuration for the station disk cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache counts as fresh.
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Create a new cache config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new("stations_cache.json")
    }
}

/// Disk cache for station metadata.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Load stations if the cache exists, parses and is still fresh.
    pub fn load(&self) -> Option<Vec<StationMetadata>> {
        let cached = self.read()?;
        let age_secs = now_secs().ok()?.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            tracing::debug!(age_secs, "station cache expired");
            return None;
        }
        Some(cached.stations)
    }

    /// Load stations regardless of age.
    pub fn load_stale(&self) -> Option<Vec<StationMetadata>> {
        self.read().map(|cached| cached.stations)
    }

    /// Save stations, creating parent directories as needed.
    pub fn save(&self, stations: &[StationMetadata]) -> Result<(), StationError> {
        let cached = CachedStations {
            cached_at_secs: now_secs()?,
            stations: stations.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StationError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        let json = serde_json::to_string(&cached).map_err(|e| StationError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| StationError::Cache {
            message: format!("failed to write cache file: {}", e),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn read(&self) -> Option<CachedStations> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!("ignoring unreadable station cache {}: {e}", self.path().display());
                None
            }
        }
    }
}

fn now_secs() -> Result<u64, StationError> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| StationError::Cache {
            message: "system time before unix epoch".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitraffic::StationType;
    use tempfile::tempdir;

    fn station(code: &str, name: &str) -> StationMetadata {
        StationMetadata {
            station_name: name.to_string(),
            station_short_code: code.to_string(),
            station_uic_code: 1,
            passenger_traffic: true,
            station_type: StationType::Station,
            country_code: "FI".to_string(),
            latitude: 60.17,
            longitude: 24.94,
        }
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache = StationCache::new(StationCacheConfig::new(dir.path().join("stations.json")));

        let stations = vec![
            station("HKI", "Helsinki asema"),
            station("TPE", "Tampere asema"),
        ];
        cache.save(&stations).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded, stations);
    }

    #[test]
    fn expired_cache_only_loads_stale() {
        let dir = tempdir().unwrap();
        let config = StationCacheConfig::new(dir.path().join("stations.json"))
            .with_ttl(Duration::from_secs(0));
        let cache = StationCache::new(config);

        cache.save(&[station("HKI", "Helsinki asema")]).unwrap();

        // With 0 TTL the cache is immediately expired
        assert!(cache.load().is_none());
        assert_eq!(cache.load_stale().unwrap().len(), 1);
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = StationCache::new(StationCacheConfig::new("/nonexistent/path/stations.json"));
        assert!(cache.load().is_none());
        assert!(cache.load_stale().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, "not json").unwrap();

        let cache = StationCache::new(StationCacheConfig::new(&path));
        assert!(cache.load_stale().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("stations.json");
        let cache = StationCache::new(StationCacheConfig::new(&path));

        cache.save(&[station("HKI", "Helsinki asema")]).unwrap();
        assert!(path.exists());
    }
}
