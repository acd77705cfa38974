//! Station lookup: city segments to stations, search and the index list.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::digitraffic::{StationMetadata, TrainFeed};

use super::cache::StationCache;
use super::error::StationError;
use super::filter::{passenger_station_sites, passenger_stations};
use super::sanitize::{normalize_for_match, sanitize_station_name};

/// Shared, refreshable station metadata.
///
/// Cloning is cheap; all clones see the same list. Readers take an
/// `Arc` snapshot so a refresh never blocks a page render halfway through.
#[derive(Clone)]
pub struct StationDirectory {
    inner: Arc<RwLock<Arc<Vec<StationMetadata>>>>,
    feed: TrainFeed,
    cache: Option<StationCache>,
}

impl StationDirectory {
    /// Load stations from the disk cache if fresh, else from the feed.
    ///
    /// A stale cache is used as a last resort when the feed fails. Fails
    /// only when neither source yields stations.
    pub async fn load(feed: TrainFeed, cache: Option<StationCache>) -> Result<Self, StationError> {
        if let Some(stations) = cache.as_ref().and_then(StationCache::load) {
            tracing::info!(count = stations.len(), "loaded stations from cache");
            return Ok(Self::with_stations(feed, cache, stations));
        }

        match fetch_and_store(&feed, cache.as_ref()).await {
            Ok(stations) => Ok(Self::with_stations(feed, cache, stations)),
            Err(e) => {
                let stale = cache.as_ref().and_then(StationCache::load_stale);
                match stale {
                    Some(stations) if !stations.is_empty() => {
                        tracing::warn!("station fetch failed, using stale cache: {e}");
                        Ok(Self::with_stations(feed, cache, stations))
                    }
                    _ => Err(e),
                }
            }
        }
    }

    /// Create a directory over a known station list.
    pub fn with_stations(
        feed: TrainFeed,
        cache: Option<StationCache>,
        stations: Vec<StationMetadata>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(stations))),
            feed,
            cache,
        }
    }

    /// The full station list as currently loaded.
    pub async fn snapshot(&self) -> Arc<Vec<StationMetadata>> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Resolve a URL-decoded city segment to a passenger station.
    pub async fn resolve(&self, city: &str) -> Option<StationMetadata> {
        resolve_city(&self.snapshot().await, city).cloned()
    }

    /// Passenger stations whose normalized name starts with the query, or
    /// whose code equals it, ordered by name.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<StationMetadata> {
        let needle = normalize_for_match(query);
        let code = query.trim().to_uppercase();

        let mut matches: Vec<StationMetadata> = passenger_stations(&self.snapshot().await)
            .into_iter()
            .filter(|s| {
                s.station_short_code == code
                    || (!needle.is_empty() && normalize_for_match(&s.station_name).starts_with(&needle))
            })
            .collect();

        matches.sort_by(|a, b| a.station_name.cmp(&b.station_name));
        matches.truncate(limit);
        matches
    }

    /// Stations listed on the index page, ordered by display name.
    pub async fn index(&self) -> Vec<StationMetadata> {
        let mut sites = passenger_station_sites(&self.snapshot().await);
        sites.sort_by_cached_key(|s| sanitize_station_name(&s.station_name));
        sites
    }

    /// Refresh from the feed.
    ///
    /// On success, replaces the current list. On failure, the existing list
    /// is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, StationError> {
        let stations = fetch_and_store(&self.feed, self.cache.as_ref()).await?;
        let count = stations.len();

        let mut guard = self.inner.write().await;
        *guard = Arc::new(stations);

        Ok(count)
    }
}

/// Find the passenger station whose normalized name equals the normalized city.
pub fn resolve_city<'a>(stations: &'a [StationMetadata], city: &str) -> Option<&'a StationMetadata> {
    let wanted = normalize_for_match(city);
    if wanted.is_empty() {
        return None;
    }

    stations
        .iter()
        .filter(|s| s.passenger_traffic)
        .find(|s| normalize_for_match(&s.station_name) == wanted)
}

async fn fetch_and_store(
    feed: &TrainFeed,
    cache: Option<&StationCache>,
) -> Result<Vec<StationMetadata>, StationError> {
    let stations = feed.fetch_stations().await?;
    if stations.is_empty() {
        return Err(StationError::Empty);
    }

    if let Some(cache) = cache
        && let Err(e) = cache.save(&stations)
    {
        tracing::warn!("failed to write station cache: {e}");
    }

    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitraffic::MockFeed;
    use crate::stations::StationCacheConfig;
    use tempfile::tempdir;

    const MOCK_DIR: &str = "data/mock";

    async fn directory() -> StationDirectory {
        let feed = TrainFeed::from(MockFeed::new(MOCK_DIR).unwrap());
        StationDirectory::load(feed, None).await.unwrap()
    }

    #[tokio::test]
    async fn resolve_is_case_and_diacritic_insensitive() {
        let dir = directory().await;

        let hki = dir.resolve("helsinki").await.unwrap();
        assert_eq!(hki.station_short_code, "HKI");

        let jy = dir.resolve("jyvaskyla").await.unwrap();
        assert_eq!(jy.station_short_code, "JY");

        let jy = dir.resolve("JYVÄSKYLÄ").await.unwrap();
        assert_eq!(jy.station_short_code, "JY");
    }

    #[tokio::test]
    async fn resolve_includes_stopping_points() {
        let dir = directory().await;
        let kap = dir.resolve("kapyla").await.unwrap();
        assert_eq!(kap.station_short_code, "KÄP");
    }

    #[tokio::test]
    async fn resolve_skips_non_passenger_and_unknown() {
        let dir = directory().await;
        assert!(dir.resolve("ilmala").await.is_none());
        assert!(dir.resolve("atlantis").await.is_none());
        assert!(dir.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn search_by_prefix_and_code() {
        let dir = directory().await;

        let by_prefix = dir.search("pas", 10).await;
        assert_eq!(by_prefix.len(), 1);
        assert_eq!(by_prefix[0].station_short_code, "PSL");

        let by_code = dir.search("tpe", 10).await;
        assert_eq!(by_code[0].station_short_code, "TPE");

        assert!(dir.search("", 10).await.is_empty());
    }

    #[tokio::test]
    async fn index_lists_only_full_stations() {
        let dir = directory().await;
        let index = dir.index().await;
        assert!(index.iter().any(|s| s.station_short_code == "HKI"));
        assert!(!index.iter().any(|s| s.station_short_code == "KÄP"));
        assert!(!index.iter().any(|s| s.station_short_code == "ILA"));
    }

    #[tokio::test]
    async fn load_writes_and_prefers_cache() {
        let tmp = tempdir().unwrap();
        let cache = StationCache::new(StationCacheConfig::new(tmp.path().join("stations.json")));
        let feed = TrainFeed::from(MockFeed::new(MOCK_DIR).unwrap());

        let dir = StationDirectory::load(feed, Some(cache.clone())).await.unwrap();
        assert!(cache.load().is_some());

        // A feed with no stations would fail, so success means the cache was used.
        let empty = TrainFeed::from(MockFeed::from_parts(vec![], vec![], vec![]));
        let cached = StationDirectory::load(empty, Some(cache)).await.unwrap();
        assert_eq!(cached.len().await, dir.len().await);
    }

    #[tokio::test]
    async fn load_fails_without_any_source() {
        let empty = TrainFeed::from(MockFeed::from_parts(vec![], vec![], vec![]));
        let result = StationDirectory::load(empty, None).await;
        assert!(matches!(result, Err(StationError::Empty)));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_existing_list() {
        let empty = TrainFeed::from(MockFeed::from_parts(vec![], vec![], vec![]));
        let stations = MockFeed::new(MOCK_DIR)
            .unwrap()
            .fetch_stations()
            .await
            .unwrap();
        let count = stations.len();

        let dir = StationDirectory::with_stations(empty, None, stations);
        assert!(dir.refresh().await.is_err());
        assert_eq!(dir.len().await, count);
    }
}
