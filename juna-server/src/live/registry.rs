//! Registry of running pollers, one per board or tracked train.
//!
//! Boards are created on first request and evicted once no request has
//! touched them for the idle period. Eviction drops the poll handle, which
//! stops the poller.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;

use crate::digitraffic::{FetchOutcome, TrainFeed, TrainLocation};
use crate::domain::{Direction, StationCode};
use crate::stations::StationDirectory;
use crate::timetable::{DisplayRow, NextEventSummary, NextEventTracker, transform_trains};

use super::poller::{PollHandle, Poller};

/// Configuration for the live feeds.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Poll period for timetable boards.
    pub timetable_period: Duration,

    /// Poll period for train locations.
    pub location_period: Duration,

    /// Boards and trains untouched for this long are torn down.
    pub idle_timeout: Duration,

    /// Maximum number of concurrent boards.
    pub max_boards: u64,

    /// Maximum number of trains tracked at once. Any client can start a
    /// location poller, so this stays well below `max_boards`.
    pub max_trains: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timetable_period: Duration::from_secs(30),
            location_period: Duration::from_secs(6),
            idle_timeout: Duration::from_secs(300),
            max_boards: 1000,
            max_trains: 50,
        }
    }
}

impl FeedConfig {
    pub fn with_timetable_period(mut self, period: Duration) -> Self {
        self.timetable_period = period;
        self
    }

    pub fn with_location_period(mut self, period: Duration) -> Self {
        self.location_period = period;
        self
    }

    pub fn with_idle_timeout(mut self, idle: Duration) -> Self {
        self.idle_timeout = idle;
        self
    }
}

/// Identifies one live board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey {
    pub station: StationCode,
    pub direction: Direction,
    /// Route boards list only trains that also call here.
    pub destination: Option<StationCode>,
}

impl BoardKey {
    pub fn station(station: StationCode, direction: Direction) -> Self {
        Self {
            station,
            direction,
            destination: None,
        }
    }

    pub fn route(from: StationCode, to: StationCode) -> Self {
        Self {
            station: from,
            direction: Direction::Departure,
            destination: Some(to),
        }
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(to) => write!(f, "{}->{}", self.station, to),
            None => write!(f, "{}/{}", self.station, self.direction.as_query()),
        }
    }
}

/// A polled board and its memoized next-train summary.
pub struct LiveBoard {
    handle: PollHandle<Vec<DisplayRow>>,
    next: Mutex<NextEventTracker>,
}

impl LiveBoard {
    /// Current rows, waiting up to `wait` for the first fetch.
    ///
    /// Empty when no fetch has completed in time.
    pub async fn rows(&self, wait: Duration) -> Arc<Vec<DisplayRow>> {
        self.handle
            .ready(wait)
            .await
            .map(|snapshot| snapshot.data)
            .unwrap_or_default()
    }

    /// Time of the latest completed fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.handle.latest().map(|snapshot| snapshot.fetched_at)
    }

    /// Next train for `rows` as of `now`.
    pub fn next_event(
        &self,
        rows: &Arc<Vec<DisplayRow>>,
        now: DateTime<Utc>,
    ) -> Option<NextEventSummary> {
        let mut tracker = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        tracker.update(rows, now);
        tracker.current().cloned()
    }
}

type LocationHandle = PollHandle<Option<TrainLocation>>;

/// All running live feeds.
#[derive(Clone)]
pub struct LiveFeeds {
    feed: TrainFeed,
    stations: StationDirectory,
    config: FeedConfig,
    boards: MokaCache<BoardKey, Arc<LiveBoard>>,
    locations: MokaCache<u32, LocationHandle>,
}

impl LiveFeeds {
    pub fn new(feed: TrainFeed, stations: StationDirectory, config: FeedConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_boards)
            .build();
        let locations = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_trains)
            .build();

        Self {
            feed,
            stations,
            config,
            boards,
            locations,
        }
    }

    /// The board for `key`, starting its poller on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn board(&self, key: BoardKey) -> Arc<LiveBoard> {
        self.boards
            .get_with(key.clone(), async { Arc::new(self.start_board(key)) })
            .await
    }

    /// Latest known position of a train, waiting up to `wait` for the
    /// first fetch.
    pub async fn location(&self, train_number: u32, wait: Duration) -> Option<TrainLocation> {
        let handle = self
            .locations
            .get_with(train_number, async { self.start_location(train_number) })
            .await;

        handle
            .ready(wait)
            .await
            .and_then(|snapshot| (*snapshot.data).clone())
    }

    fn start_board(&self, key: BoardKey) -> LiveBoard {
        tracing::info!(board = %key, "starting timetable poller");

        let feed = self.feed.clone();
        let stations = self.stations.clone();
        let poller = Poller::new(key.to_string(), self.config.timetable_period);

        let handle = poller.spawn(move || {
            let feed = feed.clone();
            let stations = stations.clone();
            let key = key.clone();
            async move { fetch_board(&feed, &stations, &key).await }
        });

        LiveBoard {
            handle,
            next: Mutex::new(NextEventTracker::new()),
        }
    }

    fn start_location(&self, train_number: u32) -> LocationHandle {
        tracing::info!(train = train_number, "starting location poller");

        let feed = self.feed.clone();
        let poller = Poller::new(format!("train {train_number}"), self.config.location_period);

        poller.spawn(move || {
            let feed = feed.clone();
            async move {
                let result = feed.latest_location(train_number).await;
                FetchOutcome::degrade(result, "train location")
                    .into_iter()
                    .max_by_key(|location| location.timestamp)
            }
        })
    }
}

/// One poll cycle of a board: fetch, degrade failures to nothing, transform.
async fn fetch_board(feed: &TrainFeed, stations: &StationDirectory, key: &BoardKey) -> Vec<DisplayRow> {
    let result = match &key.destination {
        Some(to) => feed.live_trains_between(&key.station, to).await,
        None => feed.live_trains_at(&key.station, key.direction).await,
    };
    let trains = FetchOutcome::degrade(result, &format!("live trains {key}"));

    transform_trains(
        &trains,
        &key.station,
        key.destination.as_ref(),
        key.direction,
        &stations.snapshot().await,
    )
}
