//! Application state for the web layer.

use std::time::Duration;

use crate::live::LiveFeeds;
use crate::stations::StationDirectory;

/// How long a request waits for a new board's first fetch.
const DEFAULT_FIRST_FETCH_WAIT: Duration = Duration::from_secs(10);

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station metadata, refreshed in the background
    pub stations: StationDirectory,

    /// Running timetable and location pollers
    pub feeds: LiveFeeds,

    /// Upper bound on waiting for a poller's first snapshot
    pub first_fetch_wait: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stations: StationDirectory, feeds: LiveFeeds) -> Self {
        Self {
            stations,
            feeds,
            first_fetch_wait: DEFAULT_FIRST_FETCH_WAIT,
        }
    }
}
