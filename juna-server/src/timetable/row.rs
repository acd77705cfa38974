//! Display-ready timetable rows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Direction;

/// One arrival or departure at the board station, flattened for display.
///
/// Rows are rebuilt from scratch on every fetch; only `train_number`
/// identifies a row across fetches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    /// Where the journey ends (departures) or starts (arrivals), or the
    /// requested destination on route boards.
    pub station_name: String,

    #[serde(rename = "type")]
    pub direction: Direction,

    pub scheduled_time: DateTime<Utc>,

    pub live_estimate_time: Option<DateTime<Utc>>,

    /// Scheduled time at the station named by `station_name`.
    pub scheduled_final_destination: DateTime<Utc>,

    pub train_type: String,

    pub train_number: u32,

    pub train_category: String,

    pub commuter_line_id: Option<String>,

    pub commercial_track: String,

    pub cancelled: bool,
}

impl DisplayRow {
    /// Live estimate when known, otherwise the scheduled time.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.live_estimate_time.unwrap_or(self.scheduled_time)
    }

    pub fn is_commuter(&self) -> bool {
        self.train_category.eq_ignore_ascii_case("Commuter")
    }

    /// Label shown for the train: the commuter line letter when there is
    /// one, otherwise type and number ("IC 45").
    pub fn train_label(&self) -> String {
        match &self.commuter_line_id {
            Some(line) => line.clone(),
            None => format!("{} {}", self.train_type, self.train_number),
        }
    }
}
