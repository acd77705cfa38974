//! The "next train" summary shown beside the timetable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::row::DisplayRow;

/// Fields of the soonest upcoming row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEventSummary {
    pub station_next_name: String,
    pub station_next_timestamp: DateTime<Utc>,
    pub station_next_train_type: String,
    pub station_next_train_number: u32,
    pub station_next_train_track: String,
}

impl From<&DisplayRow> for NextEventSummary {
    fn from(row: &DisplayRow) -> Self {
        Self {
            station_next_name: row.station_name.clone(),
            station_next_timestamp: row.scheduled_time,
            station_next_train_type: row.train_type.clone(),
            station_next_train_number: row.train_number,
            station_next_train_track: row.commercial_track.clone(),
        }
    }
}

/// Pick the first row scheduled strictly after `now`.
///
/// When every row is in the past the earliest row is returned, so the
/// summary only goes empty when there are no rows at all.
pub fn select_next_event(rows: &[DisplayRow], now: DateTime<Utc>) -> Option<NextEventSummary> {
    let mut sorted: Vec<&DisplayRow> = rows.iter().collect();
    sorted.sort_by_key(|row| row.scheduled_time);

    sorted
        .iter()
        .find(|row| row.scheduled_time > now)
        .or_else(|| sorted.first())
        .map(|row| NextEventSummary::from(*row))
}

/// Memoized [`select_next_event`].
///
/// Recomputes only when the row list is a different allocation, the clock
/// has moved into a new minute, or `now` has reached the selected event.
#[derive(Debug, Default)]
pub struct NextEventTracker {
    rows: Option<Arc<Vec<DisplayRow>>>,
    minute: Option<i64>,
    selected: Option<NextEventSummary>,
}

impl NextEventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the selection up to date; returns `true` if it was recomputed.
    pub fn update(&mut self, rows: &Arc<Vec<DisplayRow>>, now: DateTime<Utc>) -> bool {
        let minute = now.timestamp().div_euclid(60);

        let same_rows = self
            .rows
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, rows));
        let same_minute = self.minute == Some(minute);
        let passed = self
            .selected
            .as_ref()
            .is_some_and(|s| s.station_next_timestamp <= now);

        if same_rows && same_minute && !passed {
            return false;
        }

        self.selected = select_next_event(rows, now);
        self.rows = Some(Arc::clone(rows));
        self.minute = Some(minute);
        true
    }

    /// The current selection.
    pub fn current(&self) -> Option<&NextEventSummary> {
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::row::fixtures::{at, row};
    use chrono::Duration;

    fn rows() -> Vec<DisplayRow> {
        vec![
            row("Tampere", 1, 9, 0),
            row("Turku", 2, 9, 30),
            row("Oulu", 3, 8, 45),
        ]
    }

    #[test]
    fn selects_first_future_row() {
        let next = select_next_event(&rows(), at(9, 10)).unwrap();
        assert_eq!(next.station_next_name, "Turku");
        assert_eq!(next.station_next_timestamp, at(9, 30));
        assert_eq!(next.station_next_train_number, 2);
    }

    #[test]
    fn strictly_after_now() {
        let next = select_next_event(&rows(), at(9, 0)).unwrap();
        assert_eq!(next.station_next_train_number, 2);
    }

    #[test]
    fn falls_back_to_earliest_when_all_past() {
        let next = select_next_event(&rows(), at(10, 0)).unwrap();
        assert_eq!(next.station_next_name, "Oulu");
        assert_eq!(next.station_next_timestamp, at(8, 45));
    }

    #[test]
    fn empty_rows_give_none() {
        assert!(select_next_event(&[], at(10, 0)).is_none());
    }

    #[test]
    fn summary_copies_track_and_type() {
        let mut r = row("Tampere", 45, 9, 0);
        r.commercial_track = "8".to_string();
        r.train_type = "S".to_string();
        let next = select_next_event(&[r], at(8, 0)).unwrap();
        assert_eq!(next.station_next_train_track, "8");
        assert_eq!(next.station_next_train_type, "S");
    }

    #[test]
    fn tracker_skips_recompute_within_minute() {
        let rows = Arc::new(rows());
        let mut tracker = NextEventTracker::new();

        assert!(tracker.update(&rows, at(9, 10)));
        assert!(!tracker.update(&rows, at(9, 10) + Duration::seconds(20)));
        assert_eq!(tracker.current().unwrap().station_next_train_number, 2);
    }

    #[test]
    fn tracker_recomputes_on_new_minute() {
        let rows = Arc::new(rows());
        let mut tracker = NextEventTracker::new();

        tracker.update(&rows, at(9, 10));
        assert!(tracker.update(&rows, at(9, 11)));
    }

    #[test]
    fn tracker_recomputes_on_new_rows() {
        let mut tracker = NextEventTracker::new();
        tracker.update(&Arc::new(rows()), at(9, 10));

        // Equal contents, different allocation.
        let fresh = Arc::new(rows());
        assert!(tracker.update(&fresh, at(9, 10)));
    }

    #[test]
    fn tracker_recomputes_when_event_passes() {
        let mut first = row("Tampere", 1, 9, 10);
        first.scheduled_time += Duration::seconds(20);
        let rows = Arc::new(vec![first, row("Turku", 2, 9, 40)]);
        let mut tracker = NextEventTracker::new();

        tracker.update(&rows, at(9, 10) + Duration::seconds(5));
        assert_eq!(tracker.current().unwrap().station_next_train_number, 1);

        // Same minute and same rows, but the selected event is now due.
        assert!(tracker.update(&rows, at(9, 10) + Duration::seconds(25)));
        assert_eq!(tracker.current().unwrap().station_next_train_number, 2);
    }
}
