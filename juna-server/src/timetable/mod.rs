//! Timetable board: raw trains to rows, formatting and table view.

mod format;
mod next_event;
mod row;
mod table;
mod transform;

pub use format::{
    FormattedTimes, delayed_time, format_clock, format_duration, format_times, travel_minutes,
};
pub use next_event::{NextEventSummary, NextEventTracker, select_next_event};
pub use row::DisplayRow;
pub use table::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, SortKey, SortOrder, TablePage, TableQuery, TimetableTable,
};
pub use transform::transform_trains;

#[cfg(test)]
pub(crate) use row::fixtures;
