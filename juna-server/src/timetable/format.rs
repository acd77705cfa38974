//! Localized clock times, delays and travel durations.
//!
//! All times are shown in Finnish local time regardless of the viewer's
//! locale; the locale only picks separators and unit labels.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Europe::Helsinki;
use serde::Serialize;

use crate::domain::Locale;

/// Live estimates this far past schedule, or less, are not shown as delays.
const DELAY_THRESHOLD_MS: i64 = 60_000;

/// Formatted time fields of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTimes {
    /// Scheduled clock time.
    pub scheduled: String,
    /// Live estimate, only when it is more than a minute late.
    pub delayed: Option<String>,
    /// Whole minutes between this stop and the far end of the journey.
    pub travel_minutes: i64,
    /// `travel_minutes` as "1 h 48 min".
    pub duration: String,
}

/// Format a row's times for display.
pub fn format_times(
    scheduled: DateTime<Utc>,
    live_estimate: Option<DateTime<Utc>>,
    final_destination: DateTime<Utc>,
    locale: Locale,
) -> FormattedTimes {
    let travel_minutes = travel_minutes(scheduled, final_destination);

    FormattedTimes {
        scheduled: format_clock(scheduled, locale),
        delayed: delayed_time(scheduled, live_estimate).map(|t| format_clock(t, locale)),
        travel_minutes,
        duration: format_duration(travel_minutes, locale),
    }
}

/// Hour and minute in Helsinki time, e.g. "08.05" (fi) or "08:05" (en, sv).
pub fn format_clock(time: DateTime<Utc>, locale: Locale) -> String {
    let local = time.with_timezone(&Helsinki);
    format!(
        "{:02}{}{:02}",
        local.hour(),
        locale.clock_separator(),
        local.minute()
    )
}

/// The live estimate, if it is more than one minute behind schedule.
pub fn delayed_time(
    scheduled: DateTime<Utc>,
    live_estimate: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    live_estimate.filter(|live| (*live - scheduled).num_milliseconds() > DELAY_THRESHOLD_MS)
}

/// Whole minutes between two stops of a journey, in either order.
///
/// Unsigned on purpose: a signed floor of `final - scheduled` would be
/// negative on arrival boards, whose final stop is the journey's origin.
pub fn travel_minutes(scheduled: DateTime<Utc>, final_destination: DateTime<Utc>) -> i64 {
    (final_destination - scheduled).num_milliseconds().abs() / 60_000
}

/// "1 h 48 min", "2 h", "35 min" with locale unit labels.
pub fn format_duration(minutes: i64, locale: Locale) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("{} {}", m, locale.minute_unit()),
        (h, 0) => format!("{} {}", h, locale.hour_unit()),
        (h, m) => format!(
            "{} {} {} {}",
            h,
            locale.hour_unit(),
            m,
            locale.minute_unit()
        ),
    }
}
