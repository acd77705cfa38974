//! Timetable direction (arrivals vs departures).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction: {0}")]
pub struct InvalidDirection(String);

/// Whether a timetable row is the train arriving at or departing from a station.
///
/// The wire form used by Digitraffic is `ARRIVAL` / `DEPARTURE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Arrival,
    #[default]
    Departure,
}

impl Direction {
    /// Upstream wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Arrival => "ARRIVAL",
            Direction::Departure => "DEPARTURE",
        }
    }

    /// Lowercase plural form used in URLs (`arrivals`, `departures`).
    pub fn as_query(&self) -> &'static str {
        match self {
            Direction::Arrival => "arrivals",
            Direction::Departure => "departures",
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    /// Accepts the wire form and the singular/plural lowercase URL forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" | "arrivals" => Ok(Direction::Arrival),
            "departure" | "departures" => Ok(Direction::Departure),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
