//! Digitraffic rail API response DTOs.
//!
//! These types map directly to the JSON returned by `rata.digitraffic.fi`.
//! Optional fields are `Option` because the API omits them rather than
//! sending nulls for trains that have not been estimated yet.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// Station record from `/metadata/stations`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationMetadata {
    /// Full name as published, e.g. "Helsinki asema".
    pub station_name: String,

    /// Short code, unique per station (e.g. "HKI").
    pub station_short_code: String,

    /// Numeric UIC code.
    #[serde(rename = "stationUICCode", default)]
    pub station_uic_code: u32,

    /// Whether the station serves passengers.
    pub passenger_traffic: bool,

    #[serde(rename = "type")]
    pub station_type: StationType,

    pub country_code: String,

    pub latitude: f64,

    pub longitude: f64,
}

/// Kind of station record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationType {
    Station,
    StoppingPoint,
    TurnoutInTheOpenLine,
    #[serde(other)]
    Other,
}

/// A train with its full timetable, from the live-trains endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrain {
    pub train_number: u32,

    pub departure_date: NaiveDate,

    /// Train type code, e.g. "IC", "S", "HL".
    pub train_type: String,

    /// Category, e.g. "Long-distance", "Commuter".
    pub train_category: String,

    /// Commuter line letter (e.g. "R"); empty or missing for other trains.
    #[serde(rename = "commuterLineID", default)]
    pub commuter_line_id: Option<String>,

    #[serde(default)]
    pub operator_short_code: Option<String>,

    #[serde(default)]
    pub running_currently: bool,

    pub cancelled: bool,

    /// Stops in journey order.
    pub time_table_rows: Vec<RawTimeTableRow>,
}

/// One scheduled arrival or departure within a train's journey.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeTableRow {
    pub station_short_code: String,

    #[serde(rename = "type")]
    pub direction: Direction,

    pub scheduled_time: DateTime<Utc>,

    /// Upstream's predicted actual time, once available.
    #[serde(default)]
    pub live_estimate_time: Option<DateTime<Utc>>,

    /// Actual time, once the train has passed.
    #[serde(default)]
    pub actual_time: Option<DateTime<Utc>>,

    pub train_stopping: bool,

    #[serde(default)]
    pub commercial_stop: Option<bool>,

    pub cancelled: bool,

    #[serde(default)]
    pub commercial_track: String,

    #[serde(default)]
    pub difference_in_minutes: Option<i64>,
}

/// Logical error returned by the API instead of a train list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: Option<String>,

    pub error_message: String,

    #[serde(default)]
    pub query_string: Option<String>,
}

/// Latest position report for a train, from `/train-locations/latest/{n}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainLocation {
    pub train_number: u32,

    pub departure_date: NaiveDate,

    pub timestamp: DateTime<Utc>,

    pub location: GeoPoint,

    /// Speed in km/h.
    pub speed: u32,

    /// Position accuracy in metres.
    #[serde(default)]
    pub accuracy: Option<u32>,
}

/// GeoJSON point; coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,

    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

impl RawTrain {
    /// Whether this train belongs to the commuter rail category.
    pub fn is_commuter(&self) -> bool {
        self.train_category.eq_ignore_ascii_case("Commuter")
    }

    /// Non-empty commuter line letter, if any.
    pub fn commuter_line(&self) -> Option<&str> {
        self.commuter_line_id
            .as_deref()
            .filter(|line| !line.trim().is_empty())
    }
}
