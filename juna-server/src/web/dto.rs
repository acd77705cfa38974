//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digitraffic::{StationMetadata, TrainLocation};
use crate::domain::{Direction, Locale};
use crate::stations::sanitize_station_name;
use crate::timetable::{DisplayRow, FormattedTimes, NextEventSummary, TablePage, format_times};

/// Query for the station search API.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Name prefix or station code
    #[serde(default)]
    pub q: String,

    /// Maximum number of results
    pub limit: Option<usize>,
}

/// A station in search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    /// Short code, e.g. "HKI"
    pub code: String,

    /// Display name with the "asema" suffix removed
    pub name: String,

    /// Path of the station's timetable page
    pub href: String,
}

impl StationResult {
    pub fn from_station(station: &StationMetadata) -> Self {
        let name = sanitize_station_name(&station.station_name);
        Self {
            code: station.station_short_code.clone(),
            href: station_href(&name),
            name,
        }
    }
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationResult>,
}

/// Board selection parameters shared by the timetable pages.
#[derive(Debug, Default, Deserialize)]
pub struct BoardParams {
    /// "departures" (default) or "arrivals"
    pub direction: Option<String>,

    /// Display language: fi (default), sv or en
    pub lang: Option<String>,
}

/// A timetable row with its localized times.
#[derive(Debug, Serialize)]
pub struct TimetableRowResult {
    #[serde(flatten)]
    pub row: DisplayRow,

    #[serde(flatten)]
    pub times: FormattedTimes,
}

impl TimetableRowResult {
    pub fn from_row(row: &DisplayRow, locale: Locale) -> Self {
        Self {
            times: format_times(
                row.scheduled_time,
                row.live_estimate_time,
                row.scheduled_final_destination,
                locale,
            ),
            row: row.clone(),
        }
    }
}

/// JSON form of a timetable page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    pub station: StationResult,
    pub destination: Option<StationResult>,
    pub direction: Direction,
    pub locale: &'static str,
    pub rows: Vec<TimetableRowResult>,
    pub page: usize,
    pub per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub train_types: Vec<String>,
    pub next_event: Option<NextEventSummary>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TimetableResponse {
    pub fn from_page(
        station: StationResult,
        destination: Option<StationResult>,
        direction: Direction,
        locale: Locale,
        page: TablePage,
        next_event: Option<NextEventSummary>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            station,
            destination,
            direction,
            locale: locale.code(),
            rows: page
                .rows
                .iter()
                .map(|row| TimetableRowResult::from_row(row, locale))
                .collect(),
            page: page.page,
            per_page: page.per_page,
            total_rows: page.total_rows,
            total_pages: page.total_pages,
            train_types: page.train_types,
            next_event,
            updated_at,
        }
    }
}

/// Latest position of a train.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub train_number: u32,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    pub speed: u32,
}

impl From<&TrainLocation> for LocationResponse {
    fn from(location: &TrainLocation) -> Self {
        Self {
            train_number: location.train_number,
            timestamp: location.timestamp,
            latitude: location.location.latitude(),
            longitude: location.location.longitude(),
            speed: location.speed,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Path of the timetable page for a station display name.
pub fn station_href(name: &str) -> String {
    format!("/{}", urlencoding::encode(name))
}
