//! Mock Digitraffic feed for running without network access.
//!
//! Loads a fixed dataset from JSON files and answers live-train queries by
//! filtering it the way the real endpoints do.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::{Direction, StationCode};

use super::error::DigitrafficError;
use super::outcome::FetchOutcome;
use super::types::{ErrorPayload, RawTrain, StationMetadata, TrainLocation};

/// Mock feed serving data from JSON files.
///
/// Expects `stations.json` and `trains.json` in the data directory;
/// `locations.json` is optional.
#[derive(Debug, Clone)]
pub struct MockFeed {
    stations: Arc<Vec<StationMetadata>>,
    trains: Arc<Vec<RawTrain>>,
    locations: Arc<Vec<TrainLocation>>,
}

impl MockFeed {
    /// Load the dataset from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DigitrafficError> {
        let data_dir = data_dir.as_ref();

        let stations: Vec<StationMetadata> = read_json(&data_dir.join("stations.json"))?;
        let trains: Vec<RawTrain> = read_json(&data_dir.join("trains.json"))?;

        let locations_path = data_dir.join("locations.json");
        let locations = if locations_path.is_file() {
            read_json(&locations_path)?
        } else {
            Vec::new()
        };

        tracing::info!(
            stations = stations.len(),
            trains = trains.len(),
            "loaded mock data from {}",
            data_dir.display()
        );

        Ok(Self::from_parts(stations, trains, locations))
    }

    /// Build a feed from in-memory data.
    pub fn from_parts(
        stations: Vec<StationMetadata>,
        trains: Vec<RawTrain>,
        locations: Vec<TrainLocation>,
    ) -> Self {
        Self {
            stations: Arc::new(stations),
            trains: Arc::new(trains),
            locations: Arc::new(locations),
        }
    }

    pub async fn fetch_stations(&self) -> Result<Vec<StationMetadata>, DigitrafficError> {
        Ok(self.stations.as_ref().clone())
    }

    /// Trains with a stopping row of the given direction at the station.
    pub async fn live_trains_at(
        &self,
        station: &StationCode,
        direction: Direction,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        if !self.knows_station(station) {
            return Ok(not_found(format!("/live-trains/station/{station}")));
        }

        let trains = self
            .trains
            .iter()
            .filter(|train| {
                train.time_table_rows.iter().any(|row| {
                    row.station_short_code == station.as_str()
                        && row.direction == direction
                        && row.train_stopping
                })
            })
            .cloned()
            .collect();

        Ok(FetchOutcome::Data(trains))
    }

    /// Trains stopping at `from` and later at `to`.
    pub async fn live_trains_between(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        let trains: Vec<RawTrain> = self
            .trains
            .iter()
            .filter(|train| {
                let rows = &train.time_table_rows;
                let departs = rows.iter().position(|row| {
                    row.station_short_code == from.as_str()
                        && row.direction == Direction::Departure
                        && row.train_stopping
                });
                let arrives = rows.iter().rposition(|row| {
                    row.station_short_code == to.as_str()
                        && row.direction == Direction::Arrival
                        && row.train_stopping
                });
                matches!((departs, arrives), (Some(d), Some(a)) if d < a)
            })
            .cloned()
            .collect();

        if trains.is_empty() {
            return Ok(not_found(format!("/live-trains/station/{from}/{to}")));
        }

        Ok(FetchOutcome::Data(trains))
    }

    pub async fn latest_location(
        &self,
        train_number: u32,
    ) -> Result<FetchOutcome<Vec<TrainLocation>>, DigitrafficError> {
        let locations = self
            .locations
            .iter()
            .filter(|location| location.train_number == train_number)
            .cloned()
            .collect();
        Ok(FetchOutcome::Data(locations))
    }

    fn knows_station(&self, station: &StationCode) -> bool {
        self.stations
            .iter()
            .any(|s| s.station_short_code == station.as_str())
    }
}

fn not_found<T>(query: String) -> FetchOutcome<T> {
    FetchOutcome::Upstream(ErrorPayload {
        code: Some("TRAIN_NOT_FOUND".to_string()),
        error_message: "No trains found".to_string(),
        query_string: Some(query),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DigitrafficError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| DigitrafficError::Mock(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| DigitrafficError::Mock(format!("failed to parse {}: {e}", path.display())))
}
