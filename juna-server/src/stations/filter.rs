//! Passenger station filters.
//!
//! Two predicates are in use and both are kept under their own names:
//! city lookup accepts any stop with passenger traffic, while the station
//! index only lists full stations.

use crate::digitraffic::{StationMetadata, StationType};

/// Stations with passenger traffic (stations and stopping points alike).
pub fn passenger_stations(stations: &[StationMetadata]) -> Vec<StationMetadata> {
    stations
        .iter()
        .filter(|s| s.passenger_traffic)
        .cloned()
        .collect()
}

/// Full stations (`type == STATION`) with passenger traffic.
pub fn passenger_station_sites(stations: &[StationMetadata]) -> Vec<StationMetadata> {
    stations
        .iter()
        .filter(|s| s.passenger_traffic && s.station_type == StationType::Station)
        .cloned()
        .collect()
}
