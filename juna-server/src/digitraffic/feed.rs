//! Source of live rail data: the real API or the local mock.

use crate::domain::{Direction, StationCode};

use super::client::DigitrafficClient;
use super::error::DigitrafficError;
use super::mock::MockFeed;
use super::outcome::FetchOutcome;
use super::types::{RawTrain, StationMetadata, TrainLocation};

/// Live data source used by the station directory and the pollers.
#[derive(Debug, Clone)]
pub enum TrainFeed {
    Live(DigitrafficClient),
    Mock(MockFeed),
}

impl TrainFeed {
    pub async fn fetch_stations(&self) -> Result<Vec<StationMetadata>, DigitrafficError> {
        match self {
            TrainFeed::Live(client) => client.fetch_stations().await,
            TrainFeed::Mock(mock) => mock.fetch_stations().await,
        }
    }

    pub async fn live_trains_at(
        &self,
        station: &StationCode,
        direction: Direction,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        match self {
            TrainFeed::Live(client) => client.live_trains_at(station, direction).await,
            TrainFeed::Mock(mock) => mock.live_trains_at(station, direction).await,
        }
    }

    pub async fn live_trains_between(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> Result<FetchOutcome<Vec<RawTrain>>, DigitrafficError> {
        match self {
            TrainFeed::Live(client) => client.live_trains_between(from, to).await,
            TrainFeed::Mock(mock) => mock.live_trains_between(from, to).await,
        }
    }

    pub async fn latest_location(
        &self,
        train_number: u32,
    ) -> Result<FetchOutcome<Vec<TrainLocation>>, DigitrafficError> {
        match self {
            TrainFeed::Live(client) => client.latest_location(train_number).await,
            TrainFeed::Mock(mock) => mock.latest_location(train_number).await,
        }
    }
}

impl From<DigitrafficClient> for TrainFeed {
    fn from(client: DigitrafficClient) -> Self {
        TrainFeed::Live(client)
    }
}

impl From<MockFeed> for TrainFeed {
    fn from(mock: MockFeed) -> Self {
        TrainFeed::Mock(mock)
    }
}
