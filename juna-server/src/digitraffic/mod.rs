//! Digitraffic rail API client.
//!
//! This module is the fetch boundary for live data from
//! `rata.digitraffic.fi`, the open Finnish railway traffic API.
//!
//! Key characteristics of the API:
//! - Times are ISO-8601 UTC instants
//! - A train carries its whole journey as `timeTableRows`, one row per
//!   arrival and one per departure
//! - Live-train queries answer with either a train array or an error object;
//!   [`FetchOutcome`] makes that distinction explicit

mod client;
mod error;
mod feed;
mod mock;
mod outcome;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_USER, DigitrafficClient, DigitrafficConfig};
pub use error::DigitrafficError;
pub use feed::TrainFeed;
pub use mock::MockFeed;
pub use outcome::FetchOutcome;
pub use types::{
    ErrorPayload, GeoPoint, RawTimeTableRow, RawTrain, StationMetadata, StationType,
    TrainLocation,
};
