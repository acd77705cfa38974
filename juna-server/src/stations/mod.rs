//! Station metadata: filters, name clean-up, lookup and disk cache.
//!
//! The station list is loaded at startup (from the disk cache when fresh)
//! and refreshed daily. Pages address stations by city name, so lookup
//! goes through the normalized name rather than the short code.

mod cache;
mod directory;
mod error;
mod filter;
mod sanitize;

pub use cache::{StationCache, StationCacheConfig};
pub use directory::{StationDirectory, resolve_city};
pub use error::StationError;
pub use filter::{passenger_station_sites, passenger_stations};
pub use sanitize::{normalize_for_match, sanitize_station_name};
