//! Domain types for the timetable server.
//!
//! Types here enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod direction;
mod locale;
mod station;

pub use direction::{Direction, InvalidDirection};
pub use locale::Locale;
pub use station::{InvalidStationCode, StationCode};
