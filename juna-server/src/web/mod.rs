//! Web layer for the live timetable server.
//!
//! Timetable pages are served as HTML to browsers and as JSON to everything
//! else, decided by the `Accept` header.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
