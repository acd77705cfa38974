//! Live Finnish railway timetables.
//!
//! A web application that shows what is leaving from (or arriving at) a
//! station right now, from the Digitraffic open rail API.

pub mod config;
pub mod digitraffic;
pub mod domain;
pub mod live;
pub mod stations;
pub mod timetable;
pub mod web;
