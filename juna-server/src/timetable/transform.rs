//! Raw trains to display rows.

use std::collections::HashMap;

use crate::digitraffic::{RawTimeTableRow, RawTrain, StationMetadata};
use crate::domain::{Direction, StationCode};
use crate::stations::sanitize_station_name;

use super::row::DisplayRow;

/// Flatten live trains into rows for one station and direction.
///
/// A train contributes one row per timetable row that is at `origin`, in
/// `direction` and actually stopping. The row is labelled with the far end
/// of the journey: the first stop for arrivals, the last for departures.
/// With a `destination`, only trains that call there are kept and rows are
/// labelled with the destination instead.
///
/// Output follows the order of `trains`. Station codes missing from
/// `stations` give an empty name.
pub fn transform_trains(
    trains: &[RawTrain],
    origin: &StationCode,
    destination: Option<&StationCode>,
    direction: Direction,
    stations: &[StationMetadata],
) -> Vec<DisplayRow> {
    let names: HashMap<&str, String> = stations
        .iter()
        .map(|s| {
            (
                s.station_short_code.as_str(),
                sanitize_station_name(&s.station_name),
            )
        })
        .collect();

    let name_of = |code: &str| names.get(code).cloned().unwrap_or_default();

    let mut rows = Vec::new();

    for train in trains {
        let Some(terminal) = terminal_row(train, destination, direction) else {
            continue;
        };
        let terminal_name = name_of(&terminal.station_short_code);

        let matching = train.time_table_rows.iter().filter(|row| {
            row.station_short_code == origin.as_str()
                && row.direction == direction
                && row.train_stopping
        });

        for row in matching {
            rows.push(DisplayRow {
                station_name: terminal_name.clone(),
                direction,
                scheduled_time: row.scheduled_time,
                live_estimate_time: row.live_estimate_time,
                scheduled_final_destination: terminal.scheduled_time,
                train_type: train.train_type.clone(),
                train_number: train.train_number,
                train_category: train.train_category.clone(),
                commuter_line_id: train.commuter_line().map(str::to_string),
                commercial_track: row.commercial_track.clone(),
                cancelled: row.cancelled || train.cancelled,
            });
        }
    }

    rows
}

/// The row naming the far end of the journey, or `None` when a destination
/// was requested and the train does not call there.
fn terminal_row<'a>(
    train: &'a RawTrain,
    destination: Option<&StationCode>,
    direction: Direction,
) -> Option<&'a RawTimeTableRow> {
    let rows = &train.time_table_rows;

    match destination {
        Some(dest) => {
            let at_dest = || rows.iter().filter(|r| r.station_short_code == dest.as_str());
            at_dest()
                .find(|r| r.direction == Direction::Arrival)
                .or_else(|| at_dest().next())
        }
        None => match direction {
            Direction::Arrival => rows.first(),
            Direction::Departure => rows.last(),
        },
    }
}
