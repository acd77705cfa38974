//! Filtering, sorting and pagination of timetable rows.
//!
//! The table state travels in the query string, so every combination of
//! filters is a shareable URL.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::row::DisplayRow;

/// Default rows per page.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Upper bound on rows per page.
pub const MAX_PER_PAGE: usize = 100;

/// Column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Time,
    Station,
    Train,
    Track,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Table state as sent by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    /// Case-insensitive substring of station, train label or track.
    pub search: Option<String>,

    /// Exact train type, e.g. "IC".
    pub train_type: Option<String>,

    /// Include commuter trains (default true).
    pub commuter: Option<bool>,

    /// Include cancelled trains (default true).
    pub cancelled: Option<bool>,

    pub sort: SortKey,

    pub order: SortOrder,

    /// 1-based page number.
    pub page: Option<usize>,

    pub per_page: Option<usize>,
}

impl TableQuery {
    fn accepts(&self, row: &DisplayRow) -> bool {
        if !self.commuter.unwrap_or(true) && row.is_commuter() {
            return false;
        }
        if !self.cancelled.unwrap_or(true) && row.cancelled {
            return false;
        }
        if let Some(wanted) = self.train_type.as_deref().filter(|t| !t.is_empty())
            && !row.train_type.eq_ignore_ascii_case(wanted)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                row.station_name.to_lowercase().contains(&needle)
                    || row.train_label().to_lowercase().contains(&needle)
                    || row.train_number.to_string().contains(&needle)
                    || row.commercial_track.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    fn compare(&self, a: &DisplayRow, b: &DisplayRow) -> Ordering {
        let primary = match self.sort {
            SortKey::Time => Ordering::Equal,
            SortKey::Station => a
                .station_name
                .to_lowercase()
                .cmp(&b.station_name.to_lowercase()),
            SortKey::Train => a
                .train_type
                .cmp(&b.train_type)
                .then(a.train_number.cmp(&b.train_number)),
            SortKey::Track => compare_tracks(&a.commercial_track, &b.commercial_track),
        };
        let ordering = primary.then_with(|| a.effective_time().cmp(&b.effective_time()));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// Numeric tracks sort numerically ("2" before "10"); others after them.
fn compare_tracks(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// One page of the table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub rows: Vec<DisplayRow>,
    pub page: usize,
    pub per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    /// Distinct train types in the unfiltered input, for the filter menu.
    pub train_types: Vec<String>,
}

impl TablePage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Applies a [`TableQuery`] to a row list.
pub struct TimetableTable;

impl TimetableTable {
    /// Filter, sort and cut out the requested page.
    ///
    /// Pages past the end clamp to the last page; an empty result still
    /// has one (empty) page.
    pub fn apply(rows: &[DisplayRow], query: &TableQuery) -> TablePage {
        let mut train_types: Vec<String> = rows.iter().map(|r| r.train_type.clone()).collect();
        train_types.sort();
        train_types.dedup();

        let mut filtered: Vec<&DisplayRow> = rows.iter().filter(|r| query.accepts(r)).collect();
        filtered.sort_by(|a, b| query.compare(a, b));

        let per_page = query.per_page();
        let total_rows = filtered.len();
        let total_pages = total_rows.div_ceil(per_page).max(1);
        let page = query.page.unwrap_or(1).clamp(1, total_pages);

        let rows = filtered
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        TablePage {
            rows,
            page,
            per_page,
            total_rows,
            total_pages,
            train_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::row::fixtures::{at, row};

    fn rows() -> Vec<DisplayRow> {
        let mut commuter = row("Riihimäki", 9631, 8, 10);
        commuter.train_type = "HL".to_string();
        commuter.train_category = "Commuter".to_string();
        commuter.commuter_line_id = Some("R".to_string());
        commuter.commercial_track = "12".to_string();

        let mut cancelled = row("Tampere", 123, 9, 0);
        cancelled.train_type = "S".to_string();
        cancelled.cancelled = true;
        cancelled.commercial_track = "9".to_string();

        let mut late = row("Jyväskylä", 91, 8, 30);
        late.live_estimate_time = Some(at(9, 5));
        late.commercial_track = "7".to_string();

        vec![row("Tampere", 45, 8, 0), commuter, cancelled, late]
    }

    fn numbers(page: &TablePage) -> Vec<u32> {
        page.rows.iter().map(|r| r.train_number).collect()
    }

    #[test]
    fn default_sorts_by_effective_time() {
        let page = TimetableTable::apply(&rows(), &TableQuery::default());
        assert_eq!(numbers(&page), vec![45, 9631, 123, 91]);
        assert_eq!(page.total_rows, 4);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn descending_order() {
        let query = TableQuery {
            order: SortOrder::Desc,
            ..Default::default()
        };
        let page = TimetableTable::apply(&rows(), &query);
        assert_eq!(numbers(&page), vec![91, 123, 9631, 45]);
    }

    #[test]
    fn sort_by_track_is_numeric() {
        let query = TableQuery {
            sort: SortKey::Track,
            ..Default::default()
        };
        let page = TimetableTable::apply(&rows(), &query);
        assert_eq!(numbers(&page), vec![45, 91, 123, 9631]);
    }

    #[test]
    fn sort_by_station_then_time() {
        let query = TableQuery {
            sort: SortKey::Station,
            ..Default::default()
        };
        let page = TimetableTable::apply(&rows(), &query);
        assert_eq!(numbers(&page), vec![91, 9631, 45, 123]);
    }

    #[test]
    fn search_matches_station_and_label() {
        let query = TableQuery {
            search: Some("  tamp ".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&TimetableTable::apply(&rows(), &query)), vec![45, 123]);

        let query = TableQuery {
            search: Some("r".to_string()),
            ..Default::default()
        };
        // "R" line label and "Riihimäki"; "Tampere" contains an r too.
        let page = TimetableTable::apply(&rows(), &query);
        assert!(numbers(&page).contains(&9631));
    }

    #[test]
    fn hide_commuter_and_cancelled() {
        let query = TableQuery {
            commuter: Some(false),
            cancelled: Some(false),
            ..Default::default()
        };
        assert_eq!(numbers(&TimetableTable::apply(&rows(), &query)), vec![45, 91]);
    }

    #[test]
    fn train_type_filter() {
        let query = TableQuery {
            train_type: Some("ic".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&TimetableTable::apply(&rows(), &query)), vec![45, 91]);
    }

    #[test]
    fn train_types_listed_from_unfiltered_rows() {
        let query = TableQuery {
            train_type: Some("S".to_string()),
            ..Default::default()
        };
        let page = TimetableTable::apply(&rows(), &query);
        assert_eq!(page.train_types, vec!["HL", "IC", "S"]);
    }

    #[test]
    fn pagination_and_clamping() {
        let query = TableQuery {
            per_page: Some(3),
            page: Some(2),
            ..Default::default()
        };
        let page = TimetableTable::apply(&rows(), &query);
        assert_eq!(numbers(&page), vec![91]);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let query = TableQuery {
            per_page: Some(3),
            page: Some(99),
            ..Default::default()
        };
        assert_eq!(TimetableTable::apply(&rows(), &query).page, 2);

        let query = TableQuery {
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(TimetableTable::apply(&rows(), &query).per_page, 1);
    }

    #[test]
    fn empty_rows_have_one_page() {
        let page = TimetableTable::apply(&[], &TableQuery::default());
        assert!(page.rows.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
