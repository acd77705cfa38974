//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Direction, Locale};
use crate::timetable::{
    DisplayRow, NextEventSummary, SortKey, SortOrder, TablePage, TableQuery, format_clock,
    format_times,
};

use super::dto::StationResult;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Station index.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lang: &'static str,
    pub text: &'static UiText,
    pub stations: Vec<StationResult>,
}

/// Live timetable for one station or route.
#[derive(Template)]
#[template(path = "timetable.html")]
pub struct TimetableTemplate {
    pub lang: &'static str,
    pub text: &'static UiText,
    pub heading: String,
    pub direction_label: &'static str,
    pub next_label: &'static str,
    pub cancelled_label: &'static str,
    /// Link to the opposite direction; route boards have none.
    pub switch_link: Option<Link>,
    pub next: Option<NextView>,
    pub rows: Vec<RowView>,
    pub form: FormView,
    pub page: usize,
    pub total_pages: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub updated: Option<String>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub lang: &'static str,
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

#[derive(Debug, Clone)]
pub struct Link {
    pub label: &'static str,
    pub href: String,
}

/// One table row, formatted for display.
#[derive(Debug, Clone)]
pub struct RowView {
    pub time: String,
    /// Live estimate when more than a minute late.
    pub delayed: Option<String>,
    pub station: String,
    pub train: String,
    pub track: String,
    pub duration: String,
    pub cancelled: bool,
    pub commuter: bool,
}

impl RowView {
    pub fn from_row(row: &DisplayRow, locale: Locale) -> Self {
        let times = format_times(
            row.scheduled_time,
            row.live_estimate_time,
            row.scheduled_final_destination,
            locale,
        );
        Self {
            time: times.scheduled,
            delayed: times.delayed,
            station: row.station_name.clone(),
            train: row.train_label(),
            track: row.commercial_track.clone(),
            duration: times.duration,
            cancelled: row.cancelled,
            commuter: row.is_commuter(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match (self.cancelled, self.delayed.is_some()) {
            (true, _) => "cancelled",
            (false, true) => "delayed",
            (false, false) => "",
        }
    }
}

/// The "next train" box.
#[derive(Debug, Clone)]
pub struct NextView {
    pub station: String,
    pub time: String,
    pub train: String,
    pub track: String,
}

impl NextView {
    pub fn from_summary(next: &NextEventSummary, locale: Locale) -> Self {
        Self {
            station: next.station_next_name.clone(),
            time: format_clock(next.station_next_timestamp, locale),
            train: format!(
                "{} {}",
                next.station_next_train_type, next.station_next_train_number
            ),
            track: next.station_next_train_track.clone(),
        }
    }
}

/// Current state of the filter form.
#[derive(Debug, Clone)]
pub struct FormView {
    pub direction: &'static str,
    pub search: String,
    pub train_type: String,
    pub train_types: Vec<String>,
    pub commuter: bool,
    pub cancelled: bool,
    pub sort: &'static str,
    pub order: &'static str,
    pub per_page: usize,
}

impl FormView {
    pub fn new(direction: Direction, query: &TableQuery, page: &TablePage) -> Self {
        Self {
            direction: direction.as_query(),
            search: query.search.clone().unwrap_or_default(),
            train_type: query.train_type.clone().unwrap_or_default(),
            train_types: page.train_types.clone(),
            commuter: query.commuter.unwrap_or(true),
            cancelled: query.cancelled.unwrap_or(true),
            sort: sort_key_name(query.sort),
            order: match query.order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            },
            per_page: page.per_page,
        }
    }

    pub fn is_sort(&self, key: &str) -> bool {
        self.sort == key
    }

    pub fn is_train_type(&self, train_type: &str) -> bool {
        self.train_type == train_type
    }

    /// Query string for `page` with the current filters.
    pub fn page_query(&self, lang: &str, page: usize) -> String {
        let mut pairs = vec![
            ("direction", self.direction.to_string()),
            ("lang", lang.to_string()),
            ("sort", self.sort.to_string()),
            ("order", self.order.to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if !self.train_type.is_empty() {
            pairs.push(("train_type", self.train_type.clone()));
        }
        if !self.commuter {
            pairs.push(("commuter", "false".to_string()));
        }
        if !self.cancelled {
            pairs.push(("cancelled", "false".to_string()));
        }

        let encoded: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

fn sort_key_name(key: SortKey) -> &'static str {
    match key {
        SortKey::Time => "time",
        SortKey::Station => "station",
        SortKey::Train => "train",
        SortKey::Track => "track",
    }
}

/// Fixed interface text per locale.
#[derive(Debug)]
pub struct UiText {
    pub site_title: &'static str,
    pub stations: &'static str,
    pub search: &'static str,
    pub train_type: &'static str,
    pub all: &'static str,
    pub commuter: &'static str,
    pub show_cancelled: &'static str,
    pub sort: &'static str,
    pub apply: &'static str,
    pub time: &'static str,
    pub station: &'static str,
    pub train: &'static str,
    pub track: &'static str,
    pub duration: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub no_trains: &'static str,
    pub updated: &'static str,
}

const FI: UiText = UiText {
    site_title: "Junat nyt",
    stations: "Asemat",
    search: "Haku",
    train_type: "Junatyyppi",
    all: "Kaikki",
    commuter: "Lähijunat",
    show_cancelled: "Näytä perutut",
    sort: "Järjestys",
    apply: "Päivitä",
    time: "Aika",
    station: "Asema",
    train: "Juna",
    track: "Raide",
    duration: "Kesto",
    previous: "Edellinen",
    next: "Seuraava",
    no_trains: "Ei junia",
    updated: "Päivitetty",
};

const SV: UiText = UiText {
    site_title: "Tåg nu",
    stations: "Stationer",
    search: "Sök",
    train_type: "Tågtyp",
    all: "Alla",
    commuter: "Närtåg",
    show_cancelled: "Visa inställda",
    sort: "Ordning",
    apply: "Uppdatera",
    time: "Tid",
    station: "Station",
    train: "Tåg",
    track: "Spår",
    duration: "Restid",
    previous: "Föregående",
    next: "Nästa",
    no_trains: "Inga tåg",
    updated: "Uppdaterad",
};

const EN: UiText = UiText {
    site_title: "Trains now",
    stations: "Stations",
    search: "Search",
    train_type: "Train type",
    all: "All",
    commuter: "Commuter trains",
    show_cancelled: "Show cancelled",
    sort: "Sort",
    apply: "Update",
    time: "Time",
    station: "Station",
    train: "Train",
    track: "Track",
    duration: "Duration",
    previous: "Previous",
    next: "Next",
    no_trains: "No trains",
    updated: "Updated",
};

impl UiText {
    pub fn for_locale(locale: Locale) -> &'static UiText {
        match locale {
            Locale::Fi => &FI,
            Locale::Sv => &SV,
            Locale::En => &EN,
        }
    }
}
