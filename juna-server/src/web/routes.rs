//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;

use crate::digitraffic::StationMetadata;
use crate::domain::{Direction, InvalidDirection, Locale, StationCode};
use crate::live::BoardKey;
use crate::timetable::{TableQuery, TimetableTable, format_clock};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(search_stations))
        .route("/api/trains/:number/location", get(train_location))
        .route("/:city", get(station_timetable))
        .route("/:city/to/:destination", get(route_timetable))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page listing every passenger station.
async fn index_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BoardParams>,
) -> Response {
    let locale = request_locale(&params, &headers);

    let template = IndexTemplate {
        lang: locale.code(),
        text: UiText::for_locale(locale),
        stations: state
            .stations
            .index()
            .await
            .iter()
            .map(StationResult::from_station)
            .collect(),
    };

    match render(&template) {
        Ok(html) => html.into_response(),
        Err(e) => e.into_html(locale),
    }
}

/// Search stations by name prefix or code.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let matches = state.stations.search(&req.q, limit).await;

    Json(StationSearchResponse {
        stations: matches.iter().map(StationResult::from_station).collect(),
    })
}

/// Latest position of a train.
async fn train_location(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state
        .feeds
        .location(number, state.first_fetch_wait)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("No location for train {number}"),
        })?;

    Ok(Json(LocationResponse::from(&location)))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Locale from `?lang=`, else the first `Accept-Language` tag, else Finnish.
fn request_locale(params: &BoardParams, headers: &HeaderMap) -> Locale {
    if let Some(lang) = params.lang.as_deref().filter(|l| !l.is_empty()) {
        return Locale::from_code(lang);
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split([',', ';']).next())
        .map(|tag| Locale::from_code(tag.trim()))
        .unwrap_or_default()
}

/// Departures or arrivals at one station.
async fn station_timetable(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(city): Path<String>,
    Query(params): Query<BoardParams>,
    Query(table): Query<TableQuery>,
) -> Response {
    let locale = request_locale(&params, &headers);
    let html = accepts_html(&headers);

    let result = async {
        let direction = params
            .direction
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(str::parse::<Direction>)
            .transpose()?
            .unwrap_or_default();
        let origin = resolve(&state, &city).await?;

        let request = BoardRequest {
            origin,
            destination: None,
            direction,
            locale,
            table,
        };
        board_response(&state, request, html).await
    }
    .await;

    negotiate(result, html, locale)
}

/// Departures from one station that call at another.
async fn route_timetable(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((city, destination)): Path<(String, String)>,
    Query(params): Query<BoardParams>,
    Query(table): Query<TableQuery>,
) -> Response {
    let locale = request_locale(&params, &headers);
    let html = accepts_html(&headers);

    let result = async {
        let (origin, destination) =
            futures::join!(resolve(&state, &city), resolve(&state, &destination));

        let request = BoardRequest {
            origin: origin?,
            destination: Some(destination?),
            direction: Direction::Departure,
            locale,
            table,
        };
        board_response(&state, request, html).await
    }
    .await;

    negotiate(result, html, locale)
}

struct BoardRequest {
    origin: StationMetadata,
    destination: Option<StationMetadata>,
    direction: Direction,
    locale: Locale,
    table: TableQuery,
}

/// Look up (and start polling if needed) a board and render one page of it.
async fn board_response(
    state: &AppState,
    req: BoardRequest,
    html: bool,
) -> Result<Response, AppError> {
    let origin_code = station_code(&req.origin)?;
    let key = match &req.destination {
        Some(dest) => BoardKey::route(origin_code, station_code(dest)?),
        None => BoardKey::station(origin_code, req.direction),
    };
    let direction = key.direction;
    let locale = req.locale;

    let board = state.feeds.board(key).await;
    let rows = board.rows(state.first_fetch_wait).await;
    let next = board.next_event(&rows, Utc::now());
    let page = TimetableTable::apply(&rows, &req.table);

    let origin = StationResult::from_station(&req.origin);
    let destination = req.destination.as_ref().map(StationResult::from_station);

    if !html {
        let response = TimetableResponse::from_page(
            origin,
            destination,
            direction,
            locale,
            page,
            next,
            board.fetched_at(),
        );
        return Ok(Json(response).into_response());
    }

    let (heading, base_path) = match &destination {
        Some(dest) => (
            format!("{} \u{2192} {}", origin.name, dest.name),
            format!("{}/to{}", origin.href, dest.href),
        ),
        None => (origin.name.clone(), origin.href.clone()),
    };

    let form = FormView::new(direction, &req.table, &page);
    let page_href = |n: usize| format!("{base_path}{}", form.page_query(locale.code(), n));

    let switch_link = destination.is_none().then(|| {
        let (label, other) = match direction {
            Direction::Departure => (locale.arrivals_label(), Direction::Arrival),
            Direction::Arrival => (locale.departures_label(), Direction::Departure),
        };
        Link {
            label,
            href: format!(
                "{base_path}?direction={}&lang={}",
                other.as_query(),
                locale.code()
            ),
        }
    });

    let template = TimetableTemplate {
        lang: locale.code(),
        text: UiText::for_locale(locale),
        heading,
        direction_label: match direction {
            Direction::Departure => locale.departures_label(),
            Direction::Arrival => locale.arrivals_label(),
        },
        next_label: locale.next_train_label(),
        cancelled_label: locale.cancelled_label(),
        switch_link,
        next: next.as_ref().map(|n| NextView::from_summary(n, locale)),
        rows: page
            .rows
            .iter()
            .map(|row| RowView::from_row(row, locale))
            .collect(),
        previous_href: page.has_previous().then(|| page_href(page.page - 1)),
        next_href: page.has_next().then(|| page_href(page.page + 1)),
        page: page.page,
        total_pages: page.total_pages,
        updated: board.fetched_at().map(|t| format_clock(t, locale)),
        form,
    };

    Ok(render(&template)?.into_response())
}

async fn resolve(state: &AppState, city: &str) -> Result<StationMetadata, AppError> {
    state
        .stations
        .resolve(city)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown station: {city}"),
        })
}

fn station_code(station: &StationMetadata) -> Result<StationCode, AppError> {
    StationCode::parse(&station.station_short_code).map_err(|e| AppError::Internal {
        message: e.to_string(),
    })
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Errors become an HTML page for browsers and a JSON body otherwise.
fn negotiate(result: Result<Response, AppError>, html: bool, locale: Locale) -> Response {
    match result {
        Ok(response) => response,
        Err(e) if html => e.into_html(locale),
        Err(e) => e.into_response(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        }
    }

    fn log(&self) {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, "{}", self.message());
        } else {
            tracing::debug!(%status, "{}", self.message());
        }
    }

    /// Render as an error page.
    pub fn into_html(self, locale: Locale) -> Response {
        self.log();
        let status = self.status();

        let page = ErrorTemplate {
            lang: locale.code(),
            title: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
            message: self.message().to_string(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!("error page failed to render: {e}");
                (status, self.message().to_string()).into_response()
            }
        }
    }
}

impl From<InvalidDirection> for AppError {
    fn from(e: InvalidDirection) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
