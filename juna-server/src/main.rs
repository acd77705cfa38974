use std::error::Error;
use std::time::Duration;

use juna_server::config::AppConfig;
use juna_server::digitraffic::{DigitrafficClient, MockFeed, TrainFeed};
use juna_server::live::LiveFeeds;
use juna_server::stations::{StationCache, StationDirectory};
use juna_server::web::{AppState, create_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How often to refresh station metadata (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "juna_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let feed = match &config.mock_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving mock data");
            TrainFeed::from(MockFeed::new(dir)?)
        }
        None => TrainFeed::from(DigitrafficClient::new(config.digitraffic())?),
    };

    // Fail fast if neither the cache nor the API has stations
    let cache = StationCache::new(config.station_cache());
    let stations = StationDirectory::load(feed.clone(), Some(cache)).await?;
    tracing::info!(count = stations.len().await, "stations loaded");

    let refresh = stations.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match refresh.refresh().await {
                Ok(count) => tracing::info!(count, "refreshed stations"),
                Err(e) => tracing::warn!("station refresh failed: {e}"),
            }
        }
    });

    let feeds = LiveFeeds::new(feed, stations.clone(), config.feeds());
    let app = create_router(AppState::new(stations, feeds));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
