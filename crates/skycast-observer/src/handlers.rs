//! REST endpoint handlers for the API server.
//!
//! All handlers are read-only views of the [`BroadcastScheduler`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness, subscriber count, scheduler state |
//! | `GET` | `/api/cities` | Configured city profiles |
//! | `GET` | `/api/weather` | Most recent broadcast |
//! | `GET` | `/api/history` | Recent observations (by city) |
//!
//! [`BroadcastScheduler`]: skycast_core::scheduler::BroadcastScheduler

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use skycast_types::{WeatherReading, format_timestamp};

use crate::error::ObserverError;
use crate::state::AppState;

/// Default number of history entries returned.
const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Largest accepted history `limit`.
const MAX_HISTORY_LIMIT: usize = 1_000;

/// Query parameters for the `GET /api/history` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// Restrict results to one city.
    pub city: Option<String>,
    /// Maximum number of entries to return (default 100, max 1000).
    pub limit: Option<usize>,
}

/// Report liveness and subscriber count.
///
/// # Route
///
/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let connections = state.scheduler.subscriber_count().await;
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": format_timestamp(state.scheduler.now()),
        "connections": connections,
        "service": state.service_name,
        "scheduler": state.scheduler.state(),
    }))
}

/// List the configured cities in broadcast order.
///
/// # Route
///
/// `GET /api/cities`
pub async fn list_cities(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cities = state.scheduler.profiles();
    Json(serde_json::json!({
        "count": cities.len(),
        "cities": cities,
    }))
}

/// Return the most recent broadcast.
///
/// # Route
///
/// `GET /api/weather`
pub async fn latest_weather(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let broadcast = state
        .scheduler
        .latest()
        .await
        .ok_or_else(|| ObserverError::NotFound(String::from("no broadcast yet")))?;
    Ok(Json(broadcast))
}

/// Return recent observations, oldest first.
///
/// # Query Parameters
///
/// - `city`: restrict to one configured city (404 if unknown)
/// - `limit`: 1 to 1000 (default 100)
///
/// # Route
///
/// `GET /api/history`
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(ObserverError::InvalidQuery(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }

    let observations = state
        .scheduler
        .history(params.city.as_deref(), limit)
        .await?;

    let readings: Vec<WeatherReading> = observations
        .iter()
        .filter_map(|obs| {
            state
                .scheduler
                .profiles()
                .iter()
                .find(|p| p.name == obs.city)
                .map(|p| obs.to_reading(p.coordinates()))
        })
        .collect();

    Ok(Json(serde_json::json!({
        "count": readings.len(),
        "as_of": format_timestamp(state.scheduler.now()),
        "observations": readings,
    })))
}
