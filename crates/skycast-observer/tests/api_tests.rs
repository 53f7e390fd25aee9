//! Integration tests for the weather API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use serde_json::Value;
use skycast_core::clock::FixedClock;
use skycast_core::history::ObservationHistory;
use skycast_core::scheduler::{BroadcastScheduler, SchedulerSettings};
use skycast_core::tick::SimulationState;
use skycast_forecast::{ForecastAdapter, SampleRegressor};
use skycast_observer::router::build_router;
use skycast_observer::server::{ServerConfig, ServerError};
use skycast_observer::startup::spawn_server;
use skycast_observer::state::AppState;
use skycast_world::{RngSource, SimulationEngine, WeatherStateStore, default_cities};
use tower::ServiceExt;

fn make_test_state() -> Arc<AppState> {
    let simulation = SimulationState::new(
        WeatherStateStore::new(default_cities()).unwrap(),
        SimulationEngine::new(Box::new(RngSource::seeded(5))),
        ForecastAdapter::new(Arc::new(SampleRegressor::reference())),
        ObservationHistory::new(100),
    );
    let clock = Arc::new(FixedClock::new(
        chrono::Utc.with_ymd_and_hms(2024, 11, 2, 18, 30, 0).unwrap(),
    ));
    let scheduler = BroadcastScheduler::new(simulation, clock, SchedulerSettings::default());
    Arc::new(AppState::new(scheduler))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let router = build_router(Arc::clone(state));
    let response = router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_health_reports_service_and_connections() {
    let state = make_test_state();
    let (status, json) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "Weather WebSocket Service");
    assert_eq!(json["connections"], 0);
    assert_eq!(json["scheduler"], "idle");
    assert_eq!(json["timestamp"], "2024-11-02 18:30:00");
}

#[tokio::test]
async fn test_health_counts_attached_subscribers() {
    let state = make_test_state();
    let _a = state.scheduler.attach().await;
    let _b = state.scheduler.attach().await;

    let (_, json) = get(&state, "/health").await;
    assert_eq!(json["connections"], 2);
    assert_eq!(json["scheduler"], "running");
}

#[tokio::test]
async fn test_list_cities() {
    let state = make_test_state();
    let (status, json) = get(&state, "/api/cities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 5);
    assert_eq!(json["cities"][0]["name"], "New York");
    assert_eq!(json["cities"][4]["name"], "Sydney");
    assert_eq!(json["cities"][1]["min_seasonal_temp"], 10.0);
}

#[tokio::test]
async fn test_weather_not_found_before_first_tick() {
    let state = make_test_state();
    let (status, json) = get(&state, "/api/weather").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_weather_returns_latest_broadcast() {
    let state = make_test_state();
    state.scheduler.broadcast_once().await.unwrap();

    let (status, json) = get(&state, "/api/weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timestamp"], "2024-11-02 18:30:00");

    let current = json["current_weather"].as_array().unwrap();
    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(current.len(), 5);
    assert_eq!(predictions.len(), 5);

    let reading = current.get(2).unwrap();
    assert_eq!(reading["city"], "Tokyo");
    assert_eq!(reading["coordinates"]["lat"], 35.6762);
    assert!(reading["temperature"]["celsius"].is_number());
    assert!(reading["temperature"]["fahrenheit"].is_number());
    assert!(reading["wind_speed"]["kph"].is_number());
    assert!(reading["wind_speed"]["mph"].is_number());
    assert!(reading.get("predicted").is_none());

    let forecast = predictions.get(2).unwrap();
    assert_eq!(forecast["city"], "Tokyo");
    assert_eq!(forecast["predicted"], true);
    assert_eq!(forecast["timestamp"], "2024-11-02 18:30:05");
}

#[tokio::test]
async fn test_history_filters_by_city() {
    let state = make_test_state();
    for _ in 0..3 {
        state.scheduler.broadcast_once().await.unwrap();
    }

    let (status, json) = get(&state, "/api/history?city=Paris&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["as_of"], "2024-11-02 18:30:00");
    let observations = json["observations"].as_array().unwrap();
    assert!(observations.iter().all(|o| o["city"] == "Paris"));

    let (_, all) = get(&state, "/api/history").await;
    assert_eq!(all["count"], 15);
}

#[tokio::test]
async fn test_history_unknown_city_is_not_found() {
    let state = make_test_state();
    let (status, json) = get(&state, "/api/history?city=Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_history_rejects_out_of_range_limit() {
    let state = make_test_state();
    let (status, _) = get(&state, "/api/history?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&state, "/api/history?limit=5000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let state = make_test_state();
    let router = build_router(Arc::clone(&state));
    let response = router
        .oneshot(Request::get("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(state.scheduler.subscriber_count().await, 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let state = make_test_state();
    let router = build_router(state);
    let response = router
        .oneshot(Request::get("/api/agents").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_spawn_server_reports_taken_port() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();
    let config = ServerConfig {
        host: String::from("127.0.0.1"),
        port,
    };

    let handle = spawn_server(config, make_test_state()).unwrap();
    let result = handle.await.unwrap();
    assert!(matches!(result, Err(ServerError::Bind(_))));
}
