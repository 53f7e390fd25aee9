//! Service binary for Skycast.
//!
//! Wires together configuration, the forecast model, the simulated world,
//! the broadcast scheduler, and the HTTP + `WebSocket` server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `skycast-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the forecast model, falling back to the built-in reference
//! 4. Build the city store and simulation engine
//! 5. Create the (idle) broadcast scheduler
//! 6. Serve until the server exits or `Ctrl-C` is received

mod error;

use std::path::Path;
use std::sync::Arc;

use skycast_core::clock::SystemClock;
use skycast_core::config::SkycastConfig;
use skycast_core::history::ObservationHistory;
use skycast_core::scheduler::{BroadcastScheduler, SchedulerSettings};
use skycast_core::tick::SimulationState;
use skycast_forecast::{ForecastAdapter, SampleRegressor};
use skycast_observer::server::ServerConfig;
use skycast_observer::startup::spawn_server;
use skycast_observer::state::AppState;
use skycast_world::{RandomSource, RngSource, SimulationEngine, WeatherStateStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "skycast-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the server stops
/// before `Ctrl-C`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = SkycastConfig::from_file_or_default(Path::new(CONFIG_PATH))
        .map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("skycast-engine starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        cities = config.cities.len(),
        tick_interval_ms = config.simulation.tick_interval_ms,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Load the forecast model.
    let model = SampleRegressor::load_or_default(&config.model.path);
    let forecaster = ForecastAdapter::new(Arc::new(model))
        .with_horizon(config.simulation.forecast_horizon());

    // 4. Build the world.
    let random: Box<dyn RandomSource> = match config.simulation.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    };
    let store = WeatherStateStore::new(config.cities.clone()).map_err(EngineError::from)?;
    let simulation = SimulationState::new(
        store,
        SimulationEngine::new(random),
        forecaster,
        ObservationHistory::new(config.simulation.history_capacity),
    );

    // 5. Create the scheduler. It starts with the first subscriber.
    let scheduler = BroadcastScheduler::new(
        simulation,
        Arc::new(SystemClock),
        SchedulerSettings::from(&config.simulation),
    );

    // 6. Serve.
    let state = Arc::new(AppState::new(Arc::clone(&scheduler)));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let server = spawn_server(server_config, state).map_err(EngineError::from)?;

    let outcome: Result<(), EngineError> = tokio::select! {
        result = server => match result {
            Ok(Ok(())) => Err(EngineError::ServerExited),
            Ok(Err(e)) => Err(EngineError::from(e)),
            Err(e) => Err(EngineError::from(e)),
        },
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Shutdown requested");
            Ok(())
        }
    };

    scheduler.request_stop();
    info!(
        ticks = scheduler.ticks().await,
        subscribers = scheduler.subscriber_count().await,
        "skycast-engine stopped"
    );
    outcome?;
    Ok(())
}
