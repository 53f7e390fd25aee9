//! Subscriber-driven broadcast loop.
//!
//! [`BroadcastScheduler`] owns the simulation and the subscriber set. The
//! loop runs only while someone is listening:
//!
//! - **Idle → Running** when the first subscriber attaches
//! - **Running → Idle** when a cycle starts with no subscribers, or after
//!   [`request_stop`](BroadcastScheduler::request_stop)
//!
//! The loop is the only writer of simulation state and runs one whole tick
//! before sleeping, so ticks never overlap. City state lives in the
//! scheduler, not the loop, so a later restart resumes from the last
//! values.
//!
//! Each tick runs in its own task. A tick error, including a panic inside
//! the predictor, is logged and retried after a short backoff; it never
//! terminates the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use skycast_types::{
    CityProfile, SchedulerState, SubscriberId, WeatherBroadcast, WeatherObservation,
};
use skycast_world::WorldError;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::config::SimulationSettings;
use crate::registry::{DeliveryReport, SubscriberRegistry, Subscription};
use crate::tick::{self, SimulationState, TickError};

/// Loop timing and queue sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Sleep between successful ticks.
    pub tick_interval: Duration,
    /// Sleep after a failed tick.
    pub retry_backoff: Duration,
    /// Per-subscriber outbound queue depth.
    pub subscriber_queue: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            retry_backoff: Duration::from_secs(1),
            subscriber_queue: crate::registry::DEFAULT_SUBSCRIBER_QUEUE,
        }
    }
}

impl From<&SimulationSettings> for SchedulerSettings {
    fn from(settings: &SimulationSettings) -> Self {
        Self {
            tick_interval: settings.tick_interval(),
            retry_backoff: settings.retry_backoff(),
            subscriber_queue: settings.subscriber_queue,
        }
    }
}

/// Periodic fan-out of simulated weather to attached subscribers.
pub struct BroadcastScheduler {
    simulation: Mutex<SimulationState>,
    profiles: Vec<CityProfile>,
    clock: Arc<dyn Clock>,
    registry: SubscriberRegistry,
    latest: RwLock<Option<WeatherBroadcast>>,
    state_tx: watch::Sender<SchedulerState>,
    stop_requested: AtomicBool,
    settings: SchedulerSettings,
}

impl std::fmt::Debug for BroadcastScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastScheduler")
            .field("state", &*self.state_tx.borrow())
            .field("cities", &self.profiles.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl BroadcastScheduler {
    /// Create an idle scheduler around `simulation`.
    pub fn new(
        simulation: SimulationState,
        clock: Arc<dyn Clock>,
        settings: SchedulerSettings,
    ) -> Arc<Self> {
        let profiles = simulation.profiles().to_vec();
        let (state_tx, _) = watch::channel(SchedulerState::Idle);
        Arc::new(Self {
            simulation: Mutex::new(simulation),
            profiles,
            clock,
            registry: SubscriberRegistry::new(settings.subscriber_queue),
            latest: RwLock::new(None),
            state_tx,
            stop_requested: AtomicBool::new(false),
            settings,
        })
    }

    /// Attach a subscriber, starting the loop if it is idle.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn attach(self: &Arc<Self>) -> Subscription {
        let subscription = self.registry.attach().await;
        if self.try_mark_running() {
            self.stop_requested.store(false, Ordering::Release);
            info!(
                interval = ?self.settings.tick_interval,
                "Broadcast loop starting"
            );
            tokio::spawn(Arc::clone(self).run());
        }
        subscription
    }

    /// Detach a subscriber. Returns whether it was attached.
    ///
    /// The loop notices an empty subscriber set at the start of its next
    /// cycle.
    pub async fn detach(&self, id: SubscriberId) -> bool {
        self.registry.detach(id).await
    }

    /// Ask the loop to go idle at the start of its next cycle.
    ///
    /// The next attach that finds the scheduler idle clears the request.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        *self.state_tx.borrow()
    }

    /// A receiver that observes every lifecycle transition.
    pub fn watch_state(&self) -> watch::Receiver<SchedulerState> {
        self.state_tx.subscribe()
    }

    /// Number of attached subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }

    /// The most recent broadcast, if any tick has completed.
    pub async fn latest(&self) -> Option<WeatherBroadcast> {
        self.latest.read().await.clone()
    }

    /// Configured city profiles, in broadcast order.
    pub fn profiles(&self) -> &[CityProfile] {
        &self.profiles
    }

    /// Recent observations, oldest first, optionally for one city.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] if `city` is not configured.
    pub async fn history(
        &self,
        city: Option<&str>,
        limit: usize,
    ) -> Result<Vec<WeatherObservation>, WorldError> {
        if let Some(name) = city {
            if !self.profiles.iter().any(|p| p.name == name) {
                return Err(WorldError::UnknownCity(name.to_owned()));
            }
        }
        Ok(self.simulation.lock().await.history.recent(city, limit))
    }

    /// Current time on the scheduler's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Number of ticks completed since startup.
    pub async fn ticks(&self) -> u64 {
        self.simulation.lock().await.ticks
    }

    /// Run one tick now and deliver it, regardless of lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the tick fails; nothing is delivered then.
    pub async fn broadcast_once(&self) -> Result<DeliveryReport, TickError> {
        let now = self.clock.now();
        let broadcast = {
            let mut simulation = self.simulation.lock().await;
            tick::run_tick(&mut simulation, now)?
        };
        let frame: Arc<str> = Arc::from(serde_json::to_string(&broadcast)?);
        *self.latest.write().await = Some(broadcast);

        let report = self.registry.deliver(&frame).await;
        debug!(
            delivered = report.delivered,
            lagging = report.lagging.len(),
            detached = report.detached.len(),
            "Broadcast delivered"
        );
        Ok(report)
    }

    /// Run one broadcast in a separate task so a panic surfaces as
    /// [`TickError::Aborted`].
    async fn guarded_broadcast(self: &Arc<Self>) -> Result<DeliveryReport, TickError> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.broadcast_once().await }).await?
    }

    fn try_mark_running(&self) -> bool {
        self.state_tx.send_if_modified(|state| {
            if *state == SchedulerState::Idle {
                *state = SchedulerState::Running;
                true
            } else {
                false
            }
        })
    }

    async fn should_idle(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire) || self.registry.is_empty().await
    }

    async fn run(self: Arc<Self>) {
        loop {
            // --- Check lifecycle (start of cycle only) ---
            if self.should_idle().await {
                self.state_tx.send_replace(SchedulerState::Idle);
                // An attach between the check and the transition either
                // started its own loop or left this one to carry on.
                if self.should_idle().await || !self.try_mark_running() {
                    info!("Broadcast loop idle");
                    return;
                }
            }

            // --- Tick and deliver ---
            match self.guarded_broadcast().await {
                Ok(_) => tokio::time::sleep(self.settings.tick_interval).await,
                Err(e) => {
                    error!(error = %e, "Broadcast tick failed, retrying");
                    tokio::time::sleep(self.settings.retry_backoff).await;
                }
            }
        }
    }
}
