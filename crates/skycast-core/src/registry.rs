//! The set of attached subscribers and per-subscriber delivery.
//!
//! Every subscriber owns a bounded [`mpsc`] queue of encoded frames. The
//! broadcast loop pushes into the queues with `try_send`, so one slow or
//! dead subscriber can never stall the others:
//!
//! - a **closed** queue means the subscriber is gone; it is reported back
//!   and detached once the whole broadcast has been delivered
//! - a **full** queue means the subscriber is lagging; that frame is
//!   dropped for that subscriber only

use std::collections::BTreeMap;
use std::sync::Arc;

use skycast_types::SubscriberId;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

/// Default per-subscriber queue depth.
pub const DEFAULT_SUBSCRIBER_QUEUE: usize = 16;

/// The receiving half handed to a newly attached subscriber.
#[derive(Debug)]
pub struct Subscription {
    /// Identity used to detach.
    pub id: SubscriberId,
    /// Encoded broadcast frames, in tick order.
    pub frames: mpsc::Receiver<Arc<str>>,
}

/// Outcome of pushing one frame to every subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers that accepted the frame.
    pub delivered: usize,
    /// Subscribers whose queue was full; the frame was dropped for them.
    pub lagging: Vec<SubscriberId>,
    /// Subscribers whose queue was closed; they have been detached.
    pub detached: Vec<SubscriberId>,
}

/// Concurrent map of attached subscribers.
#[derive(Debug)]
pub struct SubscriberRegistry {
    senders: RwLock<BTreeMap<SubscriberId, mpsc::Sender<Arc<str>>>>,
    queue_capacity: usize,
}

impl SubscriberRegistry {
    /// An empty registry whose queues hold `queue_capacity` frames
    /// (minimum 1).
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            senders: RwLock::new(BTreeMap::new()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Add a subscriber and return its receiving half.
    pub async fn attach(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = SubscriberId::new();
        self.senders.write().await.insert(id, tx);
        debug!(subscriber = %id, "Subscriber attached");
        Subscription { id, frames: rx }
    }

    /// Remove a subscriber. Returns whether it was attached.
    pub async fn detach(&self, id: SubscriberId) -> bool {
        let removed = self.senders.write().await.remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "Subscriber detached");
        }
        removed
    }

    /// Number of attached subscribers.
    pub async fn len(&self) -> usize {
        self.senders.read().await.len()
    }

    /// Whether no subscriber is attached.
    pub async fn is_empty(&self) -> bool {
        self.senders.read().await.is_empty()
    }

    /// Push `frame` to every subscriber attached right now.
    ///
    /// The subscriber set is snapshotted first, so attaches and detaches
    /// during delivery do not affect this frame. Closed subscribers are
    /// removed after every other subscriber has been served.
    pub async fn deliver(&self, frame: &Arc<str>) -> DeliveryReport {
        let snapshot: Vec<(SubscriberId, mpsc::Sender<Arc<str>>)> = self
            .senders
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = DeliveryReport::default();
        for (id, tx) in snapshot {
            match tx.try_send(Arc::clone(frame)) {
                Ok(()) => report.delivered = report.delivered.saturating_add(1),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = %id, "Subscriber queue full, dropping frame");
                    report.lagging.push(id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    report.detached.push(id);
                }
            }
        }

        if !report.detached.is_empty() {
            let mut senders = self.senders.write().await;
            for id in &report.detached {
                senders.remove(id);
                debug!(subscriber = %id, "Detached subscriber after failed delivery");
            }
        }
        report
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_QUEUE)
    }
}
