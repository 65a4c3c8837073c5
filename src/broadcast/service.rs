use crate::broadcast::metrics::BroadcastMetrics;
use crate::broadcast::subscriber::{deliver, SnapshotSender, SubscriberId, Subscription};
use crate::broadcast::ticker::run_ticker;
use crate::state::{Snapshot, SnapshotStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

/// Store and subscriber registry, always locked together
struct Hub {
    store: SnapshotStore,
    subscribers: HashMap<SubscriberId, SnapshotSender>,
}

/// Outcome of one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Snapshot published this tick
    pub snapshot: Arc<Snapshot>,

    /// Subscribers the snapshot was queued for
    pub delivered: usize,

    /// Subscribers removed because delivery failed
    pub dropped: usize,
}

/// Drives the snapshot store and fans snapshots out to subscribers.
///
/// A tick (advance + publish) and a connect (register + send current) each
/// run under the single hub lock. A subscriber therefore never sees a
/// partially advanced snapshot, and never receives the same snapshot twice.
/// All sends are `try_send`, so the lock is never held across an await.
pub struct BroadcastService {
    hub: Mutex<Hub>,

    /// Per-subscriber channel capacity
    buffer: usize,

    pub metrics: BroadcastMetrics,
}

impl BroadcastService {
    pub fn new(store: SnapshotStore, buffer: usize) -> Self {
        Self {
            hub: Mutex::new(Hub {
                store,
                subscribers: HashMap::new(),
            }),
            buffer: buffer.max(1),
            metrics: BroadcastMetrics::new(),
        }
    }

    // The hub is never left half-updated, so a poisoned lock is still usable.
    fn lock_hub(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latest committed snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        self.lock_hub().store.current()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_hub().subscribers.len()
    }

    pub fn is_registered(&self, id: &SubscriberId) -> bool {
        self.lock_hub().subscribers.contains_key(id)
    }

    /// Register a fresh subscriber with its own bounded channel.
    ///
    /// The current snapshot is already queued on the returned receiver.
    pub fn connect(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = SubscriberId::new_v4();
        self.on_connect(id, tx);
        Subscription { id, rx }
    }

    /// Register `id` and immediately send it the current snapshot.
    ///
    /// Returns false without touching the registry when `id` is already
    /// registered, or when the connect-time send fails.
    pub fn on_connect(&self, id: SubscriberId, tx: SnapshotSender) -> bool {
        let mut hub = self.lock_hub();

        if hub.subscribers.contains_key(&id) {
            warn!(subscriber_id = %id, "Subscriber already registered, ignoring");
            return false;
        }

        let snapshot = hub.store.current();
        if let Err(failure) = deliver(&tx, &snapshot) {
            warn!(subscriber_id = %id, reason = %failure, "Initial snapshot send failed");
            self.metrics.record_dropped(1);
            return false;
        }
        self.metrics.record_delivery();

        hub.subscribers.insert(id, tx);
        info!(
            subscriber_id = %id,
            subscribers = hub.subscribers.len(),
            "Subscriber connected"
        );
        true
    }

    /// Deregister `id`. Unknown ids are ignored.
    ///
    /// Returns whether a subscriber was removed.
    pub fn on_disconnect(&self, id: &SubscriberId) -> bool {
        let mut hub = self.lock_hub();
        let removed = hub.subscribers.remove(id).is_some();
        if removed {
            info!(
                subscriber_id = %id,
                subscribers = hub.subscribers.len(),
                "Subscriber disconnected"
            );
        }
        removed
    }

    /// Advance the store and publish the new snapshot to every subscriber.
    ///
    /// Subscribers whose channel is closed or full are dropped; the rest
    /// still receive the snapshot.
    pub fn tick(&self) -> TickReport {
        let mut hub = self.lock_hub();
        let snapshot = hub.store.advance();

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, tx) in hub.subscribers.iter() {
            match deliver(tx, &snapshot) {
                Ok(()) => delivered += 1,
                Err(failure) => failed.push((*id, failure)),
            }
        }

        for (id, failure) in &failed {
            hub.subscribers.remove(id);
            warn!(subscriber_id = %id, reason = %failure, "Dropping subscriber");
        }
        drop(hub);

        self.metrics.record_tick(delivered);
        if !failed.is_empty() {
            self.metrics.record_dropped(failed.len());
        }

        TickReport {
            snapshot,
            delivered,
            dropped: failed.len(),
        }
    }

    /// Spawn the periodic tick task.
    ///
    /// The first tick fires one full `interval` after this call.
    pub fn start(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let first = Instant::now() + interval;
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        info!(interval_ms, "Starting broadcast ticker");
        tokio::spawn(run_ticker(Arc::clone(self), first, interval))
    }
}
