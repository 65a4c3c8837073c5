use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the broadcast loop, readable without touching the hub lock
#[derive(Clone)]
pub struct BroadcastMetrics {
    /// Ticks fired since start
    ticks: Arc<AtomicU64>,

    /// Snapshot deliveries queued to subscribers (connect + tick)
    deliveries: Arc<AtomicU64>,

    /// Subscribers dropped because their transport failed
    dropped_subscribers: Arc<AtomicU64>,

    /// Last tick timestamp in ms (0 = never)
    last_tick_ms: Arc<AtomicI64>,

    started_at: DateTime<Utc>,
}

impl BroadcastMetrics {
    pub fn new() -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(0)),
            deliveries: Arc::new(AtomicU64::new(0)),
            dropped_subscribers: Arc::new(AtomicU64::new(0)),
            last_tick_ms: Arc::new(AtomicI64::new(0)),
            started_at: Utc::now(),
        }
    }

    /// Record one tick and the number of subscribers it reached
    pub fn record_tick(&self, delivered: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.last_tick_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: usize) {
        self.dropped_subscribers
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn get_tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn get_delivery_count(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    pub fn get_dropped_count(&self) -> u64 {
        self.dropped_subscribers.load(Ordering::Relaxed)
    }

    pub fn get_last_tick(&self) -> Option<DateTime<Utc>> {
        match self.last_tick_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    /// Get snapshot of all metrics
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.get_tick_count(),
            deliveries: self.get_delivery_count(),
            dropped_subscribers: self.get_dropped_count(),
            started_at: self.started_at,
            last_tick_at: self.get_last_tick(),
        }
    }
}

impl Default for BroadcastMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub deliveries: u64,
    pub dropped_subscribers: u64,
    pub started_at: DateTime<Utc>,
    pub last_tick_at: Option<DateTime<Utc>>,
}
