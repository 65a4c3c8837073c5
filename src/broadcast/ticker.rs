use crate::broadcast::BroadcastService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Advance and publish on every tick, forever.
///
/// The store advances whether or not anyone is subscribed.
pub async fn run_ticker(service: Arc<BroadcastService>, first: Instant, period: Duration) {
    let mut ticker = interval_at(first, period);

    // Skip missed ticks to prevent a burst after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let report = service.tick();
        debug!(
            tick = service.metrics.get_tick_count(),
            delivered = report.delivered,
            dropped = report.dropped,
            "Tick published"
        );
    }
}
