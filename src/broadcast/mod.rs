// Periodic snapshot fan-out to connected viewers

mod metrics;
mod service;
mod subscriber;
mod ticker;

pub use metrics::{BroadcastMetrics, MetricsSnapshot};
pub use service::{BroadcastService, TickReport};
pub use subscriber::{
    DeliveryFailure, SnapshotReceiver, SnapshotSender, SubscriberId, Subscription,
};
pub use ticker::run_ticker;
