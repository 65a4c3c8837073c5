use crate::state::Snapshot;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

/// Identity of one viewer connection
pub type SubscriberId = Uuid;

/// Send half held by the registry for one subscriber
pub type SnapshotSender = mpsc::Sender<Arc<Snapshot>>;

/// Receive half handed to the transport for one subscriber
pub type SnapshotReceiver = mpsc::Receiver<Arc<Snapshot>>;

/// A registered subscriber as seen by its transport task.
///
/// `rx` yields the connect-time snapshot first, then one snapshot per tick.
/// It returns `None` once the broadcast service has dropped the subscriber.
pub struct Subscription {
    pub id: SubscriberId,
    pub rx: SnapshotReceiver,
}

/// Why a snapshot could not be queued for a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Transport task is gone
    Closed,
    /// Subscriber has not drained earlier snapshots
    Lagging,
}

impl std::fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryFailure::Closed => write!(f, "transport closed"),
            DeliveryFailure::Lagging => write!(f, "subscriber lagging"),
        }
    }
}

/// Queue a snapshot without blocking
pub(crate) fn deliver(tx: &SnapshotSender, snapshot: &Arc<Snapshot>) -> Result<(), DeliveryFailure> {
    tx.try_send(Arc::clone(snapshot)).map_err(|e| match e {
        TrySendError::Closed(_) => DeliveryFailure::Closed,
        TrySendError::Full(_) => DeliveryFailure::Lagging,
    })
}
