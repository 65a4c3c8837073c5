use crate::state::Snapshot;
use serde::Serialize;

/// Event name carried on every snapshot push
pub const LIVE_DATA: &str = "liveData";

/// Server → Client: full snapshot push (on connect and on every tick)
///
/// Serializes as `{"type":"liveData","rivers":[..],"zones":[..],"cameras":[..]}`.
#[derive(Debug, Clone, Serialize)]
pub struct LiveDataMessage<'a> {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
}

impl<'a> From<&'a Snapshot> for LiveDataMessage<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            msg_type: LIVE_DATA,
            snapshot,
        }
    }
}
