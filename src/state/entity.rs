use serde::{Deserialize, Serialize};

/// Lowest value a risk or severity score may take
pub const SCORE_MIN: i32 = 0;

/// Highest value a risk or severity score may take
pub const SCORE_MAX: i32 = 100;

/// A monitored river gauge
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitoredRiver {
    /// Numeric gauge identifier, unique within a snapshot
    pub id: u32,

    /// Display name (e.g., "Mithi River")
    pub name: String,

    /// Water level in meters, kept at two decimals
    pub level: f64,

    /// Flood risk score in [0, 100]
    pub risk: u8,
}

/// A danger zone with a severity score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    /// Zone identifier (e.g., "DZ-01")
    pub id: String,

    /// Severity score in [0, 100]
    pub severity: u8,
}

/// A camera with a risk score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera identifier (e.g., "CAM-01")
    pub id: String,

    /// Risk score in [0, 100]
    pub risk: u8,
}

/// One complete, internally consistent copy of every monitored entity.
///
/// Published snapshots are shared behind an `Arc` and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rivers: Vec<MonitoredRiver>,
    pub zones: Vec<DangerZone>,
    pub cameras: Vec<Camera>,
}

impl Snapshot {
    pub fn new(rivers: Vec<MonitoredRiver>, zones: Vec<DangerZone>, cameras: Vec<Camera>) -> Self {
        Self {
            rivers,
            zones,
            cameras,
        }
    }

    /// Total number of monitored entities across all kinds
    pub fn entity_count(&self) -> usize {
        self.rivers.len() + self.zones.len() + self.cameras.len()
    }
}
