use crate::state::entity::{Camera, DangerZone, MonitoredRiver, Snapshot, SCORE_MAX, SCORE_MIN};
use crate::state::jitter::Jitter;
use std::sync::Arc;

/// Half-open draw range for river level changes (meters)
pub const LEVEL_STEP: (f64, f64) = (-0.5, 0.5);

/// Half-open draw range for river risk changes
pub const RIVER_RISK_STEP: (f64, f64) = (-5.0, 5.0);

/// Half-open draw range for zone severity changes
pub const ZONE_SEVERITY_STEP: (f64, f64) = (-4.0, 4.0);

/// Half-open draw range for camera risk changes
pub const CAMERA_RISK_STEP: (f64, f64) = (-3.0, 3.0);

/// Owns the current snapshot and the random walk that advances it.
///
/// The store has no interior locking; its owner (the broadcast hub) decides
/// how access is synchronized.
pub struct SnapshotStore {
    current: Arc<Snapshot>,
    jitter: Box<dyn Jitter>,
}

impl SnapshotStore {
    pub fn new(seed: Snapshot, jitter: Box<dyn Jitter>) -> Self {
        Self {
            current: Arc::new(seed),
            jitter,
        }
    }

    /// Latest committed snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Compute the next snapshot and commit it.
    ///
    /// The whole next snapshot is built before it replaces the current one,
    /// so a reader holding the previous `Arc` never sees a partial update.
    pub fn advance(&mut self) -> Arc<Snapshot> {
        let jitter = self.jitter.as_mut();
        let prev = &self.current;

        let rivers = prev
            .rivers
            .iter()
            .map(|river| {
                let level = step_level(river.level, jitter.uniform(LEVEL_STEP.0, LEVEL_STEP.1));
                let risk = step_score(
                    river.risk,
                    jitter.uniform(RIVER_RISK_STEP.0, RIVER_RISK_STEP.1),
                );
                MonitoredRiver {
                    level,
                    risk,
                    ..river.clone()
                }
            })
            .collect();

        let zones = prev
            .zones
            .iter()
            .map(|zone| DangerZone {
                id: zone.id.clone(),
                severity: step_score(
                    zone.severity,
                    jitter.uniform(ZONE_SEVERITY_STEP.0, ZONE_SEVERITY_STEP.1),
                ),
            })
            .collect();

        let cameras = prev
            .cameras
            .iter()
            .map(|camera| Camera {
                id: camera.id.clone(),
                risk: step_score(
                    camera.risk,
                    jitter.uniform(CAMERA_RISK_STEP.0, CAMERA_RISK_STEP.1),
                ),
            })
            .collect();

        self.current = Arc::new(Snapshot::new(rivers, zones, cameras));
        Arc::clone(&self.current)
    }
}

/// `round(level + draw, 2)`, unclamped
pub fn step_level(level: f64, draw: f64) -> f64 {
    round2(level + draw)
}

/// `clamp(score + floor(draw), 0, 100)`
pub fn step_score(score: u8, draw: f64) -> u8 {
    let next = i32::from(score) + draw.floor() as i32;
    // Bounded to [0, 100] so the narrowing cast is lossless
    clamp(next, SCORE_MIN, SCORE_MAX) as u8
}

/// `min(hi, max(lo, v))`
pub fn clamp(v: i32, lo: i32, hi: i32) -> i32 {
    hi.min(lo.max(v))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
