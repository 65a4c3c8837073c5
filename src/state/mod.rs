// Telemetry state store and the per-tick random walk

mod entity;
mod jitter;
mod store;

pub use entity::{Camera, DangerZone, MonitoredRiver, Snapshot, SCORE_MAX, SCORE_MIN};
pub use jitter::{Jitter, RandomJitter, ScriptedJitter};
pub use store::{
    clamp, step_level, step_score, SnapshotStore, CAMERA_RISK_STEP, LEVEL_STEP, RIVER_RISK_STEP,
    ZONE_SEVERITY_STEP,
};

#[cfg(test)]
mod tests;
