use crate::state::{Camera, DangerZone, Jitter, MonitoredRiver, RandomJitter, Snapshot};
use serde::Deserialize;

/// Initial telemetry and random source for the simulation
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Fixed RNG seed for reproducible runs (entropy when unset)
    #[serde(default)]
    pub rng_seed: Option<u64>,

    #[serde(default = "default_rivers")]
    pub rivers: Vec<MonitoredRiver>,

    #[serde(default = "default_zones")]
    pub zones: Vec<DangerZone>,

    #[serde(default = "default_cameras")]
    pub cameras: Vec<Camera>,
}

fn river(id: u32, name: &str, level: f64, risk: u8) -> MonitoredRiver {
    MonitoredRiver {
        id,
        name: name.to_string(),
        level,
        risk,
    }
}

fn default_rivers() -> Vec<MonitoredRiver> {
    vec![
        river(1, "Mithi River", 4.1, 65),
        river(2, "Ulhas River", 2.3, 20),
        river(3, "Amba River", 5.6, 92),
    ]
}

fn default_zones() -> Vec<DangerZone> {
    [("DZ-01", 78), ("DZ-02", 55), ("DZ-03", 90)]
        .into_iter()
        .map(|(id, severity)| DangerZone {
            id: id.to_string(),
            severity,
        })
        .collect()
}

fn default_cameras() -> Vec<Camera> {
    [("CAM-01", 30), ("CAM-02", 70), ("CAM-03", 90)]
        .into_iter()
        .map(|(id, risk)| Camera {
            id: id.to_string(),
            risk,
        })
        .collect()
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            rivers: default_rivers(),
            zones: default_zones(),
            cameras: default_cameras(),
        }
    }
}

impl SeedConfig {
    /// Initial snapshot, in configured order
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.rivers.clone(), self.zones.clone(), self.cameras.clone())
    }

    pub fn jitter(&self) -> Box<dyn Jitter> {
        match self.rng_seed {
            Some(seed) => Box::new(RandomJitter::seeded(seed)),
            None => Box::new(RandomJitter::from_entropy()),
        }
    }
}
