use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws that perturb telemetry each tick.
///
/// `uniform(lo, hi)` must return a value in the half-open range `[lo, hi)`.
pub trait Jitter: Send {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

/// Production jitter backed by a `StdRng`
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed, for reproducible demo runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Jitter for RandomJitter {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..hi)
    }
}

/// Replays a fixed list of draws in order, ignoring the requested range.
///
/// Once the script runs out it keeps returning the last value (or 0.0 when
/// empty). Used to force specific perturbations.
#[derive(Debug, Clone, Default)]
pub struct ScriptedJitter {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedJitter {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }
}

impl Jitter for ScriptedJitter {
    fn uniform(&mut self, _lo: f64, _hi: f64) -> f64 {
        let value = self
            .draws
            .get(self.next)
            .or_else(|| self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.next += 1;
        value
    }
}
