//! Injectable randomness
//!
//! Every random decision in a session (mood flips, QTE spawns, entity types,
//! target placement) draws from a `RandomSource`, so tests can script the draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform draws in [0, 1)
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Seeded PCG source used in play
#[derive(Debug, Clone)]
pub struct PcgSource {
    seed: u64,
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats a fallback value forever
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
    fallback: f64,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            cursor: 0,
            fallback: 0.5,
        }
    }

    /// A source that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new()).then(value)
    }

    /// Value returned once the scripted draws run out
    pub fn then(mut self, fallback: f64) -> Self {
        self.fallback = sanitize(fallback);
        self
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.draws.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        sanitize(value)
    }
}

/// Keep scripted values inside [0, 1)
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}
