//! Injectable randomness for accuracy and damage rolls.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed floats.
///
/// Every random decision the engine makes goes through this trait so that a
/// battle can be replayed exactly from a seed or a scripted list of draws.
pub trait RandomSource {
    /// Returns a value in `[lo, hi)`. Scripted sources may return `hi` itself.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

fn scale(unit: f64, lo: f64, hi: f64) -> f64 {
    lo + unit * (hi - lo)
}

/// Reproducible source backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        scale(self.rng.random::<f64>(), lo, hi)
    }
}

/// Non-reproducible source for live play.
#[derive(Debug, Clone)]
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        scale(self.rng.random::<f64>(), lo, hi)
    }
}

/// Replays a fixed list of unit draws, each mapped into the requested range.
///
/// A draw of `0.0` yields `lo` and a draw of `1.0` yields `hi`, which makes it
/// easy to force "always hit" or "maximum variability" in tests.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    index: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, index: 0 }
    }

    /// A source that always hits and never varies damage, for `count` attacks.
    pub fn always_hit(count: usize) -> Self {
        Self::new([0.0, 1.0].repeat(count))
    }

    pub fn remaining(&self) -> usize {
        self.draws.len() - self.index
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let Some(&unit) = self.draws.get(self.index) else {
            panic!(
                "ScriptedRandom exhausted after {} draws! Requested a value in [{}, {}].",
                self.index, lo, hi
            );
        };
        self.index += 1;
        tracing::trace!(unit, lo, hi, "scripted draw consumed");
        scale(unit, lo, hi)
    }
}
