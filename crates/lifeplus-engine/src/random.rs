//! Random sources for the stochastic engine.
//!
//! The directional engine consumes uniform draws in `[0, 1)` through
//! [`RandomSource`], one draw per random decision. Seeded runs are
//! reproducible only if the same draws arrive in the same order, so sources
//! are always passed in by the caller.

use rand::rngs::{OsRng, ThreadRng};
use rand::{Rng, RngCore};
use rand_chacha::ChaCha8Rng;

/// A stream of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Small 32-bit generator keyed by a `u32` seed.
///
/// Each draw is a full 32-bit output divided by 2^32, so a seed replays the
/// same sequence across implementations of this generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        t ^ (t >> 14)
    }
}

impl RandomSource for Mulberry32 {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty script always yields 0.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    draws: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, draws: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.draws % self.values.len()]
        };
        self.draws += 1;
        value
    }
}

/// Parse a decimal seed. Only ASCII digits (after trimming) fitting in a
/// `u32` are accepted.
pub fn parse_seed(text: &str) -> Option<u32> {
    let raw = text.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok()
}

/// A fresh seed from the operating system.
pub fn random_seed() -> u32 {
    OsRng.next_u32()
}
