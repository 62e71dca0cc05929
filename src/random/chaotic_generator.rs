//! ChaoticGenerator: key-seeded PRNG driven by the logistic map.
//!
//! Produces a reproducible stream of 32-bit values from a key. The map is
//! seeded through [`KeySeed`], burned in for a number of stabilization
//! steps, and then sampled once per output value.

use super::entropy::EntropySource;
use super::key_seed::KeySeed;
use super::logistic::{ChaoticMap, LogisticMap};

/// Default number of burn-in iterations discarded before any output.
pub const DEFAULT_STABILIZATION_STEPS: usize = 1000;

/// Scale applied to the iterate before truncation.
const EXTRACT_SCALE: f64 = 1e14;

/// Divisor that drops the low-order bits of the scaled iterate.
const EXTRACT_SHIFT: u64 = 256;

/// Key-seeded chaotic PRNG.
///
/// Every output is `floor(floor(x * 1e14) / 256)` truncated to 32 bits,
/// where `x` is the logistic iterate after one more step. The low bits of
/// the scaled iterate track the previous iterate most closely, so they are
/// discarded.
///
/// # Reproducibility
///
/// Two generators built from the same key and stabilization count produce
/// identical streams on every platform: all arithmetic is IEEE-754 `f64`
/// and the key hash uses explicit 32-bit wrap-around.
pub struct ChaoticGenerator {
    map: LogisticMap,
}

impl ChaoticGenerator {
    /// Creates a generator for `key` with the default 1000-step burn-in.
    pub fn new(key: &str) -> Self {
        Self::with_stabilization(key, DEFAULT_STABILIZATION_STEPS)
    }

    /// Creates a generator for `key`, discarding `stabilization_steps`
    /// iterations of transient behavior.
    ///
    /// # Parameters
    /// - `key`: Secret key string (any length, empty allowed).
    /// - `stabilization_steps`: Number of map iterations to discard.
    pub fn with_stabilization(key: &str, stabilization_steps: usize) -> Self {
        let seed = KeySeed::new(key);
        let mut map = LogisticMap::new(seed.seed());

        for _ in 0..stabilization_steps {
            map.next_point();
        }

        ChaoticGenerator { map }
    }

    /// Advances the underlying map by one iteration.
    pub fn transition(&mut self) {
        self.map.next_point();
    }

    /// Returns the current logistic iterate.
    pub fn state(&self) -> f64 {
        self.map.x()
    }

    /// Extracts the 32-bit output for an iterate.
    ///
    /// `x * 1e14` stays below 2^47, so the integer division is exact in
    /// `u64`; the final cast keeps the low 32 bits.
    fn extract(x: f64) -> u32 {
        let scaled = (x * EXTRACT_SCALE).floor() as u64;
        (scaled / EXTRACT_SHIFT) as u32
    }
}

impl EntropySource for ChaoticGenerator {
    fn next_value(&mut self) -> u32 {
        self.transition();
        Self::extract(self.map.x())
    }
}
