//! Key-to-seed converter for MealyCrypt key derivation.
//!
//! Folds a key string into a 32-bit signed hash and maps it into the
//! chaotic band of the logistic map.
//!
//! The process:
//! 1. Each UTF-16 code unit of the key is folded as `hash * 31 + unit`
//!    with two's-complement wrap-around.
//! 2. `|hash| mod 800000` is scaled by `1e-6` and offset by `0.1`, which
//!    keeps the seed inside `[0.1, 0.9)` and away from the fixed points.

use zeroize::Zeroize;

/// Lower bound of the seed band.
const SEED_OFFSET: f64 = 0.1;

/// Modulus applied to the absolute hash.
const SEED_SPAN: i64 = 800_000;

/// Scale that maps the reduced hash into the seed band.
const SEED_SCALE: f64 = 1_000_000.0;

/// Converts a key string into the initial iterate of the logistic map.
///
/// The key itself is not retained; only the hash and the derived seed are
/// kept, and both are cleared on drop.
pub struct KeySeed {
    hash: i32,
    seed: f64,
}

impl KeySeed {
    /// Derives the hash and seed for `key`.
    ///
    /// Any key is accepted, including the empty string (hash 0, seed 0.1).
    pub fn new(key: &str) -> Self {
        let hash = Self::hash_key(key);
        let seed = SEED_OFFSET + (i64::from(hash).abs() % SEED_SPAN) as f64 / SEED_SCALE;
        KeySeed { hash, seed }
    }

    /// Returns the 32-bit signed key hash.
    pub fn hash(&self) -> i32 {
        self.hash
    }

    /// Returns the seed in `[0.1, 0.9)`.
    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Folds the UTF-16 code units of `key` into a wrapping `i32` hash.
    fn hash_key(key: &str) -> i32 {
        key.encode_utf16().fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
    }
}

impl Zeroize for KeySeed {
    fn zeroize(&mut self) {
        self.hash.zeroize();
        self.seed.zeroize();
    }
}

impl Drop for KeySeed {
    /// Clears the derived key material on drop.
    fn drop(&mut self) {
        self.zeroize();
    }
}
