//! Logistic map for chaotic number generation.
//!
//! Iterates `x' = r * x * (1 - x)` in IEEE-754 double precision with
//! `r = 3.9999`, deep in the chaotic regime.

use zeroize::Zeroize;

/// Growth rate of the map.
pub const GROWTH_RATE: f64 = 3.9999;

/// Iterate the map is reset to when it escapes the open interval (0, 1).
const RESET_POINT: f64 = 0.5;

/// Trait for one-dimensional chaotic maps.
pub trait ChaoticMap {
    /// Sets the current iterate.
    fn set_initial_point(&mut self, x: f64);

    /// Advances the map by one iteration.
    fn next_point(&mut self);

    /// Returns the current iterate.
    fn x(&self) -> f64;
}

/// Logistic map with degeneracy protection.
///
/// If an iteration lands on or outside the boundary of (0, 1), or produces
/// a non-finite value, the iterate is replaced with exactly 0.5 so the map
/// never collapses onto the fixed point at 0.
pub struct LogisticMap {
    x: f64,
    r: f64,
}

impl Default for LogisticMap {
    /// Creates a map at the reset point with the standard growth rate.
    fn default() -> Self {
        LogisticMap {
            x: RESET_POINT,
            r: GROWTH_RATE,
        }
    }
}

impl LogisticMap {
    /// Creates a map starting at `x`.
    pub fn new(x: f64) -> Self {
        let mut map = LogisticMap::default();
        map.set_initial_point(x);
        map
    }

    /// Returns the growth rate.
    pub fn r(&self) -> f64 {
        self.r
    }
}

impl ChaoticMap for LogisticMap {
    fn set_initial_point(&mut self, x: f64) {
        self.x = x;
    }

    fn next_point(&mut self) {
        let next = self.r * self.x * (1.0 - self.x);
        // Escape guard: 0 and 1 both lead to the absorbing fixed point
        self.x = if next > 0.0 && next < 1.0 {
            next
        } else {
            RESET_POINT
        };
    }

    fn x(&self) -> f64 {
        self.x
    }
}

impl Zeroize for LogisticMap {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.r.zeroize();
    }
}

impl Drop for LogisticMap {
    /// Clears the iterate and parameter on drop.
    fn drop(&mut self) {
        self.zeroize();
    }
}
