//! Automaton: keyed Mealy machine transition and output tables.
//!
//! Holds the flat `delta`, `lambda` and `lambda_inverse` tables derived
//! from one entropy stream. Tables are row-major (`state * 256 + symbol`)
//! and immutable once built.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::{MealyCryptError, Result};
use crate::random::chaotic_generator::{ChaoticGenerator, DEFAULT_STABILIZATION_STEPS};
use crate::random::entropy::EntropySource;

/// Input/output alphabet size (one byte).
pub const ALPHABET_SIZE: usize = 256;

/// Default number of automaton states.
pub const DEFAULT_STATES: usize = 1024;

/// Maximum number of automaton states.
pub const MAX_STATES: usize = 65536;

/// Default number of warm-up transitions before each encrypt/decrypt call.
pub const DEFAULT_WARMUP_STEPS: usize = 500;

/// Default number of trajectory steps captured per call.
pub const DEFAULT_TRACE_LIMIT: usize = 20;

/// Tunable parameters for building and running an automaton.
///
/// The defaults reproduce the reference tables; changing any of them
/// produces a different (but still invertible) cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonParams {
    /// Number of states `n` (1..=65536).
    pub states: usize,
    /// Burn-in iterations of the chaotic generator.
    pub stabilization_steps: usize,
    /// Data-independent transitions applied at the start of every call.
    pub warmup_steps: usize,
    /// Number of leading steps recorded in each trajectory.
    pub trace_limit: usize,
}

impl Default for AutomatonParams {
    fn default() -> Self {
        AutomatonParams {
            states: DEFAULT_STATES,
            stabilization_steps: DEFAULT_STABILIZATION_STEPS,
            warmup_steps: DEFAULT_WARMUP_STEPS,
            trace_limit: DEFAULT_TRACE_LIMIT,
        }
    }
}

impl AutomatonParams {
    /// Checks that the parameters describe a buildable automaton.
    ///
    /// # Errors
    /// Returns [`MealyCryptError::InvalidStateCount`] if `states` is 0 or
    /// greater than 65536.
    pub fn validate(&self) -> Result<()> {
        check_states(self.states)
    }
}

/// Rejects state counts outside `1..=MAX_STATES`.
fn check_states(states: usize) -> Result<()> {
    if !(1..=MAX_STATES).contains(&states) {
        return Err(MealyCryptError::InvalidStateCount { states });
    }
    Ok(())
}

/// Keyed Mealy machine over the byte alphabet.
///
/// # Invariants
///
/// For every state `s`, row `s` of `lambda` is a permutation of `0..256`
/// and row `s` of `lambda_inverse` is its exact inverse. Every entry of
/// `delta` is a valid state index.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    states: usize,
    delta: Vec<u32>,
    lambda: Vec<u8>,
    lambda_inverse: Vec<u8>,
}

impl Automaton {
    /// Builds the automaton for `key` using the chaotic generator.
    ///
    /// # Errors
    /// Returns [`MealyCryptError::InvalidStateCount`] if the parameters are
    /// out of range.
    pub fn from_key(key: &str, params: &AutomatonParams) -> Result<Self> {
        params.validate()?;
        let mut generator = ChaoticGenerator::with_stabilization(key, params.stabilization_steps);
        Self::from_source(&mut generator, params.states)
    }

    /// Builds the automaton from an arbitrary entropy source.
    ///
    /// Draws exactly `2 * states * 256` values. The first half fills
    /// `delta` row by row; the second half drives one Fisher-Yates shuffle
    /// per state, 255 draws each, leaving the last `states` values unused.
    ///
    /// Rows are filled in parallel. Each row reads only the slice of the
    /// stream a sequential pass would have read for it, so the result does
    /// not depend on scheduling.
    ///
    /// # Errors
    /// Returns [`MealyCryptError::InvalidStateCount`] if `states` is out of range.
    pub fn from_source(source: &mut dyn EntropySource, states: usize) -> Result<Self> {
        check_states(states)?;
        Ok(Self::build(source, states))
    }

    /// Table construction shared by the validated constructors.
    ///
    /// `states` must already be within `1..=MAX_STATES`.
    pub(crate) fn build(source: &mut dyn EntropySource, states: usize) -> Self {
        let cells = states * ALPHABET_SIZE;
        let entropy = source.stream(2 * cells);
        let (transition_entropy, output_entropy) = entropy.split_at(cells);

        let mut delta = vec![0u32; cells];
        let modulus = states as u32;
        delta
            .par_chunks_mut(ALPHABET_SIZE)
            .zip(transition_entropy.par_chunks(ALPHABET_SIZE))
            .for_each(|(row, draws)| {
                for (cell, &draw) in row.iter_mut().zip(draws) {
                    *cell = draw % modulus;
                }
            });

        let draws_per_row = ALPHABET_SIZE - 1;
        let mut lambda = vec![0u8; cells];
        let mut lambda_inverse = vec![0u8; cells];
        lambda
            .par_chunks_mut(ALPHABET_SIZE)
            .zip(lambda_inverse.par_chunks_mut(ALPHABET_SIZE))
            .zip(output_entropy[..states * draws_per_row].par_chunks(draws_per_row))
            .for_each(|((perm, inverse), draws)| Self::shuffle_row(perm, inverse, draws));

        debug!(
            states,
            symbols = ALPHABET_SIZE,
            entropy_drawn = entropy.len(),
            "automaton tables built"
        );

        Automaton {
            states,
            delta,
            lambda,
            lambda_inverse,
        }
    }

    /// Fills one output row with a Fisher-Yates permutation and its inverse.
    ///
    /// `draws[0]` selects the swap partner for index 255, `draws[254]` the
    /// partner for index 1.
    fn shuffle_row(perm: &mut [u8], inverse: &mut [u8], draws: &[u32]) {
        for (k, slot) in perm.iter_mut().enumerate() {
            *slot = k as u8;
        }
        for (i, &draw) in (1..perm.len()).rev().zip(draws) {
            let j = (draw % (i as u32 + 1)) as usize;
            perm.swap(i, j);
        }
        for (k, &p) in perm.iter().enumerate() {
            inverse[p as usize] = k as u8;
        }
    }

    /// Returns the number of states `n`.
    pub fn states(&self) -> usize {
        self.states
    }

    /// Returns the alphabet size `m` (always 256).
    pub fn symbols(&self) -> usize {
        ALPHABET_SIZE
    }

    /// Returns `delta[state][symbol]`.
    ///
    /// # Panics
    /// Panics if `state >= self.states()`.
    #[inline]
    pub fn next_state(&self, state: usize, symbol: u8) -> usize {
        self.delta[Self::index(state, symbol)] as usize
    }

    /// Returns `lambda[state][symbol]`.
    ///
    /// # Panics
    /// Panics if `state >= self.states()`.
    #[inline]
    pub fn output(&self, state: usize, symbol: u8) -> u8 {
        self.lambda[Self::index(state, symbol)]
    }

    /// Returns `lambda_inverse[state][symbol]`.
    ///
    /// # Panics
    /// Panics if `state >= self.states()`.
    #[inline]
    pub fn inverse_output(&self, state: usize, symbol: u8) -> u8 {
        self.lambda_inverse[Self::index(state, symbol)]
    }

    /// Flat row-major transition table.
    pub fn delta(&self) -> &[u32] {
        &self.delta
    }

    /// Flat row-major output table.
    pub fn lambda(&self) -> &[u8] {
        &self.lambda
    }

    /// Flat row-major inverse output table.
    pub fn lambda_inverse(&self) -> &[u8] {
        &self.lambda_inverse
    }

    /// Verifies the table invariants.
    ///
    /// Returns `true` when every `lambda` row is a permutation, every
    /// `lambda_inverse` row inverts it, and every transition targets a
    /// valid state.
    pub fn is_consistent(&self) -> bool {
        let transitions_ok = self.delta.iter().all(|&d| (d as usize) < self.states);
        let rows_ok = self
            .lambda
            .chunks(ALPHABET_SIZE)
            .zip(self.lambda_inverse.chunks(ALPHABET_SIZE))
            .all(|(row, inverse)| {
                let mut seen = [false; ALPHABET_SIZE];
                for &out in row {
                    if seen[out as usize] {
                        return false;
                    }
                    seen[out as usize] = true;
                }
                row.iter()
                    .enumerate()
                    .all(|(x, &out)| inverse[out as usize] as usize == x)
            });
        transitions_ok && rows_ok
    }

    #[inline]
    fn index(state: usize, symbol: u8) -> usize {
        state * ALPHABET_SIZE + symbol as usize
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("states", &self.states)
            .field("symbols", &ALPHABET_SIZE)
            .finish_non_exhaustive()
    }
}

impl Zeroize for Automaton {
    fn zeroize(&mut self) {
        self.delta.zeroize();
        self.lambda.zeroize();
        self.lambda_inverse.zeroize();
        self.states.zeroize();
    }
}

impl Drop for Automaton {
    /// Clears the key-derived tables on drop.
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts up from a fixed start; lets tests predict every table entry.
    struct Counter(u32);

    impl EntropySource for Counter {
        fn next_value(&mut self) -> u32 {
            let v = self.0;
            self.0 = self.0.wrapping_add(1);
            v
        }
    }

    /// Sequential reference of the builder's cursor discipline.
    fn sequential_build(source: &mut dyn EntropySource, n: usize) -> (Vec<u32>, Vec<u8>, Vec<u8>) {
        let m = ALPHABET_SIZE;
        let entropy = source.stream(2 * n * m);
        let mut cursor = 0;
        let mut delta = vec![0u32; n * m];
        for s in 0..n {
            for i in 0..m {
                delta[s * m + i] = entropy[cursor] % n as u32;
                cursor += 1;
            }
        }
        let mut lambda = vec![0u8; n * m];
        let mut inverse = vec![0u8; n * m];
        for s in 0..n {
            let mut perm: Vec<usize> = (0..m).collect();
            for i in (1..m).rev() {
                let j = (entropy[cursor] % (i as u32 + 1)) as usize;
                perm.swap(i, j);
                cursor += 1;
            }
            for k in 0..m {
                lambda[s * m + k] = perm[k] as u8;
                inverse[s * m + perm[k]] = k as u8;
            }
        }
        (delta, lambda, inverse)
    }

    #[test]
    fn test_params_default() {
        let params = AutomatonParams::default();
        assert_eq!(params.states, 1024);
        assert_eq!(params.stabilization_steps, 1000);
        assert_eq!(params.warmup_steps, 500);
        assert_eq!(params.trace_limit, 20);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validate_range() {
        let zero = AutomatonParams {
            states: 0,
            ..AutomatonParams::default()
        };
        assert_eq!(
            zero.validate(),
            Err(MealyCryptError::InvalidStateCount { states: 0 })
        );
        let too_many = AutomatonParams {
            states: MAX_STATES + 1,
            ..AutomatonParams::default()
        };
        assert!(too_many.validate().is_err());
        let max = AutomatonParams {
            states: MAX_STATES,
            ..AutomatonParams::default()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_params_deserialize_partial_uses_defaults() {
        let params: AutomatonParams = serde_json::from_str(r#"{"states": 64}"#).unwrap();
        assert_eq!(params.states, 64);
        assert_eq!(params.warmup_steps, DEFAULT_WARMUP_STEPS);
    }

    #[test]
    fn test_from_source_rejects_zero_states() {
        let mut source = Counter(0);
        assert!(Automaton::from_source(&mut source, 0).is_err());
    }

    #[test]
    fn test_from_source_draws_exactly_two_n_m() {
        let mut source = Counter(0);
        Automaton::from_source(&mut source, 3).unwrap();
        assert_eq!(source.0 as usize, 2 * 3 * ALPHABET_SIZE);
    }

    #[test]
    fn test_transition_fill_order() {
        let mut source = Counter(0);
        let automaton = Automaton::from_source(&mut source, 7).unwrap();
        for s in 0..7 {
            for i in 0..ALPHABET_SIZE {
                let cursor = (s * ALPHABET_SIZE + i) as u32;
                assert_eq!(automaton.next_state(s, i as u8), (cursor % 7) as usize);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential_reference() {
        let n = 16;
        let mut a = ChaoticGenerator::new("reference");
        let mut b = ChaoticGenerator::new("reference");
        let automaton = Automaton::from_source(&mut a, n).unwrap();
        let (delta, lambda, inverse) = sequential_build(&mut b, n);
        assert_eq!(automaton.delta(), delta.as_slice());
        assert_eq!(automaton.lambda(), lambda.as_slice());
        assert_eq!(automaton.lambda_inverse(), inverse.as_slice());
    }

    #[test]
    fn test_zero_entropy_gives_rotation_permutation() {
        // All-zero draws swap every index with 0: perm = [1, 2, ..., 255, 0]
        struct Zeros;
        impl EntropySource for Zeros {
            fn next_value(&mut self) -> u32 {
                0
            }
        }
        let automaton = Automaton::from_source(&mut Zeros, 1).unwrap();
        for k in 0..ALPHABET_SIZE {
            assert_eq!(automaton.output(0, k as u8), ((k + 1) % ALPHABET_SIZE) as u8);
        }
        assert_eq!(automaton.inverse_output(0, 0), 255);
        assert!(automaton.is_consistent());
    }

    #[test]
    fn test_permutation_invariant_from_key() {
        let automaton = Automaton::from_key("invariant", &AutomatonParams::default()).unwrap();
        assert_eq!(automaton.states(), DEFAULT_STATES);
        assert_eq!(automaton.symbols(), ALPHABET_SIZE);
        assert!(automaton.is_consistent());
        for s in [0, 1, 511, 1023] {
            for x in 0..=255u8 {
                assert_eq!(automaton.inverse_output(s, automaton.output(s, x)), x);
            }
        }
    }

    #[test]
    fn test_is_consistent_detects_broken_row() {
        let mut automaton = Automaton::from_source(&mut Counter(3), 2).unwrap();
        assert!(automaton.is_consistent());
        let first = automaton.lambda[0];
        automaton.lambda[1] = first;
        assert!(!automaton.is_consistent());
    }

    #[test]
    fn test_same_key_same_tables() {
        let params = AutomatonParams {
            states: 128,
            ..AutomatonParams::default()
        };
        let a = Automaton::from_key("determinism", &params).unwrap();
        let b = Automaton::from_key("determinism", &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zeroize_clears_tables() {
        let mut automaton = Automaton::from_source(&mut Counter(9), 4).unwrap();
        automaton.zeroize();
        assert_eq!(automaton.states(), 0);
        assert!(automaton.delta().is_empty());
        assert!(automaton.lambda().is_empty());
        assert!(automaton.lambda_inverse().is_empty());
    }

    #[test]
    fn test_check_states_shared_by_both_constructors() {
        for states in [0, MAX_STATES + 1] {
            let expected = Err(MealyCryptError::InvalidStateCount { states });
            assert_eq!(check_states(states), expected);
            let params = AutomatonParams {
                states,
                ..AutomatonParams::default()
            };
            assert_eq!(params.validate(), expected);
            assert_eq!(
                Automaton::from_source(&mut Counter(0), states).unwrap_err(),
                MealyCryptError::InvalidStateCount { states }
            );
        }
        assert!(check_states(1).is_ok());
        assert!(check_states(MAX_STATES).is_ok());
    }

    #[test]
    fn test_debug_hides_tables() {
        let automaton = Automaton::from_source(&mut Counter(0), 2).unwrap();
        let text = format!("{:?}", automaton);
        assert!(text.contains("states: 2"));
        assert!(!text.contains("delta"));
    }
}
