//! Random number generation subsystem for MealyCrypt.
//!
//! Provides the chaotic PRNG infrastructure based on the logistic map
//! that drives the automaton's table construction.

pub mod chaotic_generator;
pub mod entropy;
pub mod key_seed;
pub mod logistic;
