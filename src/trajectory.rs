//! Bounded audit trace of automaton state transitions.

use serde::{Deserialize, Serialize};

/// One recorded cipher step.
///
/// For encryption `input` is the plaintext byte and `output` the emitted
/// ciphertext byte. For decryption `input` is the recovered plaintext byte
/// and `output` the consumed ciphertext byte, so the same step of an
/// encrypt and a decrypt pass records identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryStep {
    /// Position of the byte in the sequence.
    pub t: usize,
    /// State before the transition.
    #[serde(rename = "s")]
    pub state: usize,
    /// Plaintext byte fed to the machine.
    #[serde(rename = "i")]
    pub input: u8,
    /// State after the transition.
    #[serde(rename = "sPrime")]
    pub next_state: usize,
    /// Ciphertext byte on the other side of the step.
    #[serde(rename = "o")]
    pub output: u8,
}

/// Leading steps of one encrypt or decrypt call.
///
/// Holds at most `limit` steps; later steps are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    limit: usize,
    steps: Vec<TrajectoryStep>,
}

impl Trajectory {
    /// Creates an empty trajectory that keeps up to `limit` steps.
    pub fn with_limit(limit: usize) -> Self {
        Trajectory {
            limit,
            steps: Vec::with_capacity(limit),
        }
    }

    /// Records `step` if the trajectory is not yet full.
    pub fn record(&mut self, step: TrajectoryStep) {
        if self.steps.len() < self.limit {
            self.steps.push(step);
        }
    }

    /// Returns `true` while more steps can be recorded.
    pub fn wants_more(&self) -> bool {
        self.steps.len() < self.limit
    }

    /// Returns the maximum number of steps kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the recorded steps.
    pub fn steps(&self) -> &[TrajectoryStep] {
        &self.steps
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the recorded steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryStep;
    type IntoIter = std::slice::Iter<'a, TrajectoryStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
