//! MealyCipher: keyed substitution-with-memory byte cipher.
//!
//! Runs a byte sequence through the keyed [`Automaton`]. Each byte is
//! substituted through the current state's output permutation, and the
//! next state depends on the state, the byte and the byte's position.
//! Ciphertext has exactly the length of the plaintext.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::automaton::{Automaton, AutomatonParams, ALPHABET_SIZE};
use crate::error::Result;
use crate::random::chaotic_generator::ChaoticGenerator;
use crate::trajectory::{Trajectory, TrajectoryStep};
use crate::utils::converter;

/// Result of one encrypt or decrypt call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherOutput {
    /// Transformed bytes, same length as the input.
    pub bytes: Vec<u8>,
    /// Leading state transitions of the call.
    pub trajectory: Trajectory,
    /// Wall-clock time spent in the transform.
    pub elapsed: Duration,
}

impl CipherOutput {
    /// Consumes the output and returns the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decodes the bytes as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`MealyCryptError::InvalidText`](crate::error::MealyCryptError::InvalidText)
    /// if the bytes are not valid UTF-8, e.g. after decrypting with the
    /// wrong key.
    pub fn into_text(self) -> Result<String> {
        Ok(String::from_utf8(self.bytes)?)
    }

    /// Lowercase hex rendering of the bytes.
    pub fn to_hex(&self) -> String {
        converter::to_hex(&self.bytes)
    }
}

/// Per-call cipher state.
///
/// Lives on the stack of one encrypt/decrypt call, so calls on a shared
/// cipher never observe each other.
struct CipherSession<'a> {
    automaton: &'a Automaton,
    current_state: usize,
}

impl<'a> CipherSession<'a> {
    /// Starts at state 0 and applies `warmup_steps` fixed transitions,
    /// feeding symbol `j mod 256` at step `j`.
    fn warm(automaton: &'a Automaton, warmup_steps: usize) -> Self {
        let mut current_state = 0;
        for j in 0..warmup_steps {
            current_state = automaton.next_state(current_state, (j % ALPHABET_SIZE) as u8);
        }
        CipherSession {
            automaton,
            current_state,
        }
    }

    /// Moves to `(delta[s][plain] + position) mod n` and returns the
    /// previous state.
    #[inline]
    fn advance(&mut self, plain: u8, position: usize) -> (usize, usize) {
        let state = self.current_state;
        let next = (self.automaton.next_state(state, plain) + position) % self.automaton.states();
        self.current_state = next;
        (state, next)
    }
}

/// Keyed Mealy machine cipher.
///
/// Built once per key; encryption and decryption borrow it immutably, so a
/// single instance can serve concurrent calls. Changing the key means
/// building a new `MealyCipher`.
///
/// # Examples
///
/// ```
/// use mealycrypt::MealyCipher;
///
/// let cipher = MealyCipher::new("secret");
/// let sealed = cipher.encrypt(b"Hello");
/// assert_eq!(sealed.bytes.len(), 5);
///
/// let opened = cipher.decrypt(&sealed.bytes);
/// assert_eq!(opened.bytes, b"Hello");
/// ```
#[derive(Debug, Clone)]
pub struct MealyCipher {
    automaton: Automaton,
    params: AutomatonParams,
    build_time: Duration,
}

impl MealyCipher {
    /// Builds the cipher for `key` with the default parameters.
    ///
    /// Any key is valid, including the empty string.
    pub fn new(key: &str) -> Self {
        let params = AutomatonParams::default();
        let start = Instant::now();
        let mut generator = ChaoticGenerator::with_stabilization(key, params.stabilization_steps);
        let automaton = Automaton::build(&mut generator, params.states);
        Self::assemble(automaton, params, start.elapsed())
    }

    /// Builds the cipher for `key` with custom parameters.
    ///
    /// # Errors
    /// Returns [`MealyCryptError::InvalidStateCount`](crate::error::MealyCryptError::InvalidStateCount)
    /// if `params.states` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use mealycrypt::{AutomatonParams, MealyCipher};
    ///
    /// let params = AutomatonParams { states: 64, ..AutomatonParams::default() };
    /// let cipher = MealyCipher::with_params("secret", params).unwrap();
    /// assert_eq!(cipher.automaton().states(), 64);
    ///
    /// let bad = AutomatonParams { states: 0, ..AutomatonParams::default() };
    /// assert!(MealyCipher::with_params("secret", bad).is_err());
    /// ```
    pub fn with_params(key: &str, params: AutomatonParams) -> Result<Self> {
        let start = Instant::now();
        let automaton = Automaton::from_key(key, &params)?;
        Ok(Self::assemble(automaton, params, start.elapsed()))
    }

    /// Wraps an already built automaton.
    ///
    /// `params.states` is taken from the automaton; the remaining fields
    /// control warm-up and tracing.
    pub fn from_automaton(automaton: Automaton, params: AutomatonParams) -> Self {
        let params = AutomatonParams {
            states: automaton.states(),
            ..params
        };
        Self::assemble(automaton, params, Duration::ZERO)
    }

    fn assemble(automaton: Automaton, params: AutomatonParams, build_time: Duration) -> Self {
        debug!(
            states = automaton.states(),
            build_ms = build_time.as_secs_f64() * 1000.0,
            "cipher ready"
        );
        MealyCipher {
            automaton,
            params,
            build_time,
        }
    }

    /// Encrypts `plaintext`.
    ///
    /// Every call starts from the same warmed-up state, so equal inputs
    /// give equal ciphertexts.
    pub fn encrypt(&self, plaintext: &[u8]) -> CipherOutput {
        let start = Instant::now();
        let mut session = CipherSession::warm(&self.automaton, self.params.warmup_steps);
        let mut trajectory = Trajectory::with_limit(self.params.trace_limit);
        let mut ciphertext = Vec::with_capacity(plaintext.len());

        for (position, &plain) in plaintext.iter().enumerate() {
            let output = self.automaton.output(session.current_state, plain);
            let (state, next_state) = session.advance(plain, position);
            ciphertext.push(output);
            if trajectory.wants_more() {
                trajectory.record(TrajectoryStep {
                    t: position,
                    state,
                    input: plain,
                    next_state,
                    output,
                });
            }
        }

        let elapsed = start.elapsed();
        trace!(bytes = plaintext.len(), ?elapsed, "encrypted");
        CipherOutput {
            bytes: ciphertext,
            trajectory,
            elapsed,
        }
    }

    /// Decrypts `ciphertext`.
    ///
    /// Decrypting with a different key is not an error: it yields other
    /// bytes of the same length.
    pub fn decrypt(&self, ciphertext: &[u8]) -> CipherOutput {
        let start = Instant::now();
        let mut session = CipherSession::warm(&self.automaton, self.params.warmup_steps);
        let mut trajectory = Trajectory::with_limit(self.params.trace_limit);
        let mut plaintext = Vec::with_capacity(ciphertext.len());

        for (position, &sealed) in ciphertext.iter().enumerate() {
            let recovered = self.automaton.inverse_output(session.current_state, sealed);
            let (state, next_state) = session.advance(recovered, position);
            plaintext.push(recovered);
            if trajectory.wants_more() {
                trajectory.record(TrajectoryStep {
                    t: position,
                    state,
                    input: recovered,
                    next_state,
                    output: sealed,
                });
            }
        }

        let elapsed = start.elapsed();
        trace!(bytes = ciphertext.len(), ?elapsed, "decrypted");
        CipherOutput {
            bytes: plaintext,
            trajectory,
            elapsed,
        }
    }

    /// Returns the state every call starts from after warm-up.
    pub fn initial_state(&self) -> usize {
        CipherSession::warm(&self.automaton, self.params.warmup_steps).current_state
    }

    /// Returns the underlying automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Returns the parameters the cipher was built with.
    pub fn params(&self) -> &AutomatonParams {
        &self.params
    }

    /// Returns the time spent building the tables.
    pub fn build_time(&self) -> Duration {
        self.build_time
    }
}

/// Builds the cipher for `key`. Call again whenever the key changes.
pub fn build_cipher(key: &str) -> MealyCipher {
    MealyCipher::new(key)
}

/// Encrypts `plaintext` with `cipher`.
pub fn encrypt(cipher: &MealyCipher, plaintext: &[u8]) -> CipherOutput {
    cipher.encrypt(plaintext)
}

/// Decrypts `ciphertext` with `cipher`.
pub fn decrypt(cipher: &MealyCipher, ciphertext: &[u8]) -> CipherOutput {
    cipher.decrypt(ciphertext)
}
