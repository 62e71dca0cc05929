//! MealyCrypt chaos-keyed automaton cipher engine.
//!
//! MealyCrypt is a symmetric byte cipher built from a keyed Mealy machine.
//! A logistic-map PRNG seeded from the key fills the machine's transition
//! table and one output permutation per state. Each plaintext byte is
//! substituted through the current state's permutation, and the next
//! state depends on the state, the byte and its position. Ciphertext has
//! the same length as the plaintext.
//!
//! This is an analysis and teaching cipher. It carries no integrity tag
//! and makes no claim of resistance to known-plaintext, differential or
//! side-channel attacks.
//!
//! # Architecture
//!
//! ```text
//! KeySeed            (key -> 32-bit hash -> seed in [0.1, 0.9))
//!     ↓
//! ChaoticGenerator   (logistic map, r = 3.9999, burn-in, 32-bit extraction)
//!     ↓ 2 * n * 256 values
//! Automaton          (delta, lambda, lambda_inverse; rows built in parallel)
//!     ↓
//! MealyCipher        (warm start + position-coupled transitions + trajectory)
//!
//! metrics            (NPCR, Shannon entropy over finished sequences)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt a message:
//!
//! ```
//! use mealycrypt::{build_cipher, decrypt, encrypt};
//!
//! let cipher = build_cipher("my_secret_key");
//!
//! let sealed = encrypt(&cipher, b"Hi");
//! assert_eq!(sealed.bytes.len(), 2);
//! assert!(sealed.trajectory.len() <= 20);
//!
//! let opened = decrypt(&cipher, &sealed.bytes);
//! assert_eq!(opened.bytes, b"Hi");
//! ```
//!
//! Measure diffusion between two ciphertexts:
//!
//! ```
//! use mealycrypt::{npcr, shannon_entropy, MealyCipher};
//!
//! let a = MealyCipher::new("key-a").encrypt(b"same plaintext").bytes;
//! let b = MealyCipher::new("key-b").encrypt(b"same plaintext").bytes;
//!
//! let changed: f64 = npcr(&a, &b).parse().unwrap();
//! assert!(changed > 0.0);
//! let bits: f64 = shannon_entropy(&a).parse().unwrap();
//! assert!(bits <= 8.0);
//! ```

#![deny(clippy::all)]

pub mod automaton;
pub mod error;
pub mod metrics;
pub mod random;
pub mod trajectory;
pub mod utils;

mod mealy_cipher;

pub use automaton::{Automaton, AutomatonParams};
pub use error::{MealyCryptError, Result};
pub use mealy_cipher::{build_cipher, decrypt, encrypt, CipherOutput, MealyCipher};
pub use metrics::{npcr, shannon_entropy};
pub use trajectory::{Trajectory, TrajectoryStep};
