//! Error types for the MealyCrypt library.

use thiserror::Error;

/// Errors produced by the MealyCrypt library.
///
/// The cipher transform itself is total; these cover parameter validation
/// and the optional payload helpers around it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MealyCryptError {
    /// Number of automaton states is outside the valid range [1, 65536].
    #[error("Number of automaton states must be between 1 and 65536, got {states}")]
    InvalidStateCount {
        /// Requested state count.
        states: usize,
    },

    /// Byte array length is not a multiple of the payload stride.
    #[error("Payload length {len} is not a multiple of {stride}")]
    InvalidPayloadLength {
        /// Actual payload length in bytes.
        len: usize,
        /// Required stride in bytes.
        stride: usize,
    },

    /// Recovered bytes are not valid UTF-8 text.
    #[error("Recovered bytes are not valid text: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),
}

/// Result type for MealyCrypt operations.
pub type Result<T> = std::result::Result<T, MealyCryptError>;
