//! EntropySource trait for table construction.
//!
//! Defines the interface the automaton builder draws from. Implementations
//! must produce a deterministic sequence of 32-bit values from their seed
//! so that the same key always yields the same tables.

/// Trait for deterministic 32-bit entropy streams.
///
/// The builder consumes values strictly in call order; an implementation
/// must never reorder or skip values between calls.
pub trait EntropySource {
    /// Returns the next 32-bit value of the stream.
    fn next_value(&mut self) -> u32;

    /// Draws exactly `count` values in call order.
    fn stream(&mut self, count: usize) -> Vec<u32> {
        (0..count).map(|_| self.next_value()).collect()
    }
}
