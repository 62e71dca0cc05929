//! Helpers for moving caller payloads in and out of byte sequences.

pub mod converter;
