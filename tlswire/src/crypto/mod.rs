//! Collaborators this crate needs from a cryptography provider.
//!
//! Only randomness is needed: message construction draws the `random` and
//! `legacy_session_id` fields from a [`SecureRandom`] passed in by the
//! caller, so tests can inject a deterministic source.

use std::fmt::Debug;

pub use crate::rand::GetRandomFailed;

/// *ring*-backed randomness.
#[cfg(feature = "ring")]
pub mod ring;

/// A source of cryptographically secure randomness.
pub trait SecureRandom: Send + Sync + Debug {
    /// Fill the given buffer with random bytes.
    ///
    /// The bytes must be sourced from a cryptographically secure random number
    /// generator seeded with good quality, secret entropy.
    fn fill(&self, buf: &mut [u8]) -> Result<(), GetRandomFailed>;
}
