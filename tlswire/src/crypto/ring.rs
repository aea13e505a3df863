use super::{GetRandomFailed, SecureRandom};

/// A [`SecureRandom`] backed by the operating system, via the [*ring*] crate.
///
/// [*ring*]: https://github.com/briansmith/ring
#[derive(Debug, Default, Clone, Copy)]
pub struct RingRandom;

impl SecureRandom for RingRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GetRandomFailed> {
        use ::ring::rand::SecureRandom;

        ::ring::rand::SystemRandom::new()
            .fill(buf)
            .map_err(|_| GetRandomFailed)
    }
}
