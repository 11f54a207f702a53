use std::error;

use rand::{RngCore as _, rngs::OsRng, rngs::ReseedingRng};
use rand_chacha::ChaCha12Core;

use super::RandSource;

/// The default random number source of [`LexIdGenerator`](super::LexIdGenerator).
///
/// This type wraps a ChaCha12-based cryptographically strong pseudorandom number generator
/// that is reseeded frequently from the operating system.
#[derive(Debug)]
pub struct DefaultRng {
    inner: ReseedingRng<ChaCha12Core, OsRng>,
}

impl RandSource for DefaultRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}

impl Default for DefaultRng {
    /// Creates an instance of the default random number source.
    ///
    /// # Panics
    ///
    /// Panics in the highly unlikely event where the operating system fails to provide secure
    /// entropy to seed the pseudorandom number generator.
    fn default() -> Self {
        Self::try_new().expect("could not initialize DefaultRng")
    }
}

impl DefaultRng {
    pub(crate) fn try_new() -> Result<Self, impl error::Error> {
        // reseed per 64 KiB of output
        ReseedingRng::new(1024 * 64, OsRng).map(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultRng, RandSource};

    /// Produces unbiased random bits
    ///
    /// This test may fail at a very low probability.
    #[test]
    fn produces_unbiased_random_bits() {
        let mut rng = DefaultRng::default();

        // test if each bit is set at ~50% probability
        let mut counts = [0u32; 32];

        // test if XOR of two consecutive outputs is also random
        let mut prev = rng.next_u32();
        let mut counts_xor = [0u32; 32];

        const N_LOOPS: usize = 1_000_000;
        for _ in 0..N_LOOPS {
            let num = rng.next_u32();

            let mut x = num;
            for e in counts.iter_mut() {
                *e += x & 1;
                x >>= 1;
            }

            let mut x = prev ^ num;
            for e in counts_xor.iter_mut() {
                *e += x & 1;
                x >>= 1;
            }
            prev = num;
        }

        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_LOOPS as f64).sqrt();
        for e in counts.iter().chain(counts_xor.iter()) {
            assert!((*e as f64 / N_LOOPS as f64 - 0.5).abs() < margin);
        }
    }
}
