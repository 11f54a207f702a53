//! Integration with `rand_core` (v0.9) crate.

#![cfg(feature = "rand09")]

use super::RandSource;
use rand_core::RngCore;

#[cfg(feature = "std")]
use super::{LexIdGenerator, SystemClock};

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<T: RngCore> LexIdGenerator<Adapter<T>, SystemClock> {
    /// Creates a generator that reads the system clock and a specified random number generator
    /// implementing [`RngCore`] from `rand_core` (v0.9) crate. The specified random number
    /// generator should be cryptographically strong and securely seeded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "default_rng")]
    /// # {
    /// use lexid::LexIdGenerator;
    ///
    /// let mut g = LexIdGenerator::with_rand09(rand::rng());
    /// println!("{}", g.generate()?);
    /// # }
    /// # Ok::<(), lexid::RangeError>(())
    /// ```
    pub const fn with_rand09(rng: T) -> Self {
        Self::with_rng(Adapter(rng))
    }
}
