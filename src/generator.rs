//! LexID generator and related types.

#[cfg(not(feature = "std"))]
use core as std;

use crate::{LexId, RangeError, MAX_COUNTER_HI, MAX_COUNTER_LO, MAX_TIMESTAMP};
use std::{fmt, time::Duration};

#[cfg(feature = "default_rng")]
mod default_rng;
pub mod with_rand09;

#[cfg(feature = "default_rng")]
#[cfg_attr(docsrs, doc(cfg(feature = "default_rng")))]
pub use default_rng::DefaultRng;

/// The default timestamp rollback allowance: ten seconds.
pub const DEFAULT_ROLLBACK_ALLOWANCE: Duration = Duration::from_millis(10_000);

/// A trait that defines the minimum random number source interface for [`LexIdGenerator`].
///
/// The source must return uniformly distributed random bits; the generator masks the returned
/// values to the widths of the fields.
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;
}

/// A trait that defines the clock interface for [`LexIdGenerator`].
pub trait ClockSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// A [`ClockSource`] implementation that reads the system clock.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl ClockSource for SystemClock {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }
}

/// Represents a LexID generator that encapsulates the monotonic counters and other internal
/// states.
///
/// This type provides the interface to customize the random number source, clock source, and
/// clock rollback handling of a LexID generator. It also helps control the scope of guaranteed
/// order of the generated IDs. The following example guarantees the process-wide (cross-thread)
/// monotonic order using Rust's standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "default_rng")]
/// # {
/// use lexid::LexIdGenerator;
/// use std::{sync, thread};
///
/// let g = sync::Arc::new(sync::Mutex::new(LexIdGenerator::new()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// # }
/// ```
///
/// # Generator functions
///
/// The generator comes with six different methods that generate a LexID:
///
/// | Flavor                         | Timestamp | On big clock rewind           |
/// | ------------------------------ | --------- | ----------------------------- |
/// | [`generate`]                   | Now       | Resets generator              |
/// | [`generate_or_abort`]          | Now       | Returns `RollbackExceeded`    |
/// | [`generate_or_report`]         | Now       | Resets generator, reports so  |
/// | [`generate_with_ts`]           | Argument  | Resets generator              |
/// | [`generate_or_abort_with_ts`]  | Argument  | Returns `RollbackExceeded`    |
/// | [`generate_or_report_with_ts`] | Argument  | Resets generator, reports so  |
///
/// All of these return a monotonically increasing ID by reusing the previous timestamp even if
/// the one provided is smaller than the immediately preceding ID's. However, when such a clock
/// rollback is considered significant (by default, more than ten seconds):
///
/// 1.  `generate` methods reset the generator and return a new ID based on the given timestamp,
///     breaking the increasing order of IDs.
/// 2.  `or_abort` variants abort and return [`GenerateError::RollbackExceeded`] immediately,
///     leaving the state untouched.
/// 3.  `or_report` variants reset the generator like `generate` but report the broken order
///     through [`Status::ClockRollback`].
///
/// The tolerated amount of rollback is configurable through [`with_rollback_allowance`], and
/// the `_with_ts` functions accept the timestamp as an argument for callers that manage time
/// themselves.
///
/// [`generate`]: LexIdGenerator::generate
/// [`generate_or_abort`]: LexIdGenerator::generate_or_abort
/// [`generate_or_report`]: LexIdGenerator::generate_or_report
/// [`generate_with_ts`]: LexIdGenerator::generate_with_ts
/// [`generate_or_abort_with_ts`]: LexIdGenerator::generate_or_abort_with_ts
/// [`generate_or_report_with_ts`]: LexIdGenerator::generate_or_report_with_ts
/// [`with_rollback_allowance`]: LexIdGenerator::with_rollback_allowance
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexIdGenerator<R, C> {
    timestamp: u64,
    counter_hi: u32,
    counter_lo: u32,

    /// The timestamp rollback allowance in milliseconds.
    rollback_allowance: u64,

    /// The random number source used by the generator.
    rng: R,

    /// The clock source used by the clock-reading generator functions.
    clock: C,
}

#[cfg(feature = "default_rng")]
#[cfg_attr(docsrs, doc(cfg(feature = "default_rng")))]
impl LexIdGenerator<DefaultRng, SystemClock> {
    /// Creates a generator with the default random number source and the system clock.
    ///
    /// # Panics
    ///
    /// Panics if the default random number source fails to initialize.
    pub fn new() -> Self {
        Self::with_rng(DefaultRng::default())
    }
}

#[cfg(feature = "default_rng")]
impl Default for LexIdGenerator<DefaultRng, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<R: RandSource> LexIdGenerator<R, SystemClock> {
    /// Creates a generator with the specified random number source and the system clock.
    ///
    /// The specified random number source should be cryptographically strong and securely
    /// seeded.
    pub const fn with_rng(rng: R) -> Self {
        Self::with_sources(rng, SystemClock)
    }
}

impl<R: RandSource, C: ClockSource> LexIdGenerator<R, C> {
    /// Creates a generator with the specified random number source and clock source.
    pub const fn with_sources(rng: R, clock: C) -> Self {
        Self {
            timestamp: 0,
            counter_hi: 0,
            counter_lo: 0,
            rollback_allowance: DEFAULT_ROLLBACK_ALLOWANCE.as_millis() as u64,
            rng,
            clock,
        }
    }

    /// Sets the amount of timestamp rollback that the generator tolerates without breaking the
    /// increasing order of generated IDs.
    ///
    /// # Panics
    ///
    /// Panics if the argument does not fit in the 48-bit millisecond range.
    pub fn with_rollback_allowance(mut self, rollback_allowance: Duration) -> Self {
        let millis = rollback_allowance.as_millis();
        assert!(
            millis <= MAX_TIMESTAMP as u128,
            "`rollback_allowance` out of reasonable range"
        );
        self.rollback_allowance = millis as u64;
        self
    }

    /// Returns the amount of timestamp rollback that the generator tolerates.
    pub const fn rollback_allowance(&self) -> Duration {
        Duration::from_millis(self.rollback_allowance)
    }

    /// Generates a new LexID object from the current timestamp, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`LexIdGenerator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock reading is zero or does not fit in the 48-bit `timestamp`
    /// field. The state is kept intact in that case.
    pub fn generate(&mut self) -> Result<LexId, RangeError> {
        let unix_ts_ms = self.clock.unix_ts_ms();
        self.generate_with_ts(unix_ts_ms)
    }

    /// Generates a new LexID object from the `unix_ts_ms` passed, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`LexIdGenerator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns an error if `unix_ts_ms` is zero or does not fit in the 48-bit `timestamp`
    /// field. The state is kept intact in that case.
    pub fn generate_with_ts(&mut self, unix_ts_ms: u64) -> Result<LexId, RangeError> {
        self.generate_or_report_with_ts(unix_ts_ms)
            .map(|(id, _)| id)
    }

    /// Generates a new LexID object from the current timestamp, or returns an error upon
    /// significant timestamp rollback.
    ///
    /// See the [`LexIdGenerator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock moved back by more than the rollback allowance or if the
    /// clock reading is out of the range of the `timestamp` field. The state is kept intact in
    /// either case, so the caller can simply retry after the clock recovers.
    pub fn generate_or_abort(&mut self) -> Result<LexId, GenerateError> {
        let unix_ts_ms = self.clock.unix_ts_ms();
        self.generate_or_abort_with_ts(unix_ts_ms)
    }

    /// Generates a new LexID object from the `unix_ts_ms` passed, or returns an error upon
    /// significant timestamp rollback.
    ///
    /// See the [`LexIdGenerator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns an error if `unix_ts_ms` moved back by more than the rollback allowance or is
    /// out of the range of the `timestamp` field. The state is kept intact in either case, so
    /// the caller can simply retry after the clock recovers.
    pub fn generate_or_abort_with_ts(&mut self, unix_ts_ms: u64) -> Result<LexId, GenerateError> {
        if unix_ts_ms == 0 || unix_ts_ms > MAX_TIMESTAMP {
            return Err(RangeError::new("timestamp").into());
        }
        if unix_ts_ms + self.rollback_allowance < self.timestamp {
            // abort without touching the state
            return Err(GenerateError::RollbackExceeded {
                rollback_ms: self.timestamp - unix_ts_ms,
                allowance_ms: self.rollback_allowance,
            });
        }
        Ok(self.generate_or_report_with_ts(unix_ts_ms)?.0)
    }

    /// Generates a new LexID object from the current timestamp and reports the type of state
    /// transition that produced it.
    ///
    /// This method behaves like [`generate`](LexIdGenerator::generate) but returns the
    /// [`Status`] of the invocation along with the new ID, so the caller can tell when a
    /// significant timestamp rollback reset the generator and broke the increasing order of
    /// IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock reading is zero or does not fit in the 48-bit `timestamp`
    /// field. The state is kept intact in that case.
    pub fn generate_or_report(&mut self) -> Result<(LexId, Status), RangeError> {
        let unix_ts_ms = self.clock.unix_ts_ms();
        self.generate_or_report_with_ts(unix_ts_ms)
    }

    /// Generates a new LexID object from the `unix_ts_ms` passed and reports the type of state
    /// transition that produced it.
    ///
    /// This method is the core of the other generator functions: `generate` flavors discard
    /// the returned [`Status`] and `or_abort` flavors check the rollback allowance before
    /// delegating here.
    ///
    /// # Errors
    ///
    /// Returns an error if `unix_ts_ms` is zero or does not fit in the 48-bit `timestamp`
    /// field. The state is kept intact in that case.
    pub fn generate_or_report_with_ts(
        &mut self,
        unix_ts_ms: u64,
    ) -> Result<(LexId, Status), RangeError> {
        if unix_ts_ms == 0 || unix_ts_ms > MAX_TIMESTAMP {
            return Err(RangeError::new("timestamp"));
        }

        let status = if unix_ts_ms > self.timestamp {
            self.timestamp = unix_ts_ms;
            self.renew_counters();
            Status::NewTimestamp
        } else if unix_ts_ms + self.rollback_allowance >= self.timestamp {
            // go on with the previous timestamp if the new one is not much smaller
            self.counter_lo += 1;
            if self.counter_lo > MAX_COUNTER_LO {
                self.counter_hi += 1;
                if self.counter_hi > MAX_COUNTER_HI {
                    // increment timestamp at counter overflow
                    self.timestamp += 1;
                    self.renew_counters();
                    Status::TimestampInc
                } else {
                    self.counter_lo = self.rng.next_u32() & MAX_COUNTER_LO;
                    Status::CounterHiInc
                }
            } else {
                Status::CounterLoInc
            }
        } else {
            // reset the state when the clock moved back beyond the allowance
            #[cfg(feature = "log")]
            log::warn!("lexid: reset state as clock moved back beyond allowance");
            self.timestamp = unix_ts_ms;
            self.renew_counters();
            Status::ClockRollback
        };

        let entropy = self.rng.next_u32();
        Ok((
            LexId::from_fields(self.timestamp, self.counter_hi, self.counter_lo, entropy),
            status,
        ))
    }

    /// Draws fresh random values for both counter fields.
    fn renew_counters(&mut self) {
        self.counter_hi = self.rng.next_u32() & MAX_COUNTER_HI;
        self.counter_lo = self.rng.next_u32() & MAX_COUNTER_LO;
    }
}

/// Supports operations as an infinite iterator that produces a new LexID object for each call
/// of `next()`.
///
/// The iteration stops only if the clock source reports a timestamp outside of the range of
/// the `timestamp` field.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "default_rng")]
/// # {
/// use lexid::LexIdGenerator;
///
/// LexIdGenerator::new()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// # }
/// ```
impl<R: RandSource, C: ClockSource> Iterator for LexIdGenerator<R, C> {
    type Item = LexId;

    fn next(&mut self) -> Option<Self::Item> {
        self.generate().ok()
    }
}

/// The type of state transition that a generator invocation made to preserve the increasing
/// order of generated IDs, reported by the `or_report` generator functions.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Status {
    /// Indicates that the up-to-date timestamp was adopted because it was greater than the
    /// stored one.
    NewTimestamp,

    /// Indicates that counter_lo was incremented because the stored timestamp was reused.
    CounterLoInc,

    /// Indicates that counter_hi was incremented because counter_lo reached its maximum value.
    CounterHiInc,

    /// Indicates that the stored timestamp was incremented because both counters reached their
    /// maximum values.
    TimestampInc,

    /// Indicates that the generator was reset to the up-to-date timestamp and the increasing
    /// order of IDs was broken because the timestamp moved back by more than the rollback
    /// allowance.
    ClockRollback,
}

/// An error reported by the `or_abort` generator functions.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum GenerateError {
    /// Indicates that the timestamp used was out of the range of the `timestamp` field.
    Range(RangeError),

    /// Indicates that the timestamp moved back by more than the rollback allowance, so that
    /// proceeding would have broken the increasing order of generated IDs.
    RollbackExceeded {
        /// The amount of the detected rollback in milliseconds.
        rollback_ms: u64,

        /// The rollback allowance of the generator in milliseconds.
        allowance_ms: u64,
    },
}

impl From<RangeError> for GenerateError {
    fn from(err: RangeError) -> Self {
        Self::Range(err)
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(err) => fmt::Display::fmt(err, f),
            Self::RollbackExceeded {
                rollback_ms,
                allowance_ms,
            } => write!(
                f,
                "clock moved back by {} ms, exceeding the rollback allowance of {} ms",
                rollback_ms, allowance_ms
            ),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Range(err) => Some(err),
            Self::RollbackExceeded { .. } => None,
        }
    }
}
