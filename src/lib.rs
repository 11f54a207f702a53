//! LexID: time-ordered, lexicographically sortable 128-bit identifiers
//!
//! ```rust
//! # #[cfg(feature = "global_gen")]
//! # {
//! // generate a new identifier object
//! let id = lexid::lexid();
//! println!("{}", id); // e.g., "03ejjvstwr94ntvawzl4tu0y4"
//! println!("{:?}", id.as_bytes()); // as 16-byte big-endian array
//!
//! // generate a textual representation directly
//! println!("{}", lexid::lexid_string()); // e.g., "03ejjvstwzlnuwa68ri46362w"
//! # }
//! ```
//!
//! A LexID is a 128-bit unsigned integer rendered as 25 Base36 digits. The canonical text form
//! sorts exactly like the underlying integer under plain byte comparison, so identifiers can be
//! ordered by any system that can compare strings.
//!
//! # Field and bit layout
//!
//! This crate produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   timestamp   |                   counter_hi                  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                   counter_lo                  |    entropy    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            entropy                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `timestamp` field holds the Unix timestamp in milliseconds. Zero is reserved
//!   and never emitted by a generator.
//! - The 24-bit `counter_hi` field is the coarse counter that absorbs `counter_lo` overflows.
//!   Both counters are randomly initialized whenever the `timestamp` changes.
//! - The 24-bit `counter_lo` field is the fine counter, incremented by one for each new
//!   identifier generated within the same millisecond.
//! - The 32-bit `entropy` field is filled with a fresh cryptographically strong random number
//!   on every call.
//!
//! In the very rare circumstances where both counter fields reach their maximum values within
//! the same millisecond, a generator increments the `timestamp` instead; therefore, the
//! `timestamp` may run slightly ahead of the real-time clock. A generator also keeps using the
//! stored `timestamp` when the system clock moves backwards, as long as the difference stays
//! within the rollback allowance (ten seconds by default). Larger rollbacks are handled by the
//! policy of the generator method called; see [`LexIdGenerator`] for details.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `std` integrates the crate with `std` and enables the system clock; without it the crate
//!   builds on `no_std` targets and relies on caller-provided clock and random sources.
//! - `default_rng` provides the cryptographically strong default random number source.
//! - `global_gen` (entails `default_rng`) enables the process-wide generator behind the
//!   [`lexid()`] and [`lexid_string()`] functions.
//!
//! Optional features:
//!
//! - `serde` enables serialization/deserialization of [`LexId`] via the `serde` crate.
//! - `rand09` enables the adapter for random number generators that implement the `RngCore`
//!   trait from the `rand_core` (v0.9) crate.
//! - `log` emits diagnostic events via the `log` crate when a generator resets its state.
//! - `cli` builds the `lexid` and `lexid-inspect` command line tools.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{LexId, ParseError, RangeError};

pub mod generator;
pub use generator::{GenerateError, LexIdGenerator, Status};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{lexid, lexid_string};

/// The maximum value of the 48-bit `timestamp` field.
pub(crate) const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// The maximum value of the 24-bit `counter_hi` field.
pub(crate) const MAX_COUNTER_HI: u32 = (1 << 24) - 1;

/// The maximum value of the 24-bit `counter_lo` field.
pub(crate) const MAX_COUNTER_LO: u32 = (1 << 24) - 1;
