//! Global generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::LexId;
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("lexid: could not lock global generator")
}

/// Generates a new LexID object.
///
/// This function is thread-safe; it employs a global generator so that multiple threads in a
/// process can call it concurrently without breaking the monotonic order of generated IDs. On
/// Unix, this function resets the generator when the process ID changes (i.e., upon process
/// forks) to prevent collisions across processes.
///
/// # Panics
///
/// Panics if the system clock reports a millisecond timestamp of zero or out of the 48-bit
/// range.
///
/// # Examples
///
/// ```rust
/// let x = lexid::lexid();
/// println!("{}", x); // e.g., "03ejjvsposwlgelf8gq5haibm"
/// println!("{:?}", x.as_bytes()); // as 16-byte big-endian array
/// ```
pub fn lexid() -> LexId {
    lock_global_gen()
        .get_mut()
        .generate()
        .expect("lexid: could not generate id using system clock")
}

/// Generates a new LexID encoded in the 25-digit canonical string representation.
///
/// Use this function to quickly get a new LexID as a string.
///
/// This function is thread-safe and fork-safe in the same way as [`lexid`].
///
/// # Panics
///
/// Panics if the system clock reports a millisecond timestamp of zero or out of the 48-bit
/// range.
///
/// # Examples
///
/// ```rust
/// let x = lexid::lexid_string(); // e.g., "03ejjvsposwlgelf8gq5haibm"
/// assert!(x.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
/// ```
pub fn lexid_string() -> String {
    lexid().into()
}

mod inner {
    use crate::generator::{DefaultRng, LexIdGenerator, SystemClock};

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: LexIdGenerator<DefaultRng, SystemClock>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            #[cfg(feature = "log")]
            log::debug!("lexid: initialized global generator");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: LexIdGenerator::with_rng(
                    DefaultRng::try_new().expect("lexid: could not initialize global generator"),
                ),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner generator, resetting the state on Unix if
        /// the process ID has changed.
        pub fn get_mut(&mut self) -> &mut LexIdGenerator<DefaultRng, SystemClock> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{lexid, lexid_string};
    use crate::LexId;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| lexid_string()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let re = regex::Regex::new(r"^[0-9a-z]{25}$").unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = lexid().timestamp() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Encodes unique sortable pair of timestamp and counters
    #[test]
    fn encodes_unique_sortable_pair_of_timestamp_and_counters() {
        SAMPLES.with(|samples| {
            let mut prev: LexId = samples[0].parse().unwrap();
            for e in &samples[1..] {
                let curr: LexId = e.parse().unwrap();
                assert!(
                    prev.timestamp() < curr.timestamp()
                        || (prev.timestamp() == curr.timestamp()
                            && (prev.counter_hi(), prev.counter_lo())
                                < (curr.counter_hi(), curr.counter_lo()))
                );
                prev = curr;
            }
        });
    }

    /// Sets random bits of entropy field properly
    #[test]
    fn sets_random_bits_of_entropy_field_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 32];
            for e in samples {
                let mut num = e.parse::<LexId>().unwrap().entropy();
                for b in bins.iter_mut().rev() {
                    *b += num & 1;
                    num >>= 1;
                }
            }
            bins
        });

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, e) in bins.iter().enumerate() {
            let p = *e as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(lexid()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(<[u8; 12]>::try_from(&e.as_bytes()[..12]).unwrap());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
