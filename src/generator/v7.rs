//! UUIDv7 generator.

use super::{EntropyUnavailable, RandSource, StdSystemTime, TimeSource};
use super::DEFAULT_ROLLBACK_ALLOWANCE_MS;
use crate::Uuid;

const MAX_COUNTER: u64 = (1 << 42) - 1;

/// Represents a UUIDv7 generator that encapsulates a counter and guarantees the monotonic order of
/// UUIDs generated within the same millisecond.
///
/// This type provides the interface to customize the random number generator, system clock, and
/// clock rollback handling of a UUIDv7 generator. It also helps control the scope of guaranteed
/// order of the generated UUIDs. The following example guarantees the process-wide (cross-thread)
/// monotonicity using Rust's standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uuidkit::V7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::with_rand08(OsRng)));
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
/// ```
///
/// # Field layout
///
/// The 74 bits that follow the 48-bit `unix_ts_ms` and the version field are filled with a
/// 42-bit counter followed by 32 random bits. The counter is initialized with random bits
/// whenever `unix_ts_ms` advances, which keeps the request rate from leaking, and incremented by
/// one for each UUID generated within the same millisecond. If the counter overflows, the
/// generator increments `unix_ts_ms` and goes on with a fresh counter.
///
/// # Generator functions
///
/// The generator comes with four different methods that generate a UUIDv7:
///
/// | Flavor                     | Timestamp | On big clock rewind |
/// | -------------------------- | --------- | ------------------- |
/// | [`generate`]               | Now       | Resets generator    |
/// | [`generate_or_abort`]      | Now       | Returns `None`      |
/// | [`generate_or_reset_core`] | Argument  | Resets generator    |
/// | [`generate_or_abort_core`] | Argument  | Returns `None`      |
///
/// All of the four return a monotonically increasing UUID by reusing the previous timestamp even
/// if the one provided is smaller than the immediately preceding UUID's. However, when such a
/// clock rollback is considered significant (by default, more than ten seconds):
///
/// 1.  `generate` (or_reset) methods reset the generator and return a new UUID based on the given
///     timestamp, breaking the increasing order of UUIDs.
/// 2.  `or_abort` variants abort and return `None` immediately.
///
/// All of them fail with [`EntropyUnavailable`] if the random source does; the generator state is
/// left untouched in that case.
///
/// [`generate`]: V7Generator::generate
/// [`generate_or_abort`]: V7Generator::generate_or_abort
/// [`generate_or_reset_core`]: V7Generator::generate_or_reset_core
/// [`generate_or_abort_core`]: V7Generator::generate_or_abort_core
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R, T = StdSystemTime> {
    timestamp: u64,
    counter: u64,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time_source: T,
}

impl<R: RandSource> V7Generator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T> V7Generator<R, T> {
    /// Creates a generator instance with a custom clock.
    pub const fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            rng,
            time_source,
        }
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`V7Generator`] type documentation for the description.
    ///
    /// The `rollback_allowance` parameter specifies the amount of `unix_ts_ms` rollback that is
    /// considered significant. A suggested value is `10_000` (milliseconds).
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit positive integer.
    pub fn generate_or_reset_core(
        &mut self,
        unix_ts_ms: u64,
        rollback_allowance: u64,
    ) -> Result<Uuid, EntropyUnavailable> {
        let (timestamp, counter) = match self.next_state(unix_ts_ms, rollback_allowance)? {
            Some(state) => state,
            None => {
                log::debug!(
                    "clock moved back from {} to {unix_ts_ms}; resetting UUIDv7 generator",
                    self.timestamp
                );
                (unix_ts_ms, self.rng.try_next_u64()? & MAX_COUNTER)
            }
        };
        self.commit(timestamp, counter)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed, or returns `None` upon
    /// significant timestamp rollback.
    ///
    /// See the [`V7Generator`] type documentation for the description.
    ///
    /// The `rollback_allowance` parameter specifies the amount of `unix_ts_ms` rollback that is
    /// considered significant. A suggested value is `10_000` (milliseconds).
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit positive integer.
    pub fn generate_or_abort_core(
        &mut self,
        unix_ts_ms: u64,
        rollback_allowance: u64,
    ) -> Result<Option<Uuid>, EntropyUnavailable> {
        match self.next_state(unix_ts_ms, rollback_allowance)? {
            Some((timestamp, counter)) => self.commit(timestamp, counter).map(Some),
            None => Ok(None),
        }
    }

    /// Computes the next timestamp and counter without updating the generator, returning `None`
    /// if the clock went backwards to an unbearable extent.
    fn next_state(
        &mut self,
        unix_ts_ms: u64,
        rollback_allowance: u64,
    ) -> Result<Option<(u64, u64)>, EntropyUnavailable> {
        assert!(
            0 < unix_ts_ms && unix_ts_ms < 1 << 48,
            "`unix_ts_ms` must be a 48-bit positive integer"
        );
        assert!(
            rollback_allowance < 1 << 48,
            "`rollback_allowance` out of reasonable range"
        );

        if unix_ts_ms > self.timestamp {
            Ok(Some((unix_ts_ms, self.rng.try_next_u64()? & MAX_COUNTER)))
        } else if unix_ts_ms + rollback_allowance >= self.timestamp {
            // go on with previous timestamp if new one is not much smaller
            if self.counter < MAX_COUNTER {
                Ok(Some((self.timestamp, self.counter + 1)))
            } else {
                // increment timestamp at counter overflow
                Ok(Some((
                    self.timestamp + 1,
                    self.rng.try_next_u64()? & MAX_COUNTER,
                )))
            }
        } else {
            Ok(None)
        }
    }

    /// Draws the random tail, stores the new state, and builds the UUID.
    fn commit(&mut self, timestamp: u64, counter: u64) -> Result<Uuid, EntropyUnavailable> {
        let tail = self.rng.try_next_u32()?;
        self.timestamp = timestamp;
        self.counter = counter;
        Ok(Uuid::from_fields_v7(
            timestamp,
            (counter >> 30) as u16,
            ((counter & 0x3fff_ffff) << 32) | tail as u64,
        ))
    }

    /// Generates a new UUIDv4 object utilizing the random number generator inside.
    #[cfg(feature = "global_gen")]
    pub(crate) fn generate_v4(&mut self) -> Result<Uuid, EntropyUnavailable> {
        crate::v4::generate_v4(&mut self.rng)
    }
}

impl<R: RandSource, T: TimeSource> V7Generator<R, T> {
    /// Generates a new UUIDv7 object from the current timestamp, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`V7Generator`] type documentation for the description.
    pub fn generate(&mut self) -> Result<Uuid, EntropyUnavailable> {
        let unix_ts_ms = self.unix_ts_ms();
        self.generate_or_reset_core(unix_ts_ms, DEFAULT_ROLLBACK_ALLOWANCE_MS)
    }

    /// Generates a new UUIDv7 object from the current timestamp, or returns `None` upon
    /// significant timestamp rollback.
    ///
    /// See the [`V7Generator`] type documentation for the description.
    pub fn generate_or_abort(&mut self) -> Result<Option<Uuid>, EntropyUnavailable> {
        let unix_ts_ms = self.unix_ts_ms();
        self.generate_or_abort_core(unix_ts_ms, DEFAULT_ROLLBACK_ALLOWANCE_MS)
    }

    fn unix_ts_ms(&mut self) -> u64 {
        self.time_source.unix_time().as_millis() as u64
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuidkit::V7Generator;
///
/// V7Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for V7Generator<R, T> {
    type Item = Result<Uuid, EntropyUnavailable>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for V7Generator<R, T> {}
