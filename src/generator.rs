//! Stateful generators and the interfaces they use to read randomness and time.
//!
//! Generators take `&mut self`, so one instance cannot be used from several threads without
//! synchronization. Wrap an instance in [`std::sync::Mutex`] to share it, or create one instance
//! per thread (with distinct node identifiers in the case of [`TimeBasedGenerator`]).

use std::time;

pub mod with_rand08;

mod time_based;
pub use time_based::TimeBasedGenerator;

mod v7;
pub use v7::V7Generator;

#[cfg(test)]
pub(crate) mod tests;

/// Error returned when a [`RandSource`] cannot produce random bytes.
///
/// This error is not retried by any generator; it is handed over to the caller as is.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default, thiserror::Error)]
#[error("random source unavailable")]
pub struct EntropyUnavailable;

/// A trait that defines the minimum random number generator interface for the generators.
///
/// Sources used for UUIDv4 and for the random parts of UUIDv7 should be cryptographically
/// strong. Any [`rand::RngCore`] is accepted through [`with_rand08::Adapter`].
pub trait RandSource {
    /// Fills `dest` with random data.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyUnavailable>;

    /// Returns the next random `u32`.
    fn try_next_u32(&mut self) -> Result<u32, EntropyUnavailable> {
        let mut bytes = [0u8; 4];
        self.try_fill_bytes(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Returns the next random `u64`.
    fn try_next_u64(&mut self) -> Result<u64, EntropyUnavailable> {
        let mut bytes = [0u8; 8];
        self.try_fill_bytes(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

impl<R: RandSource + ?Sized> RandSource for &mut R {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyUnavailable> {
        (**self).try_fill_bytes(dest)
    }
}

/// A trait that defines the minimum system clock interface for the generators.
pub trait TimeSource {
    /// Returns the current time as the duration elapsed since the Unix epoch.
    fn unix_time(&mut self) -> time::Duration;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_time(&mut self) -> time::Duration {
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
    }
}

/// The amount of clock rollback, in milliseconds, that the generators absorb by reusing the
/// previous timestamp before they treat the rollback as significant.
pub const DEFAULT_ROLLBACK_ALLOWANCE_MS: u64 = 10_000;
