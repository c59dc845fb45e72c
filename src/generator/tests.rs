//! Test doubles for the randomness and clock interfaces.

use super::{with_rand08::Adapter, TimeSource};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::{num::NonZeroU32, time::Duration};

/// Returns a reproducible random source.
pub(crate) fn seeded_rng(seed: u64) -> Adapter<StdRng> {
    Adapter(StdRng::seed_from_u64(seed))
}

/// A random number generator that always fails, like an exhausted entropy device.
pub(crate) struct Exhausted;

impl RngCore for Exhausted {
    fn next_u32(&mut self) -> u32 {
        unimplemented!("infallible methods are not used by adapters")
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!("infallible methods are not used by adapters")
    }

    fn fill_bytes(&mut self, _: &mut [u8]) {
        unimplemented!("infallible methods are not used by adapters")
    }

    fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), rand::Error> {
        Err(NonZeroU32::new(rand::Error::CUSTOM_START).unwrap().into())
    }
}

/// A clock that starts at a fixed instant and advances by `step` on every read.
#[derive(Clone, Debug)]
pub(crate) struct MockClock {
    pub now: Duration,
    pub step: Duration,
}

impl MockClock {
    /// 2022-02-22T19:22:22Z, advancing by one millisecond per read.
    pub fn new() -> Self {
        Self {
            now: Duration::from_secs(1_645_557_742),
            step: Duration::from_millis(1),
        }
    }

    /// Returns a clock that never advances.
    pub fn frozen() -> Self {
        Self {
            step: Duration::ZERO,
            ..Self::new()
        }
    }
}

impl TimeSource for MockClock {
    fn unix_time(&mut self) -> Duration {
        let now = self.now;
        self.now += self.step;
        now
    }
}
