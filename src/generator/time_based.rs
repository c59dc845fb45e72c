//! Generator of UUIDv1 and UUIDv6.

use super::{EntropyUnavailable, RandSource, StdSystemTime, TimeSource};
use super::DEFAULT_ROLLBACK_ALLOWANCE_MS;
use crate::{id::GREGORIAN_UNIX_OFFSET, NodeId, Uuid};

const MAX_CLOCK_SEQ: u16 = (1 << 14) - 1;

/// Represents a generator of the Gregorian time-based UUIDs, that is, UUIDv1 and its field-compatible
/// reordered sibling UUIDv6.
///
/// A generator holds the most recent 60-bit timestamp (in 100-nanosecond ticks since
/// 1582-10-15), a 14-bit clock sequence, and a 48-bit node identifier fixed at construction.
/// Both versions share the same state, so UUIDv1 and UUIDv6 values generated by one instance never
/// share the same timestamp and clock sequence pair.
///
/// # Clock sequence
///
/// When the clock does not advance between two calls, or goes back by no more than the rollback
/// allowance (ten seconds by default), the generator keeps the previous timestamp and increments
/// the clock sequence. If the sequence wraps around, the timestamp is advanced by one tick, so the
/// pair of timestamp and clock sequence strictly increases from one UUID to the next.
///
/// Within the allowance, the earlier clock reading is not stored: keeping the pair increasing
/// takes priority over recording the regressed value, so the stored timestamp only moves forward
/// until the clock catches up with it.
///
/// A rollback larger than the allowance is taken as a reset of the system clock: the generator
/// adopts the earlier timestamp and increments the clock sequence.
///
/// # Examples
///
/// ```rust
/// use uuidkit::{generator::with_rand08::Adapter, NodeId, TimeBasedGenerator};
///
/// let mut rng = Adapter(rand::rngs::OsRng);
/// let node = NodeId::host_or_random(&mut rng)?;
/// let mut g = TimeBasedGenerator::new(node, &mut rng)?;
///
/// let a = g.generate_v6();
/// let b = g.generate_v6();
/// assert!(a < b);
/// println!("{} {}", g.generate_v1(), a);
/// # Ok::<(), uuidkit::EntropyUnavailable>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TimeBasedGenerator<T = StdSystemTime> {
    timestamp: u64,
    clock_seq: u16,
    node: NodeId,

    /// The system clock used by the generator.
    time_source: T,
}

impl TimeBasedGenerator {
    /// Creates a generator instance with a clock sequence drawn from `rng`.
    pub fn new<R: RandSource + ?Sized>(
        node: NodeId,
        rng: &mut R,
    ) -> Result<Self, EntropyUnavailable> {
        let mut bytes = [0u8; 2];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Self::with_clock_seq(
            node,
            u16::from_be_bytes(bytes) & MAX_CLOCK_SEQ,
        ))
    }

    /// Creates a generator instance with an explicit initial clock sequence.
    ///
    /// # Panics
    ///
    /// Panics if `clock_seq` exceeds 14 bits.
    pub const fn with_clock_seq(node: NodeId, clock_seq: u16) -> Self {
        Self::with_time_source(node, clock_seq, StdSystemTime)
    }
}

impl<T> TimeBasedGenerator<T> {
    /// Creates a generator instance with a custom clock.
    ///
    /// # Panics
    ///
    /// Panics if `clock_seq` exceeds 14 bits.
    pub const fn with_time_source(node: NodeId, clock_seq: u16, time_source: T) -> Self {
        if clock_seq > MAX_CLOCK_SEQ {
            panic!("`clock_seq` must be a 14-bit integer");
        }
        Self {
            timestamp: 0,
            clock_seq,
            node,
            time_source,
        }
    }

    /// Returns the node identifier embedded in every UUID this generator produces.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the clock sequence of the most recently generated UUID.
    pub const fn clock_seq(&self) -> u16 {
        self.clock_seq
    }

    /// Generates a new UUIDv1 object from the `timestamp` passed.
    ///
    /// `timestamp` and `rollback_allowance` are counted in 100-nanosecond ticks; the former since
    /// the Gregorian epoch (1582-10-15).
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit positive integer.
    pub fn generate_v1_core(&mut self, timestamp: u64, rollback_allowance: u64) -> Uuid {
        let (timestamp, clock_seq) = self.advance(timestamp, rollback_allowance);
        Uuid::from_fields_v1(timestamp, clock_seq, self.node.as_u64())
    }

    /// Generates a new UUIDv6 object from the `timestamp` passed.
    ///
    /// See [`TimeBasedGenerator::generate_v1_core`] for the parameters.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit positive integer.
    pub fn generate_v6_core(&mut self, timestamp: u64, rollback_allowance: u64) -> Uuid {
        let (timestamp, clock_seq) = self.advance(timestamp, rollback_allowance);
        Uuid::from_fields_v6(timestamp, clock_seq, self.node.as_u64())
    }

    fn advance(&mut self, timestamp: u64, rollback_allowance: u64) -> (u64, u16) {
        assert!(
            0 < timestamp && timestamp < 1 << 60,
            "`timestamp` must be a 60-bit positive integer"
        );

        if timestamp > self.timestamp {
            self.timestamp = timestamp;
        } else if timestamp.saturating_add(rollback_allowance) >= self.timestamp {
            self.clock_seq = (self.clock_seq + 1) & MAX_CLOCK_SEQ;
            if self.clock_seq == 0 {
                // move on to next tick at clock sequence wraparound
                self.timestamp += 1;
            }
        } else {
            log::debug!(
                "clock moved back from {} to {timestamp}; starting new clock sequence",
                self.timestamp
            );
            self.timestamp = timestamp;
            self.clock_seq = (self.clock_seq + 1) & MAX_CLOCK_SEQ;
        }
        (self.timestamp, self.clock_seq)
    }
}

impl<T: TimeSource> TimeBasedGenerator<T> {
    /// Generates a new UUIDv1 object from the current time.
    pub fn generate_v1(&mut self) -> Uuid {
        let timestamp = self.gregorian_ticks();
        self.generate_v1_core(timestamp, DEFAULT_ROLLBACK_ALLOWANCE_MS * 10_000)
    }

    /// Generates a new UUIDv6 object from the current time.
    pub fn generate_v6(&mut self) -> Uuid {
        let timestamp = self.gregorian_ticks();
        self.generate_v6_core(timestamp, DEFAULT_ROLLBACK_ALLOWANCE_MS * 10_000)
    }

    fn gregorian_ticks(&mut self) -> u64 {
        (self.time_source.unix_time().as_nanos() / 100) as u64 + GREGORIAN_UNIX_OFFSET
    }
}
