//! Version-specific views over the 128 bits of a UUID.

use std::time;

use crate::id::gregorian_to_system_time;
use crate::NodeId;

/// The decoded fields of a UUID, one variant per supported version.
///
/// Returned by [`Uuid::fields()`](crate::Uuid::fields). The variant is chosen by the version
/// nibble of an IETF-variant UUID; every other UUID decodes to [`Fields::Unknown`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Fields {
    /// Gregorian time-based (version 1).
    V1(TimeFields),

    /// Name-based with MD5 (version 3).
    V3(HashFields),

    /// Random (version 4).
    V4(RandomFields),

    /// Name-based with SHA-1 (version 5).
    V5(HashFields),

    /// Reordered Gregorian time-based (version 6).
    V6(TimeFields),

    /// Unix Epoch time-based (version 7).
    V7(UnixTimeFields),

    /// A foreign variant or an unsupported version.
    Unknown,
}

/// Fields of UUIDv1 and UUIDv6.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TimeFields {
    timestamp: u64,
    clock_seq: u16,
    node: NodeId,
}

impl TimeFields {
    pub(crate) const fn new(timestamp: u64, clock_seq: u16, node: NodeId) -> Self {
        Self {
            timestamp,
            clock_seq,
            node,
        }
    }

    /// Returns the 60-bit count of 100-nanosecond intervals since 1582-10-15T00:00:00Z.
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Returns the 14-bit clock sequence.
    pub const fn clock_seq(&self) -> u16 {
        self.clock_seq
    }

    /// Returns the 48-bit node identifier.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Converts the timestamp into a [`time::SystemTime`].
    ///
    /// Returns `None` if the platform cannot represent the instant. The Gregorian epoch predates
    /// the earliest `SystemTime` of some platforms, such as 1601-01-01 on Windows.
    pub fn unix_time(&self) -> Option<time::SystemTime> {
        gregorian_to_system_time(self.timestamp)
    }
}

/// Fields of UUIDv7.
///
/// ```text
/// | unix_ts_ms (48) | ver (4) | rand_a (12) | var (2) | rand_b (62) |
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UnixTimeFields {
    unix_ts_ms: u64,
    rand_a: u16,
    rand_b: u64,
}

impl UnixTimeFields {
    pub(crate) const fn new(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        Self {
            unix_ts_ms,
            rand_a,
            rand_b,
        }
    }

    /// Returns the 48-bit Unix timestamp in milliseconds.
    pub const fn unix_ts_ms(&self) -> u64 {
        self.unix_ts_ms
    }

    /// Returns the 12-bit `rand_a` field.
    pub const fn rand_a(&self) -> u16 {
        self.rand_a
    }

    /// Returns the 62-bit `rand_b` field.
    pub const fn rand_b(&self) -> u64 {
        self.rand_b
    }

    /// Returns the 42-bit counter in the layout used by [`V7Generator`](crate::V7Generator):
    /// the whole `rand_a` followed by the leading 30 bits of `rand_b`.
    ///
    /// UUIDs produced by other generators may use these bits as plain random data.
    pub const fn counter(&self) -> u64 {
        ((self.rand_a as u64) << 30) | (self.rand_b >> 32)
    }

    /// Converts the timestamp into a [`time::SystemTime`].
    pub fn unix_time(&self) -> time::SystemTime {
        time::UNIX_EPOCH + time::Duration::from_millis(self.unix_ts_ms)
    }
}

/// Fields of UUIDv3 and UUIDv5: what is left of the digest after the version and variant bits
/// are overwritten.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct HashFields(u128);

impl HashFields {
    pub(crate) const fn new(bits: u128) -> Self {
        Self(bits)
    }

    /// Returns the 122 digest bits packed into the least significant bits.
    pub const fn hash_bits(&self) -> u128 {
        self.0
    }
}

/// Fields of UUIDv4.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RandomFields(u128);

impl RandomFields {
    pub(crate) const fn new(bits: u128) -> Self {
        Self(bits)
    }

    /// Returns the 122 random bits packed into the least significant bits.
    pub const fn random_bits(&self) -> u128 {
        self.0
    }
}
