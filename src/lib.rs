//! Generators, parser and canonical codec of UUID versions 1, 3, 4, 5, 6 and 7
//!
//! ```rust
//! use uuidkit::{uuid5, uuid7, Uuid};
//!
//! let uuid = uuid7();
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let parsed: Uuid = "886313e1-3b8a-5372-9b90-0c9aee199e5d".parse()?;
//! assert_eq!(parsed, uuid5(&Uuid::NAMESPACE_DNS, "python.org"));
//! # Ok::<(), uuidkit::ParseError>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Field and bit layout
//!
//! UUIDv7 values produced by this library have the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        counter                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 42-bit `counter` field accommodates the sequence counter that ensures the
//!   monotonic order of IDs generated within the same millisecond. The counter is
//!   incremented by one for each new ID generated within the same timestamp and is
//!   randomly initialized whenever the `unix_ts_ms` changes.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 32 `rand` bits are filled with a cryptographically strong random
//!   number.
//!
//! UUIDv1 and UUIDv6 carry the same three fields in different orders: a 60-bit count of
//! 100-nanosecond intervals since 1582-10-15, a 14-bit clock sequence, and a 48-bit node
//! identifier. UUIDv6 stores the timestamp from the most significant bit down, so UUIDv6 values
//! sort in the order of creation while UUIDv1 values do not:
//!
//! ```text
//! v1: time_low(32) | time_mid(16) | ver(4) time_hi(12)  | var(2) clock_seq(14) | node(48)
//! v6: time_hi(32)  | time_mid(16) | ver(4) time_low(12) | var(2) clock_seq(14) | node(48)
//! ```
//!
//! UUIDv3 and UUIDv5 are the first 16 bytes of the MD5 and SHA-1 digests, respectively, of a
//! namespace UUID followed by a name, with the version and variant fields overwritten. UUIDv4 is
//! 122 random bits.
//!
//! # Generators
//!
//! [`V7Generator`] and [`TimeBasedGenerator`] are plain values owned by the caller. They read
//! randomness through [`RandSource`] and time through [`TimeSource`], both of which can be
//! replaced for testing:
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use uuidkit::V7Generator;
//!
//! let mut g = V7Generator::with_rand08(StdRng::seed_from_u64(42));
//! let (a, b) = (g.generate()?, g.generate()?);
//! assert!(a < b);
//! # Ok::<(), uuidkit::EntropyUnavailable>(())
//! ```
//!
//! With the default `global_gen` feature, [`uuid1`], [`uuid4`], [`uuid6`] and [`uuid7`] use a
//! lazily created process-wide generator instead.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen` enables the primary [`uuid1`], [`uuid4`], [`uuid6`] and [`uuid7`] functions
//!   that use a process-wide generator seeded by the operating system.
//!
//! Optional features:
//!
//! - `serde` enables serialization/deserialization of [`Uuid`] via serde.
//! - `uuid` enables conversion from/to the [`uuid::Uuid`] type.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{Uuid, Variant, Version};

mod fields;
pub use fields::{Fields, HashFields, RandomFields, TimeFields, UnixTimeFields};

mod parse;
pub use parse::{FormatError, ParseError, ParseOptions};

mod node;
pub use node::NodeId;

mod name_based;
pub use name_based::{uuid3, uuid5, HashAlgorithm};

pub mod v4;

pub mod generator;
pub use generator::{
    EntropyUnavailable, RandSource, StdSystemTime, TimeBasedGenerator, TimeSource, V7Generator,
};

#[cfg(feature = "global_gen")]
mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{uuid1, uuid4, uuid6, uuid7};
