use std::{fmt, time};

use fstr::FStr;

use crate::fields::{Fields, HashFields, RandomFields, TimeFields, UnixTimeFields};
use crate::NodeId;

/// Represents a Universally Unique IDentifier.
///
/// The value is stored as a 16-byte big-endian array, so the derived [`Ord`] and [`Hash`]
/// implementations compare the 128 bits as an unsigned integer.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// The number of 100-nanosecond ticks between 1582-10-15 and 1970-01-01.
pub(crate) const GREGORIAN_UNIX_OFFSET: u64 = 0x01b2_1dd2_1381_4000;

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Name space for fully-qualified domain names (6ba7b810-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_DNS: Self = Self::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8);

    /// Name space for URLs (6ba7b811-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_URL: Self = Self::from_u128(0x6ba7b811_9dad_11d1_80b4_00c04fd430c8);

    /// Name space for ISO OIDs (6ba7b812-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_OID: Self = Self::from_u128(0x6ba7b812_9dad_11d1_80b4_00c04fd430c8);

    /// Name space for X.500 DNs (6ba7b814-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_X500: Self = Self::from_u128(0x6ba7b814_9dad_11d1_80b4_00c04fd430c8);

    /// Creates an object from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates an object from a 128-bit unsigned integer.
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Returns the 128-bit unsigned integer representation.
    pub const fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Creates an object from the most significant and least significant 64-bit halves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::Uuid;
    ///
    /// let x = Uuid::from_u64_pair(0x123e4567_e89b_12d3, 0xa456_426614174000);
    /// assert_eq!(x.to_string(), "123e4567-e89b-12d3-a456-426614174000");
    /// assert_eq!(x.as_u64_pair(), (0x123e4567_e89b_12d3, 0xa456_426614174000));
    /// ```
    pub const fn from_u64_pair(high: u64, low: u64) -> Self {
        Self::from_u128(((high as u128) << 64) | low as u128)
    }

    /// Returns the most significant and least significant 64-bit halves.
    pub const fn as_u64_pair(&self) -> (u64, u64) {
        let value = self.as_u128();
        ((value >> 64) as u64, value as u64)
    }

    /// Creates a UUIDv1 object from field values.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` exceeds 60 bits, `clock_seq` exceeds 14 bits, or `node` exceeds 48
    /// bits.
    pub const fn from_fields_v1(timestamp: u64, clock_seq: u16, node: u64) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        let time_low = timestamp as u32;
        let time_mid = (timestamp >> 32) as u16;
        let time_hi = (timestamp >> 48) as u16;
        Self::from_gregorian_parts(time_low, time_mid, 0x1000 | time_hi, clock_seq, node)
    }

    /// Creates a UUIDv6 object from field values.
    ///
    /// The field values are identical to those of UUIDv1, but the timestamp is stored from the
    /// most significant bit down so that the UUIDs sort in chronological order.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` exceeds 60 bits, `clock_seq` exceeds 14 bits, or `node` exceeds 48
    /// bits.
    pub const fn from_fields_v6(timestamp: u64, clock_seq: u16, node: u64) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        let time_high = (timestamp >> 28) as u32;
        let time_mid = (timestamp >> 12) as u16;
        let time_low = (timestamp & 0xfff) as u16;
        Self::from_gregorian_parts(time_high, time_mid, 0x6000 | time_low, clock_seq, node)
    }

    const fn from_gregorian_parts(
        first: u32,
        second: u16,
        third_with_version: u16,
        clock_seq: u16,
        node: u64,
    ) -> Self {
        Self([
            (first >> 24) as u8,
            (first >> 16) as u8,
            (first >> 8) as u8,
            first as u8,
            (second >> 8) as u8,
            second as u8,
            (third_with_version >> 8) as u8,
            third_with_version as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Creates a UUIDv7 object from field values.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` exceeds 48 bits, `rand_a` exceeds 12 bits, or `rand_b` exceeds 62
    /// bits.
    pub const fn from_fields_v7(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || rand_a >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        Self([
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
            0x70 | (rand_a >> 8) as u8,
            rand_a as u8,
            0x80 | (rand_b >> 56) as u8,
            (rand_b >> 48) as u8,
            (rand_b >> 40) as u8,
            (rand_b >> 32) as u8,
            (rand_b >> 24) as u8,
            (rand_b >> 16) as u8,
            (rand_b >> 8) as u8,
            rand_b as u8,
        ])
    }

    /// Overwrites the version nibble and the variant bits of `bytes`, leaving the rest intact.
    pub(crate) const fn stamp(mut bytes: [u8; 16], version: Version) -> Self {
        bytes[6] = ((version as u8) << 4) | (bytes[6] & 0x0f);
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Self(bytes)
    }

    /// Reports the variant field value of the UUID or, if appropriate, "NIL" or "MAX".
    ///
    /// For convenience, this method reports [`Variant::VarNil`] or [`Variant::VarMax`] if `self`
    /// represents the Nil or Max UUID, although the Nil and Max UUIDs are technically subsumed
    /// under the variants `0b0` and `0b111`, respectively.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0b0000..=0b0111 => {
                if self.as_u128() == 0 {
                    Variant::VarNil
                } else {
                    Variant::Var0
                }
            }
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ => {
                if self.as_u128() == u128::MAX {
                    Variant::VarMax
                } else {
                    Variant::VarReserved
                }
            }
        }
    }

    /// Returns the raw 4-bit version field, whatever the variant of the UUID is.
    pub const fn version_num(&self) -> u8 {
        self.0[6] >> 4
    }

    /// Returns the version of the UUID if it belongs to the IETF variant (`0b10`) and carries
    /// one of the versions this crate understands.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::{Uuid, Version};
    ///
    /// let x: Uuid = "123e4567-e89b-12d3-a456-426614174000".parse()?;
    /// assert_eq!(x.version(), Some(Version::TimeBased));
    /// assert_eq!(Uuid::NIL.version(), None);
    /// # Ok::<(), uuidkit::ParseError>(())
    /// ```
    pub const fn version(&self) -> Option<Version> {
        match self.variant() {
            Variant::Var10 => Version::from_num(self.version_num()),
            _ => None,
        }
    }

    /// Decodes the version-specific fields of the UUID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::{Fields, Uuid};
    ///
    /// let x = Uuid::from_fields_v1(0x1e7_52a1_f3b4_958c, 42, 0x0102_0304_0506);
    /// match x.fields() {
    ///     Fields::V1(f) => {
    ///         assert_eq!(f.timestamp(), 0x1e7_52a1_f3b4_958c);
    ///         assert_eq!(f.clock_seq(), 42);
    ///         assert_eq!(f.node().as_u64(), 0x0102_0304_0506);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub const fn fields(&self) -> Fields {
        let (high, low) = self.as_u64_pair();
        let clock_seq = ((low >> 48) & 0x3fff) as u16;
        let node = NodeId::from_u64_truncated(low);
        match self.version() {
            Some(Version::TimeBased) => {
                let timestamp = ((high & 0x0fff) << 48)
                    | (((high >> 16) & 0xffff) << 32)
                    | (high >> 32);
                Fields::V1(TimeFields::new(timestamp, clock_seq, node))
            }
            Some(Version::NameBasedMd5) => Fields::V3(HashFields::new(self.payload_bits())),
            Some(Version::Random) => Fields::V4(RandomFields::new(self.payload_bits())),
            Some(Version::NameBasedSha1) => Fields::V5(HashFields::new(self.payload_bits())),
            Some(Version::ReorderedTimeBased) => {
                let timestamp = ((high >> 16) << 12) | (high & 0x0fff);
                Fields::V6(TimeFields::new(timestamp, clock_seq, node))
            }
            Some(Version::UnixTimeBased) => Fields::V7(UnixTimeFields::new(
                high >> 16,
                (high & 0x0fff) as u16,
                low & 0x3fff_ffff_ffff_ffff,
            )),
            None => Fields::Unknown,
        }
    }

    /// Returns the 122 bits left after removing the version and variant fields, packed into the
    /// least significant bits.
    const fn payload_bits(&self) -> u128 {
        let (high, low) = self.as_u64_pair();
        let high = ((high >> 16) << 12) | (high & 0x0fff);
        ((high as u128) << 62) | (low & 0x3fff_ffff_ffff_ffff) as u128
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// This never fails: every 128-bit value, including the Nil UUID and values of foreign
    /// variants, has exactly one 36-character representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::Uuid;
    ///
    /// let x = "01809424-3E59-7C05-9219-566F82FFF672".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "01809424-3e59-7c05-9219-566f82fff672");
    /// assert_eq!(format!("{}", y), "01809424-3e59-7c05-9219-566f82fff672");
    /// # Ok::<(), uuidkit::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut r = 0;
        let mut w = 0;
        while r < 16 {
            let e = self.0[r] as usize;
            buffer[w] = DIGITS[e >> 4];
            buffer[w + 1] = DIGITS[e & 15];
            if r == 3 || r == 5 || r == 7 || r == 9 {
                buffer[w + 2] = b'-';
                w += 1;
            }
            r += 1;
            w += 2;
        }

        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the URN representation (`urn:uuid:` followed by the 8-4-4-4-12 form).
    pub fn urn(&self) -> String {
        format!("urn:uuid:{}", self.encode())
    }

    /// Returns the OID URN representation under the `2.25` arc that ITU-T X.667 reserves for
    /// UUIDs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::Uuid;
    ///
    /// let x = Uuid::from_u128(1);
    /// assert_eq!(x.oid_urn(), "urn:oid:2.25.1");
    /// ```
    pub fn oid_urn(&self) -> String {
        format!("urn:oid:2.25.{}", self.as_u128())
    }

    /// Returns the UUID as an unsigned decimal integer.
    pub fn to_decimal_string(&self) -> String {
        self.as_u128().to_string()
    }

    /// Returns the 128 bits of the UUID as a string of `0` and `1` characters, most significant
    /// bit first.
    pub fn to_binary_string(&self) -> String {
        format!("{:0128b}", self.as_u128())
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        src.as_u128()
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self::from_u128(src)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

/// The reserved variants of UUIDs.
///
/// See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562#name-variant-field).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// Nil UUID.
    VarNil,

    /// The variant `0b0` reserved for NCS backward compatibility.
    Var0,

    /// The IETF variant (`0b10`), the only one this crate generates.
    Var10,

    /// The variant `0b110` reserved for Microsoft backward compatibility.
    Var110,

    /// The variant `0b111` reserved for future definition.
    VarReserved,

    /// Max UUID.
    VarMax,
}

/// The UUID versions that this crate generates and decodes.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum Version {
    /// Version 1: Gregorian time-based with a node identifier.
    TimeBased = 1,

    /// Version 3: name-based with MD5 hashing.
    NameBasedMd5 = 3,

    /// Version 4: random.
    Random = 4,

    /// Version 5: name-based with SHA-1 hashing.
    NameBasedSha1 = 5,

    /// Version 6: version 1 fields reordered for chronological sorting.
    ReorderedTimeBased = 6,

    /// Version 7: Unix Epoch time-based.
    UnixTimeBased = 7,
}

impl Version {
    /// Returns the version corresponding to the 4-bit version field value, if supported.
    pub const fn from_num(num: u8) -> Option<Self> {
        match num {
            1 => Some(Self::TimeBased),
            3 => Some(Self::NameBasedMd5),
            4 => Some(Self::Random),
            5 => Some(Self::NameBasedSha1),
            6 => Some(Self::ReorderedTimeBased),
            7 => Some(Self::UnixTimeBased),
            _ => None,
        }
    }

    /// Returns the 4-bit version field value.
    pub const fn num(self) -> u8 {
        self as u8
    }
}

/// Converts a count of 100-nanosecond ticks since 1582-10-15 into a [`time::SystemTime`], or
/// returns `None` if the platform cannot represent the instant (e.g., before 1601 on Windows).
pub(crate) fn gregorian_to_system_time(ticks: u64) -> Option<time::SystemTime> {
    let since_unix = |t: u64| time::Duration::new(t / 10_000_000, (t % 10_000_000) as u32 * 100);
    if ticks >= GREGORIAN_UNIX_OFFSET {
        time::UNIX_EPOCH.checked_add(since_unix(ticks - GREGORIAN_UNIX_OFFSET))
    } else {
        time::UNIX_EPOCH.checked_sub(since_unix(GREGORIAN_UNIX_OFFSET - ticks))
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
