use std::fmt;

use crate::generator::{EntropyUnavailable, RandSource};

/// Represents the 48-bit node identifier of UUIDv1 and UUIDv6.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates an object from an explicit 48-bit value.
    ///
    /// # Panics
    ///
    /// Panics if `value` exceeds 48 bits.
    pub const fn new(value: u64) -> Self {
        if value >= 1 << 48 {
            panic!("node id must be a 48-bit integer");
        }
        Self(value)
    }

    pub(crate) const fn from_u64_truncated(value: u64) -> Self {
        Self(value & 0xffff_ffff_ffff)
    }

    /// Creates an object from a 6-byte IEEE 802 MAC address.
    pub const fn from_mac(bytes: [u8; 6]) -> Self {
        Self(
            (bytes[0] as u64) << 40
                | (bytes[1] as u64) << 32
                | (bytes[2] as u64) << 24
                | (bytes[3] as u64) << 16
                | (bytes[4] as u64) << 8
                | bytes[5] as u64,
        )
    }

    /// Creates a random node identifier with the multicast bit set so that it never collides
    /// with a real hardware address.
    pub fn random<R: RandSource + ?Sized>(rng: &mut R) -> Result<Self, EntropyUnavailable> {
        let mut bytes = [0u8; 6];
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] |= 0x01;
        Ok(Self::from_mac(bytes))
    }

    /// Returns the hardware address of a network interface of the host, if any.
    ///
    /// The address is looked up through the `mac_address` crate on every call; an all-zero
    /// address or a lookup failure yields `None`.
    pub fn host() -> Option<Self> {
        from_lookup(mac_address::get_mac_address())
    }

    /// Returns [`NodeId::host()`] or, if no hardware address is available, [`NodeId::random()`].
    pub fn host_or_random<R: RandSource + ?Sized>(
        rng: &mut R,
    ) -> Result<Self, EntropyUnavailable> {
        match Self::host() {
            Some(node) => Ok(node),
            None => {
                log::debug!("no usable hardware address found; using random node id");
                Self::random(rng)
            }
        }
    }

    /// Returns the 48-bit integer value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the six octets in network order.
    pub const fn to_bytes(&self) -> [u8; 6] {
        let b = self.0.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }

    /// Returns `true` if the multicast bit (least significant bit of the first octet) is set,
    /// which marks identifiers that are not derived from hardware.
    pub const fn is_multicast(&self) -> bool {
        self.0 & (1 << 40) != 0
    }
}

impl fmt::Display for NodeId {
    /// Writes the colon-separated hexadecimal MAC address notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.to_bytes();
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl From<NodeId> for u64 {
    fn from(src: NodeId) -> Self {
        src.0
    }
}

impl From<[u8; 6]> for NodeId {
    fn from(src: [u8; 6]) -> Self {
        Self::from_mac(src)
    }
}

fn from_lookup(
    result: Result<Option<mac_address::MacAddress>, mac_address::MacAddressError>,
) -> Option<NodeId> {
    match result {
        Ok(Some(address)) => {
            let node = NodeId::from_mac(address.bytes());
            log::trace!("found hardware address {node}");
            (node.as_u64() != 0).then_some(node)
        }
        Ok(None) => None,
        Err(err) => {
            log::debug!("could not look up hardware address: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{from_lookup, NodeId};
    use crate::generator::with_rand08::Adapter;
    use rand::{rngs::StdRng, SeedableRng};

    /// Converts between octets and integer
    #[test]
    fn converts_between_octets_and_integer() {
        let e = NodeId::from_mac([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(e.as_u64(), 0x0102_0304_0506);
        assert_eq!(e.to_bytes(), [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(NodeId::new(0x0102_0304_0506), e);
        assert_eq!(e.to_string(), "01:02:03:04:05:06");
        assert!(e.is_multicast());
        assert!(!NodeId::new(0x0002_0304_0506).is_multicast());
    }

    /// Rejects node id wider than 48 bits
    #[test]
    #[should_panic]
    fn rejects_node_id_wider_than_48_bits() {
        NodeId::new(1 << 48);
    }

    /// Sets multicast bit of random node ids
    #[test]
    fn sets_multicast_bit_of_random_node_ids() {
        let mut rng = Adapter(StdRng::seed_from_u64(42));
        for _ in 0..1_000 {
            let e = NodeId::random(&mut rng).unwrap();
            assert!(e.is_multicast());
            assert!(e.as_u64() < 1 << 48);
        }
    }

    /// Accepts only nonzero hardware addresses
    #[test]
    fn accepts_only_nonzero_hardware_addresses() {
        use mac_address::MacAddress;

        let address = MacAddress::new([0x9f, 0x6b, 0xde, 0xce, 0xd8, 0x46]);
        assert_eq!(from_lookup(Ok(Some(address))), Some(NodeId::new(0x9f6b_dece_d846)));
        assert_eq!(from_lookup(Ok(Some(MacAddress::new([0; 6])))), None);
        assert_eq!(from_lookup(Ok(None)), None);
    }

    /// Reads a nonzero 48-bit host address when the host has one
    #[test]
    fn reads_a_nonzero_48_bit_host_address_when_the_host_has_one() {
        if let Some(e) = NodeId::host() {
            assert_ne!(e.as_u64(), 0);
            assert!(e.as_u64() < 1 << 48);
            assert_eq!(NodeId::host(), Some(e));
        }
    }

    /// Returns host address or random fallback
    #[test]
    fn returns_host_address_or_random_fallback() {
        let mut rng = Adapter(StdRng::seed_from_u64(7));
        let e = NodeId::host_or_random(&mut rng).unwrap();
        match NodeId::host() {
            Some(host) => assert_eq!(e, host),
            None => assert!(e.is_multicast()),
        }
    }
}
