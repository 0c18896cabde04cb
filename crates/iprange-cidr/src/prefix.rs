//! CIDR prefix parsing

use crate::range::{AddressRange, CidrBlock};
use iprange_core::syntax::{is_decimal, is_dotted_quad};
use iprange_core::{mask_to_len, Address, IpError, Result, MAX_MASK_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Parse prefix notation into a network address and mask length.
///
/// Accepts `"a.b.c.d/n"`, `"a.b.c.d/m.m.m.m"` or a bare `"a.b.c.d"`
/// (mask length 32). The returned address is the network address under
/// the parsed mask.
///
/// # Examples
///
/// ```
/// use iprange_cidr::{parse_prefix, Address};
///
/// let (network, len) = parse_prefix("192.168.1.5/255.255.255.0").unwrap();
/// assert_eq!(network, Address::parse("192.168.1.0").unwrap());
/// assert_eq!(len, 24);
/// ```
pub fn parse_prefix(text: &str) -> Result<(Address, u8)> {
    let (addr_str, mask_str) = match text.split_once('/') {
        Some(parts) => parts,
        None => return Ok((Address::parse(text)?, MAX_MASK_LEN)),
    };

    let address = Address::parse(addr_str)?;

    let mask_len = if is_dotted_quad(mask_str) {
        mask_to_len(Address::parse(mask_str)?)
    } else {
        if !is_decimal(mask_str) {
            return Err(IpError::InvalidFormat(format!("Invalid mask: {}", mask_str)));
        }
        let len: u8 = mask_str
            .parse()
            .map_err(|_| IpError::InvalidFormat(format!("Invalid mask: {}", mask_str)))?;
        if len > MAX_MASK_LEN {
            return Err(IpError::InvalidFormat(format!(
                "Mask length {} out of range (must be 0-32)",
                len
            )));
        }
        len
    };

    Ok((address.network_address(mask_len)?, mask_len))
}

/// IPv4 network in CIDR form
///
/// Holds the network address, the mask length and the derived range.
/// Equality compares the covered range only, so `"10.1.2.3/8"` and
/// `"10.0.0.0/255.0.0.0"` are equal.
///
/// # Examples
///
/// ```
/// use iprange_cidr::{Address, Prefix};
///
/// let prefix = Prefix::parse("10.0.0.0/8").unwrap();
/// assert!(prefix.contains(Address::parse("10.200.0.1").unwrap()));
/// assert_eq!(prefix.to_string(), "10.0.0.0/8");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Prefix {
    address: Address,
    mask_len: u8,
    range: AddressRange,
}

impl Prefix {
    /// Build a prefix from any address inside the network and a mask length.
    pub fn new(address: Address, mask_len: u8) -> Result<Self> {
        let network = address.network_address(mask_len)?;
        let broadcast = address.broadcast_address(mask_len)?;

        Ok(Self {
            address: network,
            mask_len,
            range: AddressRange::new(network, broadcast),
        })
    }

    /// Parse prefix notation; see [`parse_prefix`].
    pub fn parse(text: &str) -> Result<Self> {
        let (address, mask_len) = parse_prefix(text)?;
        Self::new(address, mask_len)
    }

    /// Network address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Mask length (0-32)
    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }

    /// Network mask
    pub fn netmask(&self) -> Address {
        Address(!(self.range.start().0 ^ self.range.end().0))
    }

    /// Covered addresses
    pub fn range(&self) -> AddressRange {
        self.range
    }

    /// First address of the network
    pub fn network(&self) -> Address {
        self.range.start()
    }

    /// Last address of the network
    pub fn broadcast(&self) -> Address {
        self.range.end()
    }

    /// Number of addresses in the network
    pub fn size(&self) -> u64 {
        self.range.address_count()
    }

    /// Check if `addr` is inside the network
    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }
}

impl PartialEq for Prefix {
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range
    }
}

impl Eq for Prefix {}

impl Hash for Prefix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.range.hash(state);
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mask_len == MAX_MASK_LEN {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{}/{}", self.address, self.mask_len)
        }
    }
}

impl FromStr for Prefix {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self> {
        Prefix::parse(s)
    }
}

impl From<CidrBlock> for Prefix {
    fn from(block: CidrBlock) -> Self {
        Self {
            address: block.network(),
            mask_len: block.prefix_len(),
            range: block.to_range(),
        }
    }
}

impl From<Prefix> for AddressRange {
    fn from(prefix: Prefix) -> Self {
        prefix.range
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.to_string()
    }
}

impl TryFrom<String> for Prefix {
    type Error = IpError;

    fn try_from(value: String) -> Result<Self> {
        Prefix::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    #[test]
    fn test_parse_prefix_length() {
        let (network, len) = parse_prefix("192.168.1.0/24").unwrap();
        assert_eq!(network, addr("192.168.1.0"));
        assert_eq!(len, 24);
    }

    #[test]
    fn test_parse_prefix_normalizes_host_bits() {
        let (network, len) = parse_prefix("10.1.2.3/8").unwrap();
        assert_eq!(network, addr("10.0.0.0"));
        assert_eq!(len, 8);
    }

    #[test]
    fn test_parse_prefix_dotted_mask() {
        let (network, len) = parse_prefix("192.168.1.5/255.255.255.0").unwrap();
        assert_eq!(network, addr("192.168.1.0"));
        assert_eq!(len, 24);
    }

    #[test]
    fn test_parse_prefix_bare_address() {
        let (network, len) = parse_prefix("172.16.5.4").unwrap();
        assert_eq!(network, addr("172.16.5.4"));
        assert_eq!(len, 32);
    }

    #[test]
    fn test_parse_prefix_edges() {
        assert_eq!(parse_prefix("1.2.3.4/0").unwrap(), (Address(0), 0));
        assert_eq!(parse_prefix("1.2.3.4/32").unwrap(), (addr("1.2.3.4"), 32));
        assert_eq!(parse_prefix("1.2.3.4/0.0.0.0").unwrap(), (Address(0), 0));
    }

    #[test]
    fn test_parse_prefix_invalid() {
        for bad in [
            "192.168.1.0/33",
            "192.168.1.0/",
            "192.168.1.0/-1",
            "192.168.1.0/abc",
            "192.168.1.0/24/1",
            "192.168.1/24",
            "300.0.0.0/8",
            "10.0.0.0/255.255.0.256",
            "10.0.0.0/255.255.0",
            "10.0.0.0/+8",
            "+10.0.0.0/8",
            "010.0.0.0/8",
        ] {
            let err = parse_prefix(bad).unwrap_err();
            assert!(matches!(err, IpError::InvalidFormat(_)), "{}", bad);
        }
    }

    #[test]
    fn test_prefix_range() {
        let prefix = Prefix::parse("192.168.1.0/24").unwrap();
        assert_eq!(prefix.network(), addr("192.168.1.0"));
        assert_eq!(prefix.broadcast(), addr("192.168.1.255"));
        assert_eq!(prefix.netmask(), addr("255.255.255.0"));
        assert_eq!(prefix.size(), 256);
        assert_eq!(prefix.mask_len(), 24);
    }

    #[test]
    fn test_prefix_contains() {
        let prefix = Prefix::parse("172.16.0.0/12").unwrap();
        assert!(prefix.contains(addr("172.16.0.0")));
        assert!(prefix.contains(addr("172.31.255.255")));
        assert!(!prefix.contains(addr("172.32.0.0")));
        assert!(!prefix.contains(addr("172.15.255.255")));
    }

    #[test]
    fn test_prefix_equality_across_notations() {
        let a = Prefix::parse("192.168.1.0/24").unwrap();
        let b = Prefix::parse("192.168.1.5/255.255.255.0").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Prefix::parse("192.168.1.0/25").unwrap());
    }

    #[test]
    fn test_prefix_display() {
        assert_eq!(Prefix::parse("10.9.8.7/16").unwrap().to_string(), "10.9.0.0/16");
        assert_eq!(Prefix::parse("10.9.8.7").unwrap().to_string(), "10.9.8.7");
        assert_eq!(Prefix::parse("10.9.8.7/32").unwrap().to_string(), "10.9.8.7");
        assert_eq!(Prefix::parse("10.9.8.7/0").unwrap().to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_prefix_new() {
        let prefix = Prefix::new(addr("10.1.1.1"), 16).unwrap();
        assert_eq!(prefix.address(), addr("10.1.0.0"));
        assert!(Prefix::new(addr("10.1.1.1"), 33).is_err());
    }

    #[test]
    fn test_prefix_serialization() {
        let prefix = Prefix::parse("10.0.0.0/8").unwrap();
        let json = serde_json::to_string(&prefix).expect("serialization failed");
        assert_eq!(json, "\"10.0.0.0/8\"");

        let back: Prefix = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back, prefix);
        assert!(serde_json::from_str::<Prefix>("\"10.0.0.0/40\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_prefix_range_matches_masks(n in any::<u32>(), len in 0u8..=32) {
            let prefix = Prefix::new(Address(n), len).unwrap();
            prop_assert_eq!(prefix.range().start(), Address(n).network_address(len).unwrap());
            prop_assert_eq!(prefix.range().end(), Address(n).broadcast_address(len).unwrap());
            prop_assert_eq!(Prefix::parse(&prefix.to_string()).unwrap(), prefix);
        }

        #[test]
        fn prop_dotted_and_length_notations_agree(n in any::<u32>(), len in 0u8..=32) {
            let mask = iprange_core::masklen_to_mask(len).unwrap();
            let by_len = Prefix::parse(&format!("{}/{}", Address(n), len)).unwrap();
            let by_mask = Prefix::parse(&format!("{}/{}", Address(n), mask)).unwrap();
            prop_assert_eq!(by_len, by_mask);
        }
    }
}
