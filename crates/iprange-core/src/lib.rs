//! Core types for iprange (IPv4 range arithmetic)
//!
//! This crate provides the foundational types used throughout the iprange workspace:
//! - [`Address`] - A single IPv4 host address
//! - [`masklen_to_mask`] / [`mask_to_len`] - Mask length conversions
//! - [`IpError`] - Error types
//!
//! ```
//! use iprange_core::Address;
//!
//! let addr: Address = "192.168.1.10".parse().unwrap();
//! assert_eq!(addr.network_address(24).unwrap().to_string(), "192.168.1.0");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

pub mod mac;
pub mod syntax;

/// Longest valid IPv4 mask length.
pub const MAX_MASK_LEN: u8 = 32;

/// Error types for iprange operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpError {
    /// Malformed textual input (address, prefix or mask)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Caller passed a value outside the valid domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for iprange operations
pub type Result<T> = std::result::Result<T, IpError>;

/// IPv4 host address
///
/// Wraps the address as a big-endian `u32`: the first octet is the most
/// significant byte. Ordering follows the numeric value.
///
/// # Examples
///
/// ```
/// use iprange_core::Address;
///
/// let addr = Address::parse("10.0.0.1").unwrap();
/// assert_eq!(addr, Address(0x0A000001));
/// assert_eq!(addr.step_up().to_string(), "10.0.0.2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub u32);

impl Address {
    /// Parse a dotted-decimal address (`"a.b.c.d"`).
    ///
    /// Exactly four fields are required and each must be an integer in `0..=255`
    /// written as plain ASCII digits without a sign or leading zeros, so every
    /// accepted string renders back unchanged.
    pub fn parse(text: &str) -> Result<Self> {
        let octets: Vec<&str> = text.split('.').collect();
        if octets.len() != 4 {
            return Err(IpError::InvalidFormat(format!(
                "Expected 4 octets in address: {}",
                text
            )));
        }

        let mut result = 0u32;
        for (i, octet_str) in octets.iter().enumerate() {
            let invalid = || {
                IpError::InvalidFormat(format!("Invalid octet '{}' in address: {}", octet_str, text))
            };
            if !syntax::is_decimal(octet_str) || (octet_str.len() > 1 && octet_str.starts_with('0'))
            {
                return Err(invalid());
            }
            let octet: u8 = octet_str.parse().map_err(|_| invalid())?;
            result |= (octet as u32) << (24 - i * 8);
        }

        Ok(Address(result))
    }

    /// Build an address from its four octets, most significant first.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Address(u32::from_be_bytes(bytes))
    }

    /// The next address. `255.255.255.255` wraps to `0.0.0.0`.
    pub fn step_up(self) -> Self {
        Address(self.0.wrapping_add(1))
    }

    /// The previous address. `0.0.0.0` wraps to `255.255.255.255`.
    pub fn step_down(self) -> Self {
        Address(self.0.wrapping_sub(1))
    }

    /// Lowest address of the subnet containing `self` under `mask_len`.
    pub fn network_address(self, mask_len: u8) -> Result<Self> {
        let mask = masklen_to_mask(mask_len)?;
        Ok(Address(self.0 & mask.0))
    }

    /// Highest address of the subnet containing `self` under `mask_len`.
    pub fn broadcast_address(self, mask_len: u8) -> Result<Self> {
        let mask = masklen_to_mask(mask_len)?;
        Ok(Address(self.0 | !mask.0))
    }

    /// Host identifier of `self` within its subnet (network bits zeroed).
    pub fn client_portion(self, mask_len: u8) -> Result<Self> {
        let mask = masklen_to_mask(mask_len)?;
        Ok(Address(self.0 & !mask.0))
    }

    /// Octets in network byte order.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Render a MAC-like identifier: `prefix` followed by the four octets as hex pairs.
    ///
    /// ```
    /// use iprange_core::Address;
    ///
    /// let addr = Address::parse("10.1.2.255").unwrap();
    /// assert_eq!(addr.to_mac_string("02:00"), "02:00:0a:01:02:ff");
    /// ```
    pub fn to_mac_string(self, prefix: &str) -> String {
        let suffix = mac::format_mac(&self.to_bytes());
        let prefix = prefix.trim_end_matches(':');
        if prefix.is_empty() {
            suffix
        } else {
            format!("{}:{}", prefix, suffix)
        }
    }
}

/// Mask with the top `mask_len` bits set.
///
/// # Examples
///
/// ```
/// use iprange_core::masklen_to_mask;
///
/// assert_eq!(masklen_to_mask(24).unwrap().to_string(), "255.255.255.0");
/// assert!(masklen_to_mask(33).is_err());
/// ```
pub fn masklen_to_mask(mask_len: u8) -> Result<Address> {
    if mask_len > MAX_MASK_LEN {
        return Err(IpError::InvalidArgument(format!(
            "Mask length {} out of range (must be 0-32)",
            mask_len
        )));
    }

    let mask = if mask_len == 0 {
        0
    } else {
        u32::MAX << (MAX_MASK_LEN - mask_len)
    };

    Ok(Address(mask))
}

/// Number of leading one-bits in `mask`.
///
/// Only meaningful for contiguous masks; other values give a deterministic
/// but otherwise arbitrary result.
pub fn mask_to_len(mask: Address) -> u8 {
    (!mask.0).leading_zeros() as u8
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.to_bytes();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl FromStr for Address {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse(s)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address(value)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address(u32::from(addr))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = IpError;

    fn try_from(value: String) -> Result<Self> {
        Address::parse(&value)
    }
}
