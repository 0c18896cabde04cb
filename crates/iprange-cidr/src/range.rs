//! Inclusive address ranges and CIDR block decomposition

use crate::prefix::Prefix;
use iprange_core::{mask_to_len, masklen_to_mask, Address, IpError, Result, MAX_MASK_LEN};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Inclusive, non-empty interval of IPv4 addresses
///
/// `start <= end` always holds; [`AddressRange::new`] swaps its arguments
/// when given out of order.
///
/// # Examples
///
/// ```
/// use iprange_cidr::{Address, AddressRange};
///
/// let range = AddressRange::new(
///     Address::parse("10.0.0.255").unwrap(),
///     Address::parse("10.0.0.0").unwrap(),
/// );
/// assert_eq!(range.start().to_string(), "10.0.0.0");
/// assert_eq!(range.address_count(), 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RangeBounds")]
pub struct AddressRange {
    start: Address,
    end: Address,
}

#[derive(Deserialize)]
struct RangeBounds {
    start: Address,
    end: Address,
}

impl From<RangeBounds> for AddressRange {
    fn from(bounds: RangeBounds) -> Self {
        AddressRange::new(bounds.start, bounds.end)
    }
}

/// Result of [`AddressRange::subtract`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtraction {
    /// Parts of the minuend not covered by the subtrahend, in ascending order
    pub remaining: Vec<AddressRange>,
    /// Part of the minuend covered by the subtrahend
    pub overlap: Option<AddressRange>,
}

impl AddressRange {
    /// Create a range from two bounds in either order.
    pub fn new(a: Address, b: Address) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Range holding exactly one address.
    pub fn single(addr: Address) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Lowest address in the range
    pub fn start(&self) -> Address {
        self.start
    }

    /// Highest address in the range
    pub fn end(&self) -> Address {
        self.end
    }

    /// Check if `addr` lies within the range
    pub fn contains(&self, addr: Address) -> bool {
        self.start <= addr && addr <= self.end
    }

    /// Check if `other` lies entirely within the range
    pub fn contains_range(&self, other: &AddressRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Check if the ranges share at least one address
    pub fn is_overlap(&self, other: &AddressRange) -> bool {
        !(self.start > other.end || self.end < other.start)
    }

    /// Number of addresses in the range. A full `0.0.0.0-255.255.255.255` range holds 2^32.
    pub fn address_count(&self) -> u64 {
        u64::from(self.end.0) - u64::from(self.start.0) + 1
    }

    /// Uniformly sample an address in `[start, end)`.
    ///
    /// The upper bound is excluded; a single-address range yields `start`.
    pub fn random(&self) -> Address {
        self.random_with(&mut rand::thread_rng())
    }

    /// Same as [`AddressRange::random`] with a caller-supplied generator.
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        if self.start == self.end {
            return self.start;
        }
        Address(rng.gen_range(self.start.0..self.end.0))
    }

    /// Union of two ranges that overlap or touch end to start.
    ///
    /// Returns `None` when a gap separates them.
    ///
    /// ```
    /// use iprange_cidr::AddressRange;
    ///
    /// let a: AddressRange = "10.0.0.0-10.0.0.9".parse().unwrap();
    /// let b: AddressRange = "10.0.0.10-10.0.0.20".parse().unwrap();
    /// assert_eq!(a.merge(&b).unwrap().to_string(), "10.0.0.0-10.0.0.20");
    /// ```
    pub fn merge(&self, other: &AddressRange) -> Option<AddressRange> {
        let adjacent = u64::from(self.end.0) + 1 == u64::from(other.start.0)
            || u64::from(other.end.0) + 1 == u64::from(self.start.0);

        if !self.is_overlap(other) && !adjacent {
            return None;
        }

        Some(AddressRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    /// Remove `other` from this range.
    ///
    /// Returns what is left of `self` together with the part of `self`
    /// that `other` covered.
    pub fn subtract(&self, other: &AddressRange) -> Subtraction {
        // Disjoint
        if self.end < other.start || self.start > other.end {
            return Subtraction {
                remaining: vec![*self],
                overlap: None,
            };
        }

        // `self` covers `other`, including the equal case
        if self.contains_range(other) {
            let mut remaining = Vec::with_capacity(2);
            if self.start < other.start {
                remaining.push(AddressRange {
                    start: self.start,
                    end: other.start.step_down(),
                });
            }
            if other.end < self.end {
                remaining.push(AddressRange {
                    start: other.end.step_up(),
                    end: self.end,
                });
            }
            return Subtraction {
                remaining,
                overlap: Some(*other),
            };
        }

        if other.contains_range(self) {
            return Subtraction {
                remaining: Vec::new(),
                overlap: Some(*self),
            };
        }

        // `self` hangs off the left edge of `other`
        if self.start < other.start && self.end >= other.start {
            return Subtraction {
                remaining: vec![AddressRange {
                    start: self.start,
                    end: other.start.step_down(),
                }],
                overlap: Some(AddressRange {
                    start: other.start,
                    end: self.end,
                }),
            };
        }

        // `self` hangs off the right edge of `other`
        if self.start <= other.end && self.end > other.end {
            return Subtraction {
                remaining: vec![AddressRange {
                    start: other.end.step_up(),
                    end: self.end,
                }],
                overlap: Some(AddressRange {
                    start: self.start,
                    end: other.end,
                }),
            };
        }

        Subtraction {
            remaining: Vec::new(),
            overlap: None,
        }
    }

    /// Decompose the range into the minimal list of aligned CIDR blocks.
    ///
    /// Each entry is `(network, mask)` as raw integers, in ascending order.
    /// At every step the largest block that is aligned at the cursor and
    /// fits before the end of the range is taken.
    ///
    /// ```
    /// use iprange_cidr::AddressRange;
    ///
    /// let range: AddressRange = "10.0.0.0-10.0.1.127".parse().unwrap();
    /// assert_eq!(
    ///     range.to_mask_matches(),
    ///     vec![(0x0A000000, 0xFFFFFF00), (0x0A000100, 0xFFFFFF80)]
    /// );
    /// ```
    pub fn to_mask_matches(&self) -> Vec<(u32, u32)> {
        if self.start == self.end {
            return vec![(self.start.0, u32::MAX)];
        }

        // Widened so that `end + 1` and a /0 block fit.
        let mut cursor = u64::from(self.start.0);
        let limit = u64::from(self.end.0) + 1;
        let mut matches = Vec::new();

        while cursor < limit {
            let mut block: u64 = 1;
            while cursor + block <= limit && cursor % block == 0 {
                block <<= 1;
            }
            block >>= 1;

            matches.push((cursor as u32, (!(block - 1)) as u32));
            cursor += block;
        }

        debug!(range = %self, blocks = matches.len(), "decomposed range");
        matches
    }

    /// Decompose the range into [`CidrBlock`]s.
    ///
    /// ```
    /// use iprange_cidr::AddressRange;
    ///
    /// let range: AddressRange = "192.168.0.0-192.168.2.255".parse().unwrap();
    /// let blocks: Vec<String> = range.to_cidr_blocks().iter().map(|b| b.to_string()).collect();
    /// assert_eq!(blocks, vec!["192.168.0.0/23", "192.168.2.0/24"]);
    /// ```
    pub fn to_cidr_blocks(&self) -> Vec<CidrBlock> {
        self.to_mask_matches()
            .into_iter()
            .map(|(network, mask)| CidrBlock {
                network: Address(network),
                mask: Address(mask),
            })
            .collect()
    }

    /// Iterate over every address in the range, in ascending order.
    ///
    /// Note: a wide range (e.g. a /8) yields millions of items.
    pub fn iter(&self) -> AddressRangeIter {
        AddressRangeIter {
            current: u64::from(self.start.0),
            end: u64::from(self.end.0),
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for AddressRange {
    type Err = IpError;

    /// Accepts `"a.b.c.d-e.f.g.h"`, a CIDR prefix, or a single address.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((start, end)) = s.split_once('-') {
            let start = Address::parse(start.trim())?;
            let end = Address::parse(end.trim())?;
            return Ok(AddressRange::new(start, end));
        }

        if s.contains('/') {
            return Ok(Prefix::parse(s)?.range());
        }

        Ok(AddressRange::single(Address::parse(s)?))
    }
}

impl From<Address> for AddressRange {
    fn from(addr: Address) -> Self {
        AddressRange::single(addr)
    }
}

/// Iterator over the addresses of an [`AddressRange`]
pub struct AddressRangeIter {
    current: u64,
    end: u64,
}

impl Iterator for AddressRangeIter {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current <= self.end {
            let addr = Address(self.current as u32);
            self.current += 1;
            Some(addr)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.current);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Power-of-two aligned block produced by CIDR decomposition
///
/// The mask is always contiguous and the network address has no host bits
/// set; deserialization rejects input that breaks either rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BlockParts")]
pub struct CidrBlock {
    network: Address,
    mask: Address,
}

#[derive(Deserialize)]
struct BlockParts {
    network: Address,
    mask: Address,
}

impl TryFrom<BlockParts> for CidrBlock {
    type Error = IpError;

    fn try_from(parts: BlockParts) -> Result<Self> {
        if masklen_to_mask(mask_to_len(parts.mask))? != parts.mask {
            return Err(IpError::InvalidFormat(format!(
                "Non-contiguous mask: {}",
                parts.mask
            )));
        }
        if parts.network.0 & !parts.mask.0 != 0 {
            return Err(IpError::InvalidFormat(format!(
                "Network {} has host bits set under mask {}",
                parts.network, parts.mask
            )));
        }
        Ok(CidrBlock {
            network: parts.network,
            mask: parts.mask,
        })
    }
}

impl CidrBlock {
    /// First address of the block
    pub fn network(&self) -> Address {
        self.network
    }

    /// Network mask
    pub fn mask(&self) -> Address {
        self.mask
    }

    /// Mask length (0-32)
    pub fn prefix_len(&self) -> u8 {
        mask_to_len(self.mask)
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (MAX_MASK_LEN - self.prefix_len())
    }

    /// Addresses covered by the block
    pub fn to_range(&self) -> AddressRange {
        AddressRange {
            start: self.network,
            end: Address(self.network.0 | !self.mask.0),
        }
    }

    /// The block as a [`Prefix`]
    pub fn to_prefix(&self) -> Prefix {
        Prefix::from(*self)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len())
    }
}
