//! IPv4 range algebra and CIDR operations
//!
//! Provides exact, allocation-light operations over inclusive address ranges:
//! - Containment, overlap, merge and subtraction of [`AddressRange`]s
//! - Decomposition of a range into the minimal list of aligned [`CidrBlock`]s
//! - [`Prefix`] parsing from `"a.b.c.d/n"`, `"a.b.c.d/m.m.m.m"` or `"a.b.c.d"`
//!
//! # Examples
//!
//! ```
//! use iprange_cidr::{AddressRange, Prefix};
//!
//! let prefix = Prefix::parse("192.168.1.0/24").unwrap();
//! let reserved: AddressRange = "192.168.1.0-192.168.1.15".parse().unwrap();
//!
//! let rest = prefix.range().subtract(&reserved).remaining;
//! let blocks: Vec<String> = rest[0].to_cidr_blocks().iter().map(|b| b.to_string()).collect();
//! assert_eq!(blocks, vec!["192.168.1.16/28", "192.168.1.32/27", "192.168.1.64/26", "192.168.1.128/25"]);
//! ```

mod prefix;
mod range;

pub use iprange_core::{Address, IpError, Result};
pub use prefix::{parse_prefix, Prefix};
pub use range::{AddressRange, AddressRangeIter, CidrBlock, Subtraction};
