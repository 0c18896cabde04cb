//! Address classification for iprange
//!
//! Sorts IPv4 addresses into well-known reserved blocks and a configurable
//! set of private ranges:
//! - **Host-local**: `127.0.0.0/8`
//! - **Link-local**: `169.254.0.0/16`
//! - **Multicast**: `224.0.0.0/4`
//! - **Private**: RFC 1918 blocks by default, replaceable
//! - **Exit**: everything else (publicly routable under this scheme)
//!
//! # Architecture
//!
//! - [`ClassificationConfig`] is an immutable value; pass it to callers that classify
//! - The `registry` functions wrap one process-wide config behind a `RwLock`
//!   for callers that cannot thread a config through
//!
//! # Examples
//!
//! ```
//! use iprange_classify::{AddressClass, ClassificationConfig};
//! use iprange_cidr::Address;
//!
//! let config = ClassificationConfig::default();
//! let addr = Address::parse("8.8.8.8").unwrap();
//!
//! assert!(config.is_exit_address(addr));
//! assert_eq!(config.classify(Address::parse("10.1.2.3").unwrap()), AddressClass::Private);
//! ```

use iprange_cidr::{AddressRange, IpError, Prefix};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod config;
pub mod registry;

pub use config::ClassificationConfig;
pub use registry::{
    is_exit_address, is_host_local, is_link_local, is_multicast, is_private, private_ranges,
    set_private_prefixes,
};

/// Loopback block
pub const HOST_LOCAL_PREFIX: &str = "127.0.0.0/8";
/// Link-local block
pub const LINK_LOCAL_PREFIX: &str = "169.254.0.0/16";
/// Multicast block
pub const MULTICAST_PREFIX: &str = "224.0.0.0/4";
/// RFC 1918 private blocks
pub const DEFAULT_PRIVATE_PREFIXES: [&str; 3] = ["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"];

pub(crate) static HOST_LOCAL_RANGE: Lazy<AddressRange> = Lazy::new(|| builtin(HOST_LOCAL_PREFIX));
pub(crate) static LINK_LOCAL_RANGE: Lazy<AddressRange> = Lazy::new(|| builtin(LINK_LOCAL_PREFIX));
pub(crate) static MULTICAST_RANGE: Lazy<AddressRange> = Lazy::new(|| builtin(MULTICAST_PREFIX));

fn builtin(cidr: &str) -> AddressRange {
    Prefix::parse(cidr)
        .map(|prefix| prefix.range())
        .expect("built-in prefix is valid")
}

/// Class of an address, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressClass {
    /// Loopback (`127.0.0.0/8`)
    HostLocal,
    /// Link-local (`169.254.0.0/16`)
    LinkLocal,
    /// Multicast (`224.0.0.0/4`)
    Multicast,
    /// One of the configured private ranges
    Private,
    /// None of the above
    Exit,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressClass::HostLocal => "host-local",
            AddressClass::LinkLocal => "link-local",
            AddressClass::Multicast => "multicast",
            AddressClass::Private => "private",
            AddressClass::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// Private prefix that could not be parsed and was left out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rejected private prefix '{input}': {source}")]
pub struct RejectedPrefix {
    /// Text as supplied by the caller
    pub input: String,
    /// Parse failure
    #[source]
    pub source: IpError,
}
