//! Process-wide classification state
//!
//! Holds one [`ClassificationConfig`] behind a `RwLock`, starting from the
//! RFC 1918 defaults. Prefer passing a config explicitly; these functions
//! exist for callers that cannot.

use crate::{
    ClassificationConfig, RejectedPrefix, HOST_LOCAL_RANGE, LINK_LOCAL_RANGE, MULTICAST_RANGE,
};
use iprange_cidr::{Address, AddressRange};
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

static REGISTRY: Lazy<RwLock<ClassificationConfig>> =
    Lazy::new(|| RwLock::new(ClassificationConfig::default()));

fn read() -> RwLockReadGuard<'static, ClassificationConfig> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replace the process-wide private ranges.
///
/// Every entry that parses is installed; the rest are returned. The old
/// list is discarded even when some entries are rejected.
pub fn set_private_prefixes<I, S>(prefixes: I) -> Vec<RejectedPrefix>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (config, rejected) = ClassificationConfig::with_private_prefixes(prefixes);
    debug!(
        ranges = config.private_ranges().len(),
        rejected = rejected.len(),
        "replacing private ranges"
    );
    replace(config);
    rejected
}

/// Install `config` as the process-wide config.
pub fn replace(config: ClassificationConfig) {
    let mut current = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    *current = config;
}

/// Copy of the process-wide config
pub fn snapshot() -> ClassificationConfig {
    read().clone()
}

/// Current process-wide private ranges
pub fn private_ranges() -> Vec<AddressRange> {
    read().private_ranges().to_vec()
}

/// Check `addr` against the process-wide private ranges
pub fn is_private(addr: Address) -> bool {
    read().is_private(addr)
}

/// Check if `addr` is in `127.0.0.0/8`
pub fn is_host_local(addr: Address) -> bool {
    HOST_LOCAL_RANGE.contains(addr)
}

/// Check if `addr` is in `169.254.0.0/16`
pub fn is_link_local(addr: Address) -> bool {
    LINK_LOCAL_RANGE.contains(addr)
}

/// Check if `addr` is in `224.0.0.0/4`
pub fn is_multicast(addr: Address) -> bool {
    MULTICAST_RANGE.contains(addr)
}

/// Check if `addr` is publicly routable under the process-wide config
pub fn is_exit_address(addr: Address) -> bool {
    read().is_exit_address(addr)
}
