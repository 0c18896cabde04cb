use crate::{
    AddressClass, RejectedPrefix, DEFAULT_PRIVATE_PREFIXES, HOST_LOCAL_RANGE, LINK_LOCAL_RANGE,
    MULTICAST_RANGE,
};
use iprange_cidr::{Address, AddressRange, Prefix};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Set of private ranges used to classify addresses
///
/// The loopback, link-local and multicast blocks are fixed; only the
/// private list varies between configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    private_ranges: Vec<AddressRange>,
}

impl ClassificationConfig {
    /// Config with an explicit private range list
    pub fn new(private_ranges: Vec<AddressRange>) -> Self {
        Self { private_ranges }
    }

    /// Build a config from CIDR strings.
    ///
    /// Entries that fail to parse are left out and returned alongside the
    /// config; the rest are kept in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use iprange_classify::ClassificationConfig;
    ///
    /// let (config, rejected) =
    ///     ClassificationConfig::with_private_prefixes(["100.64.0.0/10", "bogus"]);
    /// assert_eq!(config.private_ranges().len(), 1);
    /// assert_eq!(rejected[0].input, "bogus");
    /// ```
    pub fn with_private_prefixes<I, S>(prefixes: I) -> (Self, Vec<RejectedPrefix>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut private_ranges = Vec::new();
        let mut rejected = Vec::new();

        for text in prefixes {
            let text = text.as_ref();
            match Prefix::parse(text) {
                Ok(prefix) => private_ranges.push(prefix.range()),
                Err(source) => {
                    warn!(prefix = text, error = %source, "skipping invalid private prefix");
                    rejected.push(RejectedPrefix {
                        input: text.to_string(),
                        source,
                    });
                }
            }
        }

        (Self { private_ranges }, rejected)
    }

    /// Configured private ranges
    pub fn private_ranges(&self) -> &[AddressRange] {
        &self.private_ranges
    }

    /// Check if `addr` falls in any private range
    pub fn is_private(&self, addr: Address) -> bool {
        self.private_ranges.iter().any(|range| range.contains(addr))
    }

    /// Check if `addr` is in `127.0.0.0/8`
    pub fn is_host_local(&self, addr: Address) -> bool {
        HOST_LOCAL_RANGE.contains(addr)
    }

    /// Check if `addr` is in `169.254.0.0/16`
    pub fn is_link_local(&self, addr: Address) -> bool {
        LINK_LOCAL_RANGE.contains(addr)
    }

    /// Check if `addr` is in `224.0.0.0/4`
    pub fn is_multicast(&self, addr: Address) -> bool {
        MULTICAST_RANGE.contains(addr)
    }

    /// Check if `addr` is none of private, host-local, link-local or multicast
    pub fn is_exit_address(&self, addr: Address) -> bool {
        !self.is_private(addr)
            && !self.is_host_local(addr)
            && !self.is_link_local(addr)
            && !self.is_multicast(addr)
    }

    /// Classify `addr`. Reserved blocks take precedence over private ranges.
    pub fn classify(&self, addr: Address) -> AddressClass {
        if self.is_host_local(addr) {
            AddressClass::HostLocal
        } else if self.is_link_local(addr) {
            AddressClass::LinkLocal
        } else if self.is_multicast(addr) {
            AddressClass::Multicast
        } else if self.is_private(addr) {
            AddressClass::Private
        } else {
            AddressClass::Exit
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        let (config, _) = Self::with_private_prefixes(DEFAULT_PRIVATE_PREFIXES);
        config
    }
}
