//! MAC address formatting
//!
//! Renders raw bytes as colon-separated lowercase hex pairs
//! (`"xx:xx:xx:xx:xx:xx"` for a full 6-byte hardware address).

/// Format bytes as `xx:xx:...` lowercase hex pairs.
///
/// # Examples
///
/// ```
/// use iprange_core::mac::format_mac;
///
/// assert_eq!(format_mac(&[0x02, 0x42, 0xac, 0x11, 0x00, 0x02]), "02:42:ac:11:00:02");
/// ```
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
