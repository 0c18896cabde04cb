use iprange_cidr::{parse_prefix, Address, AddressRange, Prefix};
use iprange_core::{mask_to_len, masklen_to_mask};

fn addr(text: &str) -> Address {
    Address::parse(text).expect("valid address")
}

fn range(start: &str, end: &str) -> AddressRange {
    AddressRange::new(addr(start), addr(end))
}

#[test]
fn test_decompose_whole_24() {
    let matches = range("10.0.0.0", "10.0.0.255").to_mask_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(Address(matches[0].0), addr("10.0.0.0"));
    assert_eq!(mask_to_len(Address(matches[0].1)), 24);
}

#[test]
fn test_decompose_24_plus_25() {
    let blocks = range("10.0.0.0", "10.0.1.127").to_cidr_blocks();
    let rendered: Vec<String> = blocks.iter().map(|b| b.to_string()).collect();
    assert_eq!(rendered, vec!["10.0.0.0/24", "10.0.1.0/25"]);
}

#[test]
fn test_subtract_hole() {
    let result = range("192.168.1.10", "192.168.1.20")
        .subtract(&range("192.168.1.15", "192.168.1.17"));

    let remaining: Vec<String> = result.remaining.iter().map(|r| r.to_string()).collect();
    assert_eq!(remaining, vec!["192.168.1.10-192.168.1.14", "192.168.1.18-192.168.1.20"]);
    assert_eq!(
        result.overlap.map(|r| r.to_string()),
        Some("192.168.1.15-192.168.1.17".to_string())
    );
}

#[test]
fn test_prefix_notations_agree() {
    let by_len = parse_prefix("192.168.1.0/24").unwrap();
    let by_mask = parse_prefix("192.168.1.5/255.255.255.0").unwrap();
    assert_eq!(by_len, (addr("192.168.1.0"), 24));
    assert_eq!(by_mask, by_len);

    assert_eq!(
        Prefix::parse("192.168.1.0/24").unwrap(),
        Prefix::parse("192.168.1.5/255.255.255.0").unwrap()
    );
}

#[test]
fn test_mask_helpers() {
    assert_eq!(masklen_to_mask(24).unwrap().to_string(), "255.255.255.0");
    assert_eq!(mask_to_len(addr("255.255.255.0")), 24);
}

#[test]
fn test_carve_allocation_pool() {
    // Reserve the gateway and broadcast, then merge back a released block.
    let pool = Prefix::parse("10.20.0.0/22").unwrap().range();
    let after_gateway = pool.subtract(&AddressRange::single(addr("10.20.0.1")));
    assert_eq!(after_gateway.remaining.len(), 2);

    let upper = after_gateway.remaining[1];
    let usable = upper.subtract(&AddressRange::single(addr("10.20.3.255"))).remaining;
    assert_eq!(usable, vec![range("10.20.0.2", "10.20.3.254")]);

    let restored = usable[0]
        .merge(&AddressRange::single(addr("10.20.3.255")))
        .unwrap();
    assert_eq!(restored, range("10.20.0.2", "10.20.3.255"));

    let rendered: Vec<String> = restored.to_cidr_blocks().iter().map(|b| b.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "10.20.0.2/31",
            "10.20.0.4/30",
            "10.20.0.8/29",
            "10.20.0.16/28",
            "10.20.0.32/27",
            "10.20.0.64/26",
            "10.20.0.128/25",
            "10.20.1.0/24",
            "10.20.2.0/23",
        ]
    );
}
