use iprange_cidr::Address;
use iprange_classify::{registry, AddressClass, ClassificationConfig, DEFAULT_PRIVATE_PREFIXES};
use std::thread;

fn addr(text: &str) -> Address {
    Address::parse(text).expect("valid address")
}

// The registry is shared by every test in this binary, so all mutation
// happens inside this one test.
#[test]
fn test_registry_lifecycle() {
    // Defaults
    assert!(registry::is_private(addr("10.1.2.3")));
    assert!(!registry::is_private(addr("8.8.8.8")));
    assert!(registry::is_exit_address(addr("8.8.8.8")));
    assert!(registry::is_host_local(addr("127.0.0.53")));
    assert!(registry::is_link_local(addr("169.254.169.254")));
    assert!(registry::is_multicast(addr("224.0.0.1")));
    assert_eq!(registry::private_ranges().len(), 3);

    // Wholesale replacement with one bad entry
    let rejected = registry::set_private_prefixes(["100.64.0.0/10", "192.168.0.0/33"]);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].input, "192.168.0.0/33");

    assert_eq!(registry::private_ranges().len(), 1);
    assert!(registry::is_private(addr("100.64.0.1")));
    assert!(!registry::is_private(addr("10.1.2.3")));
    assert!(!registry::is_private(addr("192.168.1.1")));
    assert!(registry::is_exit_address(addr("10.1.2.3")));
    assert!(!registry::is_exit_address(addr("100.127.255.255")));

    // Readers on other threads see the installed config
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let probe = Address(0x6440_0000 + i);
                registry::is_private(probe) && !registry::is_exit_address(probe)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("reader thread panicked"));
    }

    // Empty list: nothing is private
    let rejected = registry::set_private_prefixes(Vec::<String>::new());
    assert!(rejected.is_empty());
    assert!(registry::private_ranges().is_empty());
    assert!(registry::is_exit_address(addr("10.0.0.1")));

    // Restore defaults through an explicit config
    registry::replace(ClassificationConfig::default());
    assert_eq!(registry::snapshot(), ClassificationConfig::default());
    assert_eq!(
        registry::snapshot().classify(addr("172.16.0.1")),
        AddressClass::Private
    );

    let rejected = registry::set_private_prefixes(DEFAULT_PRIVATE_PREFIXES);
    assert!(rejected.is_empty());
    assert_eq!(registry::private_ranges(), ClassificationConfig::default().private_ranges());
}
