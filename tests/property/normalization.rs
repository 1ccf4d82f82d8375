// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Value Normalization
//!
//! Subnet masks, guest interface filtering and GiB formatting.

use cim_vsphere_inventory::domain::{format_gib, subnet_mask};
use cim_vsphere_inventory::extract::{extract_interfaces, reconcile_management_ip, MacNetworkTable};
use cim_vsphere_inventory::inventory::model::{GuestNicInfo, IpAddressEntry, NetIpConfigInfo};
use proptest::prelude::*;
use std::net::{Ipv4Addr, Ipv6Addr};

// ============================================================================
// Strategies
// ============================================================================

/// An address as a guest may report it: IPv4, IPv6 or garbage
fn arb_reported_address() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<u32>().prop_map(|bits| Ipv4Addr::from(bits).to_string()),
        any::<u128>().prop_map(|bits| Ipv6Addr::from(bits).to_string()),
        "[a-z0-9.]{0,12}",
    ]
}

fn arb_nic() -> impl Strategy<Value = GuestNicInfo> {
    (
        prop::collection::vec((arb_reported_address(), prop::option::of(0u32..64)), 0..5),
        "[0-9a-f]{2}(:[0-9a-f]{2}){5}",
    )
        .prop_map(|(addresses, mac)| GuestNicInfo {
            mac_address: Some(mac),
            network: None,
            ip_config: Some(NetIpConfigInfo {
                ip_address: addresses
                    .into_iter()
                    .map(|(ip, prefix)| IpAddressEntry {
                        ip_address: Some(ip),
                        prefix_length: prefix,
                    })
                    .collect(),
            }),
        })
}

// ============================================================================
// Subnet Masks
// ============================================================================

proptest! {
    /// A /n mask has exactly n leading one bits and nothing else
    #[test]
    fn prop_subnet_mask_has_prefix_bits(prefix in 0u32..=32) {
        let mask = u32::from(subnet_mask(prefix).unwrap());
        prop_assert_eq!(mask.count_ones(), prefix);
        prop_assert_eq!(mask.leading_ones(), prefix);
    }

    /// Prefixes over 32 are rejected
    #[test]
    fn prop_subnet_mask_rejects_long_prefixes(prefix in 33u32..) {
        prop_assert!(subnet_mask(prefix).is_err());
    }
}

// ============================================================================
// Interfaces
// ============================================================================

proptest! {
    /// No IPv6 address ever becomes an interface record, and every valid
    /// IPv4 address does
    #[test]
    fn prop_only_ipv4_addresses_are_emitted(nics in prop::collection::vec(arb_nic(), 0..4)) {
        let records = extract_interfaces(&nics, &MacNetworkTable::new());

        let expected: Vec<Ipv4Addr> = nics
            .iter()
            .flat_map(|nic| nic.ip_config.iter().flat_map(|c| c.ip_address.iter()))
            .filter_map(|entry| entry.ip_address.as_deref())
            .filter(|address| !address.contains(':'))
            .filter_map(|address| address.parse().ok())
            .collect();

        let emitted: Vec<Ipv4Addr> = records.iter().map(|r| r.ip).collect();
        prop_assert_eq!(emitted, expected);
    }

    /// Masks are always contiguous, clamped prefixes included
    #[test]
    fn prop_interface_masks_are_contiguous(nics in prop::collection::vec(arb_nic(), 0..4)) {
        for record in extract_interfaces(&nics, &MacNetworkTable::new()) {
            let mask = u32::from(record.subnet_mask);
            prop_assert_eq!(mask.leading_ones(), mask.count_ones());
        }
    }

    /// The management IP is never IPv6
    #[test]
    fn prop_management_ip_is_never_ipv6(
        primary in prop::option::of(arb_reported_address()),
        nics in prop::collection::vec(arb_nic(), 0..3),
    ) {
        let records = extract_interfaces(&nics, &MacNetworkTable::new());
        let ip = reconcile_management_ip(primary.as_deref(), &records);
        prop_assert!(!ip.contains(':'));
    }
}

// ============================================================================
// GiB Formatting
// ============================================================================

proptest! {
    /// Always two decimals after the separator
    #[test]
    fn prop_format_gib_has_two_decimals(kib in any::<u64>(), sep in prop_oneof![Just(','), Just('.')]) {
        let rendered = format_gib(kib, sep);
        let (whole, fraction) = rendered.split_once(sep).unwrap();
        prop_assert!(whole.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(fraction.len(), 2);
    }

    /// Larger sizes never render smaller
    #[test]
    fn prop_format_gib_is_monotonic(a in 0u64..1 << 50, b in 0u64..1 << 50) {
        let value = |kib: u64| format_gib(kib, '.').parse::<f64>().unwrap();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(value(low) <= value(high));
    }

    /// Rounding error is at most half a hundredth
    #[test]
    fn prop_format_gib_rounds_to_nearest(kib in 0u64..1 << 40) {
        let rendered = format_gib(kib, '.').parse::<f64>().unwrap();
        let exact = kib as f64 / 1_048_576.0;
        prop_assert!((rendered - exact).abs() <= 0.005 + 1e-9);
    }
}
