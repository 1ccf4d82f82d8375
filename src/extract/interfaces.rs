// Copyright (c) 2025 - Cowboy AI, Inc.
//! Guest Interface Extraction
//!
//! Only IPv4 addresses become interface records. IPv6 addresses are dropped
//! because the downstream database has no column for them.

use std::net::Ipv4Addr;
use tracing::{debug, warn};

use super::topology::MacNetworkTable;
use crate::domain::{is_ipv6_literal, subnet_mask, MacAddress, NetworkInterfaceRecord};
use crate::inventory::model::GuestNicInfo;

const MAX_PREFIX_LENGTH: u32 = 32;

/// One record per IPv4 address, in NIC order then address order
pub fn extract_interfaces(
    nics: &[GuestNicInfo],
    mac_to_network: &MacNetworkTable,
) -> Vec<NetworkInterfaceRecord> {
    let mut records = Vec::new();

    for nic in nics {
        let mac = nic.mac_address.clone().unwrap_or_default();
        let network = mac_to_network
            .get(&MacAddress::canonical_key(&mac))
            .cloned()
            .unwrap_or_default();

        let addresses = nic
            .ip_config
            .as_ref()
            .map(|c| c.ip_address.as_slice())
            .unwrap_or_default();

        for entry in addresses {
            let Some(address) = entry.ip_address.as_deref() else {
                continue;
            };
            if is_ipv6_literal(address) {
                debug!("Skipping IPv6 address {} on {}", address, mac);
                continue;
            }
            let ip: Ipv4Addr = match address.parse() {
                Ok(ip) => ip,
                Err(_) => {
                    warn!("Skipping unparseable IPv4 address '{}' on {}", address, mac);
                    continue;
                }
            };

            records.push(NetworkInterfaceRecord {
                ip,
                mac: mac.clone(),
                network: network.clone(),
                subnet_mask: mask_for(entry.prefix_length, address),
            });
        }
    }

    records
}

fn mask_for(prefix_length: Option<u32>, address: &str) -> Ipv4Addr {
    let mut prefix = prefix_length.unwrap_or(0);
    if prefix > MAX_PREFIX_LENGTH {
        warn!(
            "Prefix length {} on {} exceeds {}, clamping",
            prefix, address, MAX_PREFIX_LENGTH
        );
        prefix = MAX_PREFIX_LENGTH;
    }
    subnet_mask(prefix).unwrap_or(Ipv4Addr::BROADCAST)
}

/// Management IP for a VM
///
/// An IPv6 primary address is replaced by the first IPv4 interface, or
/// cleared when there is none. A missing primary address stays empty.
pub fn reconcile_management_ip(primary: Option<&str>, interfaces: &[NetworkInterfaceRecord]) -> String {
    let primary = primary.unwrap_or_default();
    if !is_ipv6_literal(primary) {
        return primary.to_string();
    }

    match interfaces.first() {
        Some(interface) => interface.ip.to_string(),
        None => {
            debug!("Only IPv6 management address {} reported, leaving it empty", primary);
            String::new()
        }
    }
}
