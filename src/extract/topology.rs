// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Topology Resolution
//!
//! vSphere reports the network of a virtual NIC in four different shapes
//! depending on the switch type behind it. [`NetworkBacking`] closes that set
//! so resolution is an exhaustive match instead of probing optional fields.
//!
//! # Precedence
//!
//! When a backing carries several shapes at once the first present wins:
//! `network` → `opaqueNetworkId` → `deviceName` → `port`.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::MacAddress;
use crate::inventory::model::{DistributedVirtualSwitch, EthernetCardBacking, VirtualDevice};

/// Distributed portgroup key → portgroup name
pub type PortgroupIndex = HashMap<String, String>;

/// Canonical MAC key → network name, for one VM
pub type MacNetworkTable = HashMap<String, String>;

/// Classified ethernet card backing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkBacking {
    /// Standard network reference
    Network { name: String },
    /// NSX opaque network
    OpaqueNetwork { id: String },
    /// Standard switch portgroup by device name
    DeviceName { name: String },
    /// Distributed switch port, resolved through the portgroup index
    DistributedPort { portgroup_key: String },
    /// Nothing usable reported
    Unknown,
}

impl NetworkBacking {
    /// Classify a raw backing
    pub fn classify(backing: Option<&EthernetCardBacking>) -> Self {
        let Some(backing) = backing else {
            return Self::Unknown;
        };

        if let Some(name) = backing.network.as_ref().and_then(|n| n.name.clone()) {
            return Self::Network { name };
        }
        if let Some(id) = backing.opaque_network_id.clone() {
            return Self::OpaqueNetwork { id };
        }
        if let Some(name) = backing.device_name.clone() {
            return Self::DeviceName { name };
        }
        if let Some(portgroup_key) = backing.port.as_ref().and_then(|p| p.portgroup_key.clone()) {
            return Self::DistributedPort { portgroup_key };
        }
        Self::Unknown
    }
}

/// Index every portgroup of every distributed switch by key
pub fn build_portgroup_index(switches: &[DistributedVirtualSwitch]) -> PortgroupIndex {
    if switches.is_empty() {
        debug!("No distributed virtual switches reported, portgroup index is empty");
        return PortgroupIndex::new();
    }

    let index: PortgroupIndex = switches
        .iter()
        .flat_map(|switch| switch.portgroup.iter())
        .filter_map(|pg| Some((pg.key.clone()?, pg.name.clone().unwrap_or_default())))
        .collect();

    debug!(
        "Indexed {} portgroups across {} distributed switches",
        index.len(),
        switches.len()
    );
    index
}

/// Network name a backing points at, `""` when it cannot be resolved
pub fn resolve_device_network(backing: &NetworkBacking, index: &PortgroupIndex) -> String {
    match backing {
        NetworkBacking::Network { name } | NetworkBacking::DeviceName { name } => name.clone(),
        NetworkBacking::OpaqueNetwork { id } => id.clone(),
        NetworkBacking::DistributedPort { portgroup_key } => match index.get(portgroup_key) {
            Some(name) => name.clone(),
            None => {
                warn!("Unknown distributed portgroup key '{}'", portgroup_key);
                String::new()
            }
        },
        NetworkBacking::Unknown => {
            debug!("Ethernet card backing carries no network reference");
            String::new()
        }
    }
}

/// MAC → network table for one VM's virtual hardware
///
/// Devices other than ethernet cards are ignored. Cards without a MAC are
/// skipped since nothing can join on them.
pub fn build_mac_to_network(devices: &[VirtualDevice], index: &PortgroupIndex) -> MacNetworkTable {
    let mut table = MacNetworkTable::new();
    for card in devices.iter().filter_map(VirtualDevice::as_ethernet_card) {
        let Some(mac) = card.mac_address.as_deref() else {
            continue;
        };
        let backing = NetworkBacking::classify(card.backing.as_ref());
        table.insert(
            MacAddress::canonical_key(mac),
            resolve_device_network(&backing, index),
        );
    }
    table
}
