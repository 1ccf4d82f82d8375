// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Models
//!
//! Value objects and records produced by the normalization engine. Nothing in
//! this module talks to vSphere; it only describes what a collection pass
//! produces and the pure rules used to produce it.
//!
//! # Value Objects
//!
//! - [`MappingTable`] - ordered `pattern;result` normalization rules
//! - [`MacAddress`] - canonical MAC join key
//! - [`NetworkInterfaceRecord`] - one IPv4 address on a guest NIC
//! - [`DatastoreUsageRecord`] / [`DiskRecord`] - storage usage
//! - [`FarmMembership`] - host grouping
//! - [`RecordClass`] - downstream record class taxonomy
//!
//! # Records
//!
//! - [`VirtualMachineRecord`] and [`HypervisorRecord`], read through
//!   [`NormalizedRecord`]

pub mod datastore;
pub mod farm;
pub mod mapping_table;
pub mod network;
pub mod record_class;
pub mod records;

pub use datastore::{
    datastore_name_from_path, format_gib, DatastoreUsageRecord, DiskRecord, UNDEFINED_LUN,
};
pub use farm::{resolve_farm, FarmMembership};
pub use mapping_table::{MappingRule, MappingRuleError, MappingTable};
pub use network::{is_ipv6_literal, subnet_mask, MacAddress, NetworkError, NetworkInterfaceRecord};
pub use record_class::RecordClass;
pub use records::{HypervisorRecord, NormalizedRecord, VirtualMachineRecord};
