// Copyright (c) 2025 - Cowboy AI, Inc.
//! Extraction Steps
//!
//! Pure functions turning typed views of managed objects into the pieces of
//! a normalized record. Nothing here fails: unresolvable input is logged and
//! replaced by an empty or default value.
//!
//! - [`topology`] - portgroup index and per-VM MAC → network table
//! - [`interfaces`] - IPv4 interface records and management IP
//! - [`storage`] - LUN index and per-datastore usage
//! - [`custom_fields`] - `CA-` attributes and configured custom fields
//! - [`expression`] - field path parser and evaluator

pub mod custom_fields;
pub mod expression;
pub mod interfaces;
pub mod storage;
pub mod topology;

pub use custom_fields::{
    extract_custom_attributes, CustomFieldDefinition, CustomFieldSet, CUSTOM_ATTRIBUTE_PREFIX,
};
pub use expression::{render_scalar, ExpressionError, FieldExpression, PathSegment};
pub use interfaces::{extract_interfaces, reconcile_management_ip};
pub use storage::{aggregate_usage, build_lun_index, extract_disks, LunIndex};
pub use topology::{
    build_mac_to_network, build_portgroup_index, resolve_device_network, MacNetworkTable,
    NetworkBacking, PortgroupIndex,
};
