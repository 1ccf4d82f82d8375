// Copyright (c) 2025 - Cowboy AI, Inc.
//! vSphere inventory extraction and normalization
//!
//! Collects virtual machines and hypervisor hosts through an
//! [`InventoryProvider`], resolves their cross-references (networks,
//! datastores, clusters, custom metadata) and flattens them into records
//! ready for synchronization into an asset database.
//!
//! # Modules
//!
//! - [`inventory`] - provider seam, raw object graphs and typed views
//! - [`domain`] - value objects, mapping tables and normalized records
//! - [`extract`] - per-object extraction steps
//! - [`service`] - record builder and the caching repository
//! - [`sync`] - pull-style row emitters
//! - [`state_machine`] - collection lifecycle
//! - [`config`] - TOML configuration with environment overrides
//! - [`adapters`] - pre-flight endpoint probe

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod inventory;
pub mod service;
pub mod state_machine;
pub mod sync;

// Re-export commonly used types
pub use config::{CollectorConfig, CollectorSettings};
pub use errors::{InventoryError, InventoryResult};
pub use inventory::{InventoryProvider, ManagedObjectKind, PropertySet, RawInventoryObject, SnapshotProvider};
pub use service::{InventoryRepository, InventorySnapshot, RecordCursor};
pub use sync::{HypervisorEmitter, SyncRow, VirtualMachineEmitter};
