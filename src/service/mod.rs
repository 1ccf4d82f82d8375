// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collection Service Layer
//!
//! Orchestrates one collection pass over an [`InventoryProvider`] and caches
//! the result for the emitters.
//!
//! # Architecture
//!
//! ```text
//! InventoryProvider
//!     ↓  switches, datastores, clusters
//! TopologyContext (portgroup index, LUN index, farms)
//!     ↓  VMs, hosts
//! RecordBuilder (one record per connected object)
//!     ↓
//! InventorySnapshot (cached in InventoryRepository)
//!     ↓
//! RecordCursor → sync emitters
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_vsphere_inventory::config::CollectorConfig;
//! use cim_vsphere_inventory::inventory::SnapshotProvider;
//! use cim_vsphere_inventory::service::InventoryRepository;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = CollectorConfig::load("collector.toml")?.settings()?;
//! let provider = SnapshotProvider::from_path("inventory.json")?;
//! let repository = InventoryRepository::new(Arc::new(provider), Arc::new(settings));
//!
//! let mut vms = repository.virtual_machines().await?;
//! while let Some(vm) = vms.fetch() {
//!     println!("{} on {}", vm.name, vm.virtual_host_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`InventoryProvider`]: crate::inventory::InventoryProvider

pub mod builder;
pub mod repository;

pub use builder::{RecordBuilder, TopologyContext};
pub use repository::{InventoryRepository, InventorySnapshot, RecordCursor};
