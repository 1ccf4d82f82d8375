// Copyright (c) 2025 - Cowboy AI, Inc.

//! Network-facing adapters
//!
//! Adapters that reach the vCenter endpoint directly. The inventory itself
//! is fetched through [`InventoryProvider`](crate::inventory::InventoryProvider)
//! implementations; these adapters only guard the run.

#[cfg(feature = "preflight")]
pub mod preflight;

#[cfg(feature = "preflight")]
pub use preflight::{check_tls_connection, probe_host, CONNECT_TIMEOUT};
