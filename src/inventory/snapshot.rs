// Copyright (c) 2025 - Cowboy AI, Inc.
//! Snapshot-backed Inventory Provider
//!
//! Serves a JSON inventory dump shaped as
//!
//! ```json
//! {
//!   "VirtualMachine": [ { "_ref": "vm-1", "name": "web01", ... } ],
//!   "HostSystem":     [ { "_ref": "host-1", "name": "esx01", ... } ]
//! }
//! ```
//!
//! Kinds absent from the document yield no objects. Used for offline runs
//! and as the deterministic provider in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::{InventoryProvider, ManagedObjectKind, PropertySet, RawInventoryObject};
use crate::errors::{InventoryError, InventoryResult};

/// In-memory inventory loaded from a JSON snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    source: String,
    objects: BTreeMap<ManagedObjectKind, Vec<RawInventoryObject>>,
}

impl SnapshotProvider {
    /// Load a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut provider = Self::from_str(&text)?;
        provider.source = path.display().to_string();
        info!(
            "Loaded inventory snapshot {} ({} objects)",
            provider.source,
            provider.len()
        );
        Ok(provider)
    }

    /// Parse a snapshot document
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> InventoryResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build from an already-parsed snapshot document
    pub fn from_value(value: Value) -> InventoryResult<Self> {
        let objects: BTreeMap<ManagedObjectKind, Vec<RawInventoryObject>> =
            serde_json::from_value(value)?;
        Ok(Self {
            source: "in-memory snapshot".to_string(),
            objects,
        })
    }

    /// Add objects of one kind
    pub fn with_objects(
        mut self,
        kind: ManagedObjectKind,
        objects: impl IntoIterator<Item = RawInventoryObject>,
    ) -> Self {
        self.objects.entry(kind).or_default().extend(objects);
        self
    }

    /// Total number of objects across all kinds
    pub fn len(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InventoryProvider for SnapshotProvider {
    async fn find_all(
        &self,
        kind: ManagedObjectKind,
        properties: &PropertySet,
    ) -> InventoryResult<Vec<RawInventoryObject>> {
        let objects = match self.objects.get(&kind) {
            Some(objects) => objects,
            None => {
                debug!("Snapshot {} holds no {} objects", self.source, kind);
                return Ok(Vec::new());
            }
        };

        Ok(objects
            .iter()
            .map(|object| object.restricted_to(properties))
            .collect())
    }

    fn describe(&self) -> String {
        self.source.clone()
    }
}

impl TryFrom<&str> for SnapshotProvider {
    type Error = InventoryError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::from_str(text)
    }
}
