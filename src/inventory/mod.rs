// Copyright (c) 2025 - Cowboy AI, Inc.

//! Inventory Provider Seam
//!
//! The wire-level vSphere client lives outside this crate. The normalization
//! engine only sees it through [`InventoryProvider`], which returns raw,
//! partially-populated managed object graphs for one object kind at a time.
//!
//! # Architecture
//!
//! ```text
//! vSphere API ──client──> InventoryProvider::find_all(kind, properties)
//!                                   │
//!                                   ▼
//!                         Vec<RawInventoryObject>  (opaque JSON graphs)
//!                                   │ decode::<T>()
//!                                   ▼
//!                  typed views (VirtualMachine, HostSystem, ...)
//! ```
//!
//! Typed views are decoded on demand; the raw graph is kept around for
//! custom field expressions that reach into properties the typed views do
//! not model.

pub mod model;
pub mod snapshot;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::errors::InventoryResult;

pub use snapshot::SnapshotProvider;

/// Managed object kinds the collector asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManagedObjectKind {
    VirtualMachine,
    HostSystem,
    DistributedVirtualSwitch,
    Datastore,
    ClusterComputeResource,
}

impl ManagedObjectKind {
    /// vSphere type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VirtualMachine => "VirtualMachine",
            Self::HostSystem => "HostSystem",
            Self::DistributedVirtualSwitch => "DistributedVirtualSwitch",
            Self::Datastore => "Datastore",
            Self::ClusterComputeResource => "ClusterComputeResource",
        }
    }

    /// Property subtrees the collector needs for this kind
    pub fn default_properties(&self) -> PropertySet {
        match self {
            Self::VirtualMachine => PropertySet::paths([
                "config",
                "runtime",
                "guest",
                "network",
                "storage",
                "availableField",
                "customValue",
            ]),
            Self::HostSystem => PropertySet::paths(["hardware", "summary", "runtime", "config"]),
            Self::DistributedVirtualSwitch => PropertySet::paths(["portgroup", "summary", "uuid"]),
            Self::Datastore => PropertySet::All,
            Self::ClusterComputeResource => PropertySet::paths(["host"]),
        }
    }
}

impl fmt::Display for ManagedObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested property subtrees
///
/// `name` is always returned, whatever the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySet {
    /// Every property
    All,
    /// Only these top-level properties
    Paths(Vec<String>),
}

impl PropertySet {
    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }

    /// Whether a top-level property belongs to the set
    pub fn includes(&self, property: &str) -> bool {
        match self {
            Self::All => true,
            Self::Paths(paths) => property == "name" || paths.iter().any(|p| p == property),
        }
    }
}

/// One managed object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInventoryObject {
    /// Opaque provider reference (e.g. `vm-1234`), stable across calls
    #[serde(rename = "_ref")]
    pub reference_id: String,

    /// Populated properties; anything may be missing
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl RawInventoryObject {
    pub fn new(reference_id: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            reference_id: reference_id.into(),
            properties,
        }
    }

    /// Object name, empty when not populated
    pub fn name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The property graph as a JSON object
    pub fn graph(&self) -> Value {
        Value::Object(self.properties.clone())
    }

    /// Decode a typed view of this object
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.graph())
    }

    /// Copy restricted to a property set
    pub fn restricted_to(&self, properties: &PropertySet) -> Self {
        Self {
            reference_id: self.reference_id.clone(),
            properties: self
                .properties
                .iter()
                .filter(|(key, _)| properties.includes(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

/// Source of managed object graphs
///
/// Implementations own transport, authentication and retries. The collector
/// calls `find_all` once per kind per collection pass.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Fetch every object of `kind` with at least `properties` populated
    async fn find_all(
        &self,
        kind: ManagedObjectKind,
        properties: &PropertySet,
    ) -> InventoryResult<Vec<RawInventoryObject>>;

    /// Human-readable provider description for logs
    fn describe(&self) -> String {
        "inventory provider".to_string()
    }
}

#[async_trait]
impl<T: InventoryProvider + ?Sized> InventoryProvider for Arc<T> {
    async fn find_all(
        &self,
        kind: ManagedObjectKind,
        properties: &PropertySet,
    ) -> InventoryResult<Vec<RawInventoryObject>> {
        (**self).find_all(kind, properties).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
