// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Repository
//!
//! One repository owns one collection pass. The first read triggers the
//! pass; every later read is served from the cached snapshot, so the VM and
//! hypervisor emitters share a single round of provider calls.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──Begin──> Collecting ──Complete──> Cached
//!       ^                      │
//!       └────────Abort─────────┘   (provider failure)
//! ```
//!
//! The transition out of `Uninitialized` and the pass itself run under an
//! async mutex, so concurrent readers wait for the pass in flight instead of
//! starting another one.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::builder::{RecordBuilder, TopologyContext};
use crate::config::CollectorSettings;
use crate::domain::{FarmMembership, HypervisorRecord, VirtualMachineRecord};
use crate::errors::InventoryResult;
use crate::extract::{build_lun_index, build_portgroup_index};
use crate::inventory::model::{ClusterComputeResource, Datastore, DistributedVirtualSwitch};
use crate::inventory::{InventoryProvider, ManagedObjectKind, RawInventoryObject};
use crate::state_machine::{
    CollectionInput, CollectionState, StateMachineWithHistory, Transition,
};

/// Result of one collection pass
#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    pub run_id: Uuid,
    pub collected_at: DateTime<Utc>,
    pub virtual_machines: Vec<VirtualMachineRecord>,
    pub hypervisors: Vec<HypervisorRecord>,
    pub farms: Vec<FarmMembership>,
}

fn vm_records(snapshot: &InventorySnapshot) -> &[VirtualMachineRecord] {
    &snapshot.virtual_machines
}

fn hypervisor_records(snapshot: &InventorySnapshot) -> &[HypervisorRecord] {
    &snapshot.hypervisors
}

/// Sequential, non-rewindable reader over one record list of a snapshot
#[derive(Clone)]
pub struct RecordCursor<T> {
    snapshot: Arc<InventorySnapshot>,
    select: fn(&InventorySnapshot) -> &[T],
    position: usize,
}

impl<T: Clone> RecordCursor<T> {
    fn new(snapshot: Arc<InventorySnapshot>, select: fn(&InventorySnapshot) -> &[T]) -> Self {
        Self {
            snapshot,
            select,
            position: 0,
        }
    }

    /// Next record, `None` once exhausted
    pub fn fetch(&mut self) -> Option<T> {
        let record = (self.select)(&self.snapshot).get(self.position)?.clone();
        self.position += 1;
        Some(record)
    }

    /// Records not fetched yet
    pub fn remaining(&self) -> usize {
        (self.select)(&self.snapshot).len().saturating_sub(self.position)
    }

    /// Snapshot the cursor reads from
    pub fn snapshot(&self) -> &Arc<InventorySnapshot> {
        &self.snapshot
    }
}

impl<T> fmt::Debug for RecordCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCursor")
            .field("run_id", &self.snapshot.run_id)
            .field("position", &self.position)
            .finish()
    }
}

impl<T: Clone> Iterator for RecordCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.fetch()
    }
}

struct RepositoryState {
    lifecycle: StateMachineWithHistory<CollectionState>,
    snapshot: Option<Arc<InventorySnapshot>>,
}

/// Per-run inventory cache in front of an [`InventoryProvider`]
pub struct InventoryRepository {
    provider: Arc<dyn InventoryProvider>,
    settings: Arc<CollectorSettings>,
    state: Mutex<RepositoryState>,
}

impl InventoryRepository {
    pub fn new(provider: Arc<dyn InventoryProvider>, settings: Arc<CollectorSettings>) -> Self {
        Self {
            provider,
            settings,
            state: Mutex::new(RepositoryState {
                lifecycle: StateMachineWithHistory::new(CollectionState::Uninitialized),
                snapshot: None,
            }),
        }
    }

    pub fn settings(&self) -> &Arc<CollectorSettings> {
        &self.settings
    }

    /// Current lifecycle state
    pub async fn state(&self) -> CollectionState {
        *self.state.lock().await.lifecycle.current_state()
    }

    /// Lifecycle transitions so far
    pub async fn history(&self) -> Vec<Transition<CollectionState, CollectionInput>> {
        self.state.lock().await.lifecycle.get_history().to_vec()
    }

    /// Cursor over the collected VM records
    pub async fn virtual_machines(&self) -> InventoryResult<RecordCursor<VirtualMachineRecord>> {
        Ok(RecordCursor::new(self.snapshot().await?, vm_records))
    }

    /// Cursor over the collected hypervisor records
    pub async fn hypervisors(&self) -> InventoryResult<RecordCursor<HypervisorRecord>> {
        Ok(RecordCursor::new(self.snapshot().await?, hypervisor_records))
    }

    /// The cached snapshot, collecting it first if needed
    pub async fn snapshot(&self) -> InventoryResult<Arc<InventorySnapshot>> {
        let mut state = self.state.lock().await;
        if let Some(snapshot) = &state.snapshot {
            debug!("Serving cached inventory snapshot {}", snapshot.run_id);
            return Ok(Arc::clone(snapshot));
        }

        state
            .lifecycle
            .transition_with_history(CollectionInput::Begin, Utc::now())?;

        match self.collect(Uuid::now_v7()).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                state
                    .lifecycle
                    .transition_with_history(CollectionInput::Complete, Utc::now())?;
                state.snapshot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                error!("Inventory collection from {} failed: {}", self.provider.describe(), e);
                state
                    .lifecycle
                    .transition_with_history(CollectionInput::Abort, Utc::now())?;
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self), fields(provider = %self.provider.describe()))]
    async fn collect(&self, run_id: Uuid) -> InventoryResult<InventorySnapshot> {
        info!("Starting inventory collection");

        let switches: Vec<DistributedVirtualSwitch> =
            self.fetch_typed(ManagedObjectKind::DistributedVirtualSwitch).await?;
        let datastores: Vec<Datastore> = self.fetch_typed(ManagedObjectKind::Datastore).await?;
        let clusters: Vec<ClusterComputeResource> =
            self.fetch_typed(ManagedObjectKind::ClusterComputeResource).await?;

        let farms: Vec<FarmMembership> = clusters
            .into_iter()
            .map(|cluster| {
                FarmMembership::new(
                    cluster.name.unwrap_or_default(),
                    cluster.host.into_iter().filter_map(|h| h.name).collect(),
                )
            })
            .collect();

        let builder = RecordBuilder::new(
            Arc::clone(&self.settings),
            TopologyContext {
                portgroups: build_portgroup_index(&switches),
                luns: build_lun_index(&datastores),
                farms,
            },
        );

        let vms = self.fetch(ManagedObjectKind::VirtualMachine).await?;
        let virtual_machines: Vec<VirtualMachineRecord> = unique_by_reference(&vms)
            .filter_map(|raw| builder.build_virtual_machine(raw))
            .collect();

        let hosts = self.fetch(ManagedObjectKind::HostSystem).await?;
        let hypervisors: Vec<HypervisorRecord> = unique_by_reference(&hosts)
            .filter_map(|raw| builder.build_hypervisor(raw))
            .collect();

        info!(
            "Collected {} of {} VMs and {} of {} hypervisors",
            virtual_machines.len(),
            vms.len(),
            hypervisors.len(),
            hosts.len()
        );

        Ok(InventorySnapshot {
            run_id,
            collected_at: Utc::now(),
            virtual_machines,
            hypervisors,
            farms: builder.topology().farms.clone(),
        })
    }

    async fn fetch(&self, kind: ManagedObjectKind) -> InventoryResult<Vec<RawInventoryObject>> {
        let objects = self
            .provider
            .find_all(kind, &kind.default_properties())
            .await?;
        debug!("Fetched {} {} objects", objects.len(), kind);
        Ok(objects)
    }

    async fn fetch_typed<T: DeserializeOwned>(&self, kind: ManagedObjectKind) -> InventoryResult<Vec<T>> {
        Ok(self
            .fetch(kind)
            .await?
            .iter()
            .filter_map(|raw| match raw.decode() {
                Ok(typed) => Some(typed),
                Err(e) => {
                    warn!("Skipping undecodable {} {}: {}", kind, raw.reference_id, e);
                    None
                }
            })
            .collect())
    }
}

/// Objects in provider order, later duplicates of a reference id dropped
fn unique_by_reference(objects: &[RawInventoryObject]) -> impl Iterator<Item = &RawInventoryObject> {
    let mut seen = HashSet::new();
    objects.iter().filter(move |raw| {
        let first = seen.insert(raw.reference_id.as_str());
        if !first {
            warn!("Skipping duplicate object reference {} ('{}')", raw.reference_id, raw.name());
        }
        first
    })
}
