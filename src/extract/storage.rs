// Copyright (c) 2025 - Cowboy AI, Inc.
//! Datastore Usage Aggregation

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::{datastore_name_from_path, format_gib, DatastoreUsageRecord, DiskRecord, UNDEFINED_LUN};
use crate::inventory::model::{Datastore, GuestDiskInfo, VirtualDevice};

/// Datastore name → backing LUN disk name
pub type LunIndex = HashMap<String, String>;

/// Index the first VMFS extent of every datastore
///
/// NFS and vSAN datastores have no VMFS extent and stay out of the index.
pub fn build_lun_index(datastores: &[Datastore]) -> LunIndex {
    let index: LunIndex = datastores
        .iter()
        .filter_map(|ds| {
            let name = ds.name.clone()?;
            let disk = ds.first_extent_disk()?;
            Some((name, disk.to_string()))
        })
        .collect();

    debug!("Indexed {} of {} datastores by LUN", index.len(), datastores.len());
    index
}

/// Sum virtual disk capacity per datastore, in first-seen order
pub fn aggregate_usage(
    devices: &[VirtualDevice],
    lun_index: &LunIndex,
    decimal_separator: char,
) -> Vec<DatastoreUsageRecord> {
    let mut totals: Vec<(String, u64)> = Vec::new();

    for disk in devices.iter().filter_map(VirtualDevice::as_disk) {
        let file_name = disk
            .backing
            .as_ref()
            .and_then(|b| b.file_name.as_deref())
            .unwrap_or_default();

        let Some(name) = datastore_name_from_path(file_name) else {
            warn!("Skipping virtual disk without datastore path: '{}'", file_name);
            continue;
        };

        let capacity = u64::try_from(disk.capacity_in_kb.unwrap_or(0)).unwrap_or(0);
        match totals.iter_mut().find(|(seen, _)| seen == name) {
            Some((_, total)) => *total = total.saturating_add(capacity),
            None => totals.push((name.to_string(), capacity)),
        }
    }

    totals
        .into_iter()
        .map(|(name, kib)| DatastoreUsageRecord {
            lun_id: lun_index
                .get(&name)
                .cloned()
                .unwrap_or_else(|| UNDEFINED_LUN.to_string()),
            size_used: format_gib(kib, decimal_separator),
            name,
        })
        .collect()
}

/// Guest filesystem usage as reported by VMware Tools
pub fn extract_disks(disks: &[GuestDiskInfo]) -> Vec<DiskRecord> {
    disks
        .iter()
        .map(|disk| {
            let capacity = disk.capacity.unwrap_or(0);
            DiskRecord {
                path: disk.disk_path.clone().unwrap_or_default(),
                capacity,
                used: capacity.saturating_sub(disk.free_space.unwrap_or(0)),
            }
        })
        .collect()
}
