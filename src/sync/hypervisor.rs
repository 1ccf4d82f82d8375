// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hypervisor Rows

use super::SyncRow;
use crate::domain::{HypervisorRecord, NormalizedRecord, RecordClass};
use crate::errors::InventoryResult;
use crate::service::{InventoryRepository, RecordCursor};

/// Fixed hypervisor columns, in emission order
const COLUMNS: [&str; 6] = ["primary_key", "name", "org_id", "status", "server_id", "farm_id"];

/// Pulls one hypervisor row at a time from a repository
///
/// Rows carry the fixed columns followed by every configured hypervisor
/// custom field. Server custom fields stay on the record for the server
/// collector and are not emitted here.
#[derive(Debug)]
pub struct HypervisorEmitter {
    cursor: RecordCursor<HypervisorRecord>,
    custom_codes: Vec<String>,
}

impl HypervisorEmitter {
    /// Open an emitter, collecting the inventory if the repository is cold
    pub async fn open(repository: &InventoryRepository) -> InventoryResult<Self> {
        Ok(Self {
            cursor: repository.hypervisors().await?,
            custom_codes: repository
                .settings()
                .custom_fields
                .codes(RecordClass::Hypervisor),
        })
    }

    /// Next row, `None` once every hypervisor was emitted
    pub fn fetch(&mut self) -> Option<SyncRow> {
        let record = self.cursor.fetch()?;
        let mut row = SyncRow::new();
        for code in COLUMNS.iter().copied().chain(self.custom_codes.iter().map(String::as_str)) {
            row.push(code, record.attribute(code).unwrap_or_default());
        }
        Some(row)
    }
}

impl Iterator for HypervisorEmitter {
    type Item = SyncRow;

    fn next(&mut self) -> Option<SyncRow> {
        self.fetch()
    }
}
