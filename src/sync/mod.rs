// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synchronization Emitters
//!
//! Pull-style projections of cached records into flat rows for the asset
//! database. Each emitter wraps a [`RecordCursor`](crate::service::RecordCursor)
//! and yields one [`SyncRow`] per `fetch()` until the cursor is exhausted.

mod hypervisor;
mod virtual_machine;

pub use hypervisor::HypervisorEmitter;
pub use virtual_machine::{checked_date, VirtualMachineEmitter, INVALID_DATE};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One flat row, columns in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRow {
    columns: Vec<(String, String)>,
}

impl SyncRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; a repeated column overwrites the earlier value in place
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `primary_key`, empty if absent
    pub fn primary_key(&self) -> &str {
        self.get("primary_key").unwrap_or_default()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for SyncRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
