// Copyright (c) 2025 - Cowboy AI, Inc.
//! Virtual Machine Rows

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::SyncRow;
use crate::config::{AttributeField, AttributeFormat};
use crate::domain::{NormalizedRecord, RecordClass, VirtualMachineRecord};
use crate::errors::InventoryResult;
use crate::service::{InventoryRepository, RecordCursor};

/// Emitted for date attributes that are missing or not a real `YYYY-MM-DD` date
pub const INVALID_DATE: &str = "0000-00-00";

const STATUS: &str = "production";

fn date_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"))
}

/// The value if it is a valid calendar date, [`INVALID_DATE`] otherwise
pub fn checked_date(value: &str) -> String {
    let valid = date_shape().is_match(value)
        && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if valid {
        value.to_string()
    } else {
        INVALID_DATE.to_string()
    }
}

fn logical_volumes(record: &VirtualMachineRecord) -> String {
    record
        .datastores
        .iter()
        .map(|ds| {
            format!(
                "virtual_volume_name:{};volume_id->lun_id:{};size_used:{}",
                ds.name, ds.lun_id, ds.size_used
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Pulls one VM row at a time from a repository
#[derive(Debug)]
pub struct VirtualMachineEmitter {
    cursor: RecordCursor<VirtualMachineRecord>,
    attribute_fields: Vec<AttributeField>,
    custom_codes: Vec<String>,
}

impl VirtualMachineEmitter {
    /// Open an emitter, collecting the inventory if the repository is cold
    pub async fn open(repository: &InventoryRepository) -> InventoryResult<Self> {
        let settings = repository.settings();
        Ok(Self {
            cursor: repository.virtual_machines().await?,
            attribute_fields: settings.attribute_fields.clone(),
            custom_codes: settings.custom_fields.codes(RecordClass::VirtualMachine),
        })
    }

    /// Next row, `None` once every VM was emitted
    pub fn fetch(&mut self) -> Option<SyncRow> {
        let record = self.cursor.fetch()?;
        Some(self.project(&record))
    }

    fn project(&self, record: &VirtualMachineRecord) -> SyncRow {
        let mut row = SyncRow::new();
        row.push("primary_key", record.id.as_str());
        row.push("name", record.name.as_str());
        row.push("status", STATUS);
        row.push("org_id", record.org_id.as_str());
        row.push("ram", record.ram.map(|r| r.to_string()).unwrap_or_default());
        row.push("cpu", record.cpu.unwrap_or(0).to_string());
        row.push("managementip", record.management_ip.as_str());
        row.push("osfamily_id", record.os_family_id.as_str());
        row.push("osversion_id", record.os_version_id.as_str());
        row.push("logicalvolumes_list", logical_volumes(record));
        row.push("virtualhost_id", record.virtual_host_id.as_str());
        row.push("description", record.description.replace(['\r', '\n'], " "));
        row.push("S_UUID", record.uuid.to_lowercase());
        row.push("power_status", record.power_state.as_str());
        row.push("vcenter", record.vcenter.as_str());

        for field in &self.attribute_fields {
            let value = record.attribute(&field.attribute).unwrap_or_default();
            let value = match field.format {
                AttributeFormat::Text => value,
                AttributeFormat::Date => checked_date(&value),
            };
            row.push(field.code.as_str(), value);
        }
        for code in &self.custom_codes {
            row.push(code.as_str(), record.attribute(code).unwrap_or_default());
        }
        row
    }
}

impl Iterator for VirtualMachineEmitter {
    type Item = SyncRow;

    fn next(&mut self) -> Option<SyncRow> {
        self.fetch()
    }
}
