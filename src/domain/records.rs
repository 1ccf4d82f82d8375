// Copyright (c) 2025 - Cowboy AI, Inc.
//! Normalized Inventory Records
//!
//! The flat, downstream-ready representation of one VM or hypervisor after
//! every resolution step. Records are built once per collection pass and
//! never mutated afterwards; emitters read them through
//! [`NormalizedRecord::attribute`] to project the subset they need.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::datastore::{DatastoreUsageRecord, DiskRecord};
use super::network::NetworkInterfaceRecord;
use super::record_class::RecordClass;

/// Common read access shared by every normalized record
pub trait NormalizedRecord: Send + Sync {
    /// Provider reference id, unique within one collection pass
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Record class this record is emitted as
    fn class(&self) -> RecordClass;

    /// Scalar value of an attribute code, `None` if the code is unknown
    ///
    /// A configured custom field with the same code as a built-in attribute
    /// replaces the built-in value.
    fn attribute(&self, code: &str) -> Option<String>;
}

fn render_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Flattened virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachineRecord {
    pub id: String,
    pub name: String,
    pub org_id: String,

    /// IPv4 management address, empty when only IPv6 was reported
    pub management_ip: String,

    pub cpu: Option<i64>,

    /// Memory in MB
    pub ram: Option<i64>,

    pub os_family_id: String,
    pub os_version_id: String,
    pub datastores: Vec<DatastoreUsageRecord>,
    pub disks: Vec<DiskRecord>,
    pub interfaces: Vec<NetworkInterfaceRecord>,

    /// Farm name when the running host is clustered, host name otherwise
    pub virtual_host_id: String,

    pub description: String,

    /// Hardware UUID as reported (lower-cased on emission)
    pub uuid: String,

    pub power_state: String,
    pub vcenter: String,

    /// `CA-<label>` keyed custom attributes
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

impl NormalizedRecord for VirtualMachineRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> RecordClass {
        RecordClass::VirtualMachine
    }

    fn attribute(&self, code: &str) -> Option<String> {
        if let Some(value) = self.custom_attributes.get(code) {
            return Some(value.clone());
        }
        let value = match code {
            "id" | "primary_key" => self.id.clone(),
            "name" => self.name.clone(),
            "org_id" => self.org_id.clone(),
            "managementip" => self.management_ip.clone(),
            "cpu" => render_count(self.cpu),
            "ram" => render_count(self.ram),
            "osfamily_id" => self.os_family_id.clone(),
            "osversion_id" => self.os_version_id.clone(),
            "virtualhost_id" => self.virtual_host_id.clone(),
            "description" => self.description.clone(),
            "S_UUID" => self.uuid.clone(),
            "powerState" => self.power_state.clone(),
            "vcenter" => self.vcenter.clone(),
            _ => return None,
        };
        Some(value)
    }
}

/// Flattened hypervisor host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypervisorRecord {
    pub id: String,
    pub name: String,
    pub org_id: String,
    pub brand_id: String,
    pub model_id: String,

    /// CPU packages
    pub cpu: Option<i64>,

    /// Memory in MB
    pub ram: Option<i64>,

    pub os_family_id: String,
    pub os_version_id: String,
    pub status: String,
    pub farm_id: String,
    pub server_id: String,
    pub serial_number: String,
    pub management_ip: String,
    pub uuid: String,

    /// Evaluated custom fields; server-class fields carry the
    /// `server-custom-` prefix
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

impl NormalizedRecord for HypervisorRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> RecordClass {
        RecordClass::Hypervisor
    }

    fn attribute(&self, code: &str) -> Option<String> {
        if let Some(value) = self.custom_fields.get(code) {
            return Some(value.clone());
        }
        let value = match code {
            "id" | "primary_key" => self.id.clone(),
            "name" => self.name.clone(),
            "org_id" => self.org_id.clone(),
            "brand_id" => self.brand_id.clone(),
            "model_id" => self.model_id.clone(),
            "cpu" => render_count(self.cpu),
            "ram" => render_count(self.ram),
            "osfamily_id" => self.os_family_id.clone(),
            "osversion_id" => self.os_version_id.clone(),
            "status" => self.status.clone(),
            "farm_id" => self.farm_id.clone(),
            "server_id" => self.server_id.clone(),
            "serialnumber" => self.serial_number.clone(),
            "managementip" => self.management_ip.clone(),
            "S_UUID" => self.uuid.clone(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hypervisor() -> HypervisorRecord {
        HypervisorRecord {
            id: "host-10".to_string(),
            name: "esx01.example.com".to_string(),
            org_id: "1".to_string(),
            brand_id: "Dell".to_string(),
            model_id: "PowerEdge R740".to_string(),
            cpu: Some(2),
            ram: Some(393_216),
            os_family_id: "ESXi".to_string(),
            os_version_id: "VMware ESXi 7.0.3".to_string(),
            status: "production".to_string(),
            farm_id: "PROD".to_string(),
            server_id: "esx01.example.com".to_string(),
            serial_number: "ABC1234".to_string(),
            management_ip: "10.0.0.11".to_string(),
            uuid: "4C4C4544-0042".to_string(),
            custom_fields: BTreeMap::from([
                ("asset_number".to_string(), "A-1".to_string()),
                ("server-custom-rack".to_string(), "R12".to_string()),
            ]),
        }
    }

    #[test]
    fn test_hypervisor_attribute_projection() {
        let record = hypervisor();
        assert_eq!(record.attribute("primary_key").as_deref(), Some("host-10"));
        assert_eq!(record.attribute("cpu").as_deref(), Some("2"));
        assert_eq!(record.attribute("asset_number").as_deref(), Some("A-1"));
        assert_eq!(record.attribute("server-custom-rack").as_deref(), Some("R12"));
        assert_eq!(record.attribute("missing"), None);
        assert_eq!(record.class(), RecordClass::Hypervisor);
    }

    #[test]
    fn test_custom_field_replaces_builtin_attribute() {
        let mut record = hypervisor();
        record.custom_fields.insert("status".to_string(), "green".to_string());
        record.custom_fields.insert("farm_id".to_string(), String::new());
        assert_eq!(record.attribute("status").as_deref(), Some("green"));
        assert_eq!(record.attribute("farm_id").as_deref(), Some(""));
        assert_eq!(record.attribute("name").as_deref(), Some("esx01.example.com"));
    }

    #[test]
    fn test_missing_counts_render_empty() {
        let mut record = hypervisor();
        record.ram = None;
        assert_eq!(record.attribute("ram").as_deref(), Some(""));
    }
}
