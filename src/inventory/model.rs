// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed Views of vSphere Managed Objects
//!
//! Only the properties the normalization engine reads are modeled. Every
//! field is optional or defaulted: vSphere omits whole subtrees for
//! disconnected objects, objects without VMware Tools, and so on.
//! Property names follow the vSphere API (camelCase).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `{ "_ref": ..., "name": ... }` reference to another managed object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagedObjectName {
    #[serde(rename = "_ref", skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub name: Option<String>,
}

// ============================================================================
// VirtualMachine
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachine {
    pub name: Option<String>,
    pub config: Option<VirtualMachineConfigInfo>,
    pub runtime: Option<RuntimeInfo>,
    pub guest: Option<GuestInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub available_field: Vec<CustomFieldDef>,
    #[serde(deserialize_with = "null_as_default")]
    pub custom_value: Vec<CustomFieldValue>,
}

impl VirtualMachine {
    pub fn connection_state(&self) -> Option<&str> {
        self.runtime.as_ref()?.connection_state.as_deref()
    }

    pub fn devices(&self) -> &[VirtualDevice] {
        self.config
            .as_ref()
            .and_then(|c| c.hardware.as_ref())
            .map(|h| h.device.as_slice())
            .unwrap_or_default()
    }

    /// Guest OS name, preferring the VMware Tools report over the configured one
    pub fn guest_full_name(&self) -> &str {
        let from_tools = self
            .guest
            .as_ref()
            .and_then(|g| g.guest_full_name.as_deref())
            .unwrap_or_default();
        if !from_tools.is_empty() {
            return from_tools;
        }
        self.config
            .as_ref()
            .and_then(|c| c.guest_full_name.as_deref())
            .unwrap_or_default()
    }

    /// Name of the host the VM currently runs on
    pub fn host_name(&self) -> &str {
        self.runtime
            .as_ref()
            .and_then(|r| r.host.as_ref())
            .and_then(|h| h.name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineConfigInfo {
    pub annotation: Option<String>,
    pub uuid: Option<String>,
    pub guest_full_name: Option<String>,
    pub hardware: Option<VirtualHardware>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualHardware {
    #[serde(rename = "numCPU")]
    pub num_cpu: Option<i64>,

    #[serde(rename = "memoryMB")]
    pub memory_mb: Option<i64>,

    #[serde(deserialize_with = "lenient_devices")]
    pub device: Vec<VirtualDevice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeInfo {
    pub connection_state: Option<String>,
    pub power_state: Option<String>,
    pub host: Option<ManagedObjectName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInfo {
    pub guest_full_name: Option<String>,
    pub ip_address: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub net: Vec<GuestNicInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub disk: Vec<GuestDiskInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestNicInfo {
    pub mac_address: Option<String>,
    pub network: Option<String>,
    pub ip_config: Option<NetIpConfigInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetIpConfigInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub ip_address: Vec<IpAddressEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAddressEntry {
    pub ip_address: Option<String>,
    pub prefix_length: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestDiskInfo {
    pub disk_path: Option<String>,
    pub capacity: Option<i64>,
    pub free_space: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldDef {
    #[serde(deserialize_with = "null_as_default")]
    pub key: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldValue {
    #[serde(deserialize_with = "null_as_default")]
    pub key: i64,
    pub value: Option<String>,
}

// ============================================================================
// Virtual devices
// ============================================================================

/// Virtual hardware device, discriminated by its vSphere type name
///
/// Only ethernet cards and disks matter to the collector; everything else
/// (controllers, CD-ROMs, video cards, ...) decodes as `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "_typeName")]
pub enum VirtualDevice {
    VirtualE1000(VirtualEthernetCard),
    VirtualE1000e(VirtualEthernetCard),
    VirtualPCNet32(VirtualEthernetCard),
    VirtualVmxnet(VirtualEthernetCard),
    VirtualVmxnet2(VirtualEthernetCard),
    VirtualVmxnet3(VirtualEthernetCard),
    VirtualDisk(VirtualDisk),
    #[serde(other)]
    Other,
}

impl VirtualDevice {
    /// The ethernet card, if this device is one
    pub fn as_ethernet_card(&self) -> Option<&VirtualEthernetCard> {
        match self {
            Self::VirtualE1000(card)
            | Self::VirtualE1000e(card)
            | Self::VirtualPCNet32(card)
            | Self::VirtualVmxnet(card)
            | Self::VirtualVmxnet2(card)
            | Self::VirtualVmxnet3(card) => Some(card),
            Self::VirtualDisk(_) | Self::Other => None,
        }
    }

    pub fn as_disk(&self) -> Option<&VirtualDisk> {
        match self {
            Self::VirtualDisk(disk) => Some(disk),
            _ => None,
        }
    }
}

/// `null` decodes like a missing property
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode each device on its own so one unexpected entry does not discard
/// the VM's whole hardware list
fn lenient_devices<'de, D>(deserializer: D) -> Result<Vec<VirtualDevice>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!("Undecodable virtual device treated as other hardware: {}", e);
                VirtualDevice::Other
            })
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualEthernetCard {
    pub mac_address: Option<String>,
    pub backing: Option<EthernetCardBacking>,
}

/// Union of every ethernet backing representation vSphere reports
///
/// Standard portgroups carry `network`/`deviceName`, NSX networks carry
/// `opaqueNetworkId`, distributed portgroups carry `port`. See
/// [`crate::extract::topology::NetworkBacking`] for the classified form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EthernetCardBacking {
    pub network: Option<ManagedObjectName>,
    pub opaque_network_id: Option<String>,
    pub device_name: Option<String>,
    pub port: Option<DistributedVirtualSwitchPortConnection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributedVirtualSwitchPortConnection {
    pub switch_uuid: Option<String>,
    pub portgroup_key: Option<String>,
    pub port_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualDisk {
    #[serde(rename = "capacityInKB")]
    pub capacity_in_kb: Option<i64>,

    pub backing: Option<VirtualDiskBacking>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualDiskBacking {
    pub file_name: Option<String>,
}

// ============================================================================
// HostSystem
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSystem {
    pub name: Option<String>,
    pub runtime: Option<RuntimeInfo>,
    pub hardware: Option<HostHardwareInfo>,
    pub config: Option<HostConfigInfo>,
}

impl HostSystem {
    pub fn connection_state(&self) -> Option<&str> {
        self.runtime.as_ref()?.connection_state.as_deref()
    }

    pub fn system_info(&self) -> Option<&HostSystemInfo> {
        self.hardware.as_ref()?.system_info.as_ref()
    }

    pub fn identifying_info(&self) -> &[HostSystemIdentificationInfo] {
        self.system_info()
            .map(|s| s.other_identifying_info.as_slice())
            .unwrap_or_default()
    }

    pub fn product(&self) -> Option<&AboutInfo> {
        self.config.as_ref()?.product.as_ref()
    }

    pub fn options(&self) -> &[OptionValue] {
        self.config
            .as_ref()
            .map(|c| c.option.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostHardwareInfo {
    pub system_info: Option<HostSystemInfo>,
    pub cpu_info: Option<HostCpuInfo>,

    /// Physical memory in bytes
    pub memory_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSystemInfo {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub uuid: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub other_identifying_info: Vec<HostSystemIdentificationInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSystemIdentificationInfo {
    pub identifier_value: Option<String>,
    pub identifier_type: Option<ElementDescription>,
}

impl HostSystemIdentificationInfo {
    pub fn type_key(&self) -> Option<&str> {
        self.identifier_type.as_ref()?.key.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDescription {
    pub key: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostCpuInfo {
    pub num_cpu_packages: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfigInfo {
    pub product: Option<AboutInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub option: Vec<OptionValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutInfo {
    pub name: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionValue {
    pub key: Option<String>,
    pub value: Value,
}

// ============================================================================
// Topology objects
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedVirtualSwitch {
    pub name: Option<String>,
    pub uuid: Option<String>,
    pub summary: Option<ManagedObjectName>,
    #[serde(deserialize_with = "null_as_default")]
    pub portgroup: Vec<DistributedVirtualPortgroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedVirtualPortgroup {
    pub key: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Datastore {
    pub name: Option<String>,
    pub info: Option<DatastoreInfo>,
}

impl Datastore {
    /// Disk name of the first VMFS extent
    pub fn first_extent_disk(&self) -> Option<&str> {
        self.info
            .as_ref()?
            .vmfs
            .as_ref()?
            .extent
            .first()?
            .disk_name
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatastoreInfo {
    pub vmfs: Option<HostVmfsVolume>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostVmfsVolume {
    #[serde(deserialize_with = "null_as_default")]
    pub extent: Vec<HostScsiDiskPartition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostScsiDiskPartition {
    pub disk_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterComputeResource {
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub host: Vec<ManagedObjectName>,
}
