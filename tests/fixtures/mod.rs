// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-vsphere-inventory
//!
//! Provides a deterministic inventory snapshot and collector configuration.
//!
//! # Inventory
//!
//! - `dvs-1` with portgroup `dvportgroup-10` (`PG-Prod`)
//! - datastore `A` on LUN `naa.600a`, datastore `B` on NFS (no LUN)
//! - cluster `PROD` containing `esx01`
//! - VMs: `web01` (vm-1, on esx01), `db01` (vm-2, on esx02), `lost`
//!   (vm-3, disconnected) and a duplicate `vm-1`
//! - hosts: `esx01` (Dell), `esx02` (HPE), `esx03` (not responding)

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cim_vsphere_inventory::{
    CollectorConfig, CollectorSettings, InventoryProvider, InventoryRepository, InventoryResult,
    ManagedObjectKind, PropertySet, RawInventoryObject, SnapshotProvider,
};

pub const KIB_PER_GIB: i64 = 1024 * 1024;

pub const COLLECTOR_TOML: &str = r#"
default_org_id = "4"
decimal_separator = ","

[vsphere]
uri = "vcenter.example.com"
login = "collector@vsphere.local"
password = "secret"

[mappings]
os_family = ["/windows/i;Windows", "/linux/i;Linux"]
os_version = ["/^Red Hat Enterprise Linux (\\d+).*$/;RHEL %2$s"]
brand = ["/^Dell.*$/i;Dell", "/^(HPE?|Hewlett).*$/i;HPE"]
model = ["/^PowerEdge (.+)$/;%2$s"]

[custom_synchro.hypervisor.fields.build]
source = "config->product->build"

[custom_synchro.server.fields.asset_tag]
source = "hardware->systemInfo->otherIdentifyingInfo[AssetTag]"

[[virtual_machine.attribute_fields]]
code = "S_Owner"
attribute = "CA-Owner"

[[virtual_machine.attribute_fields]]
code = "S_EndOfLife"
attribute = "CA-EndOfLife"
format = "date"

[[virtual_machine.attribute_fields]]
code = "move2production"
attribute = "CA-Created"
format = "date"
"#;

pub fn settings() -> CollectorSettings {
    CollectorConfig::from_toml(COLLECTOR_TOML)
        .expect("Invalid collector configuration in test fixture")
        .settings()
        .expect("Invalid collector settings in test fixture")
}

fn disk(datastore: &str, file: &str, kib: i64) -> Value {
    json!({
        "_typeName": "VirtualDisk",
        "capacityInKB": kib,
        "backing": { "fileName": format!("[{}] {}", datastore, file) }
    })
}

pub fn inventory() -> Value {
    json!({
        "DistributedVirtualSwitch": [
            { "_ref": "dvs-1", "name": "dvs-prod", "uuid": "50 2a",
              "portgroup": [ { "key": "dvportgroup-10", "name": "PG-Prod" } ] }
        ],
        "Datastore": [
            { "_ref": "datastore-1", "name": "A",
              "info": { "vmfs": { "extent": [ { "diskName": "naa.600a" } ] } } },
            { "_ref": "datastore-2", "name": "B", "info": { "url": "ds:///vmfs/volumes/nfs-b/" } }
        ],
        "ClusterComputeResource": [
            { "_ref": "domain-c7", "name": "PROD", "host": [ { "_ref": "host-1", "name": "esx01" } ] }
        ],
        "VirtualMachine": [
            {
                "_ref": "vm-1",
                "name": "web01",
                "runtime": { "connectionState": "connected", "powerState": "poweredOn",
                             "host": { "_ref": "host-1", "name": "esx01" } },
                "config": {
                    "annotation": "Front end",
                    "uuid": "4215ABCD-0001",
                    "guestFullName": "Red Hat Enterprise Linux 8 (64-bit)",
                    "hardware": { "numCPU": 4, "memoryMB": 8192, "device": [
                        { "_typeName": "VirtualIDEController", "key": 200 },
                        { "_typeName": "VirtualVmxnet3", "macAddress": "00:50:56:AA:00:01",
                          "backing": { "port": { "switchUuid": "50 2a", "portgroupKey": "dvportgroup-10" } } },
                        disk("A", "web01/web01.vmdk", KIB_PER_GIB),
                        disk("B", "web01/web01_1.vmdk", KIB_PER_GIB / 2),
                        disk("A", "web01/web01_2.vmdk", KIB_PER_GIB)
                    ] }
                },
                "guest": {
                    "guestFullName": "Red Hat Enterprise Linux 8 (64-bit)",
                    "ipAddress": "fe80::250:56ff:feaa:1",
                    "net": [ { "macAddress": "00:50:56:aa:00:01", "network": "PG-Prod", "ipConfig": { "ipAddress": [
                        { "ipAddress": "fe80::250:56ff:feaa:1", "prefixLength": 64 },
                        { "ipAddress": "10.0.0.5", "prefixLength": 24 }
                    ] } } ],
                    "disk": [ { "diskPath": "/", "capacity": 10737418240_i64, "freeSpace": 5368709120_i64 } ]
                },
                "availableField": [
                    { "key": 101, "name": "Owner" },
                    { "key": 102, "name": "EndOfLife" },
                    { "key": 103, "name": "Created" }
                ],
                "customValue": [
                    { "key": 101, "value": "team-web" },
                    { "key": 102, "value": "2027-02-30" },
                    { "key": 103, "value": "2024-02-29" }
                ]
            },
            {
                "_ref": "vm-2",
                "name": "db01",
                "runtime": { "connectionState": "connected", "powerState": "poweredOff",
                             "host": { "_ref": "host-2", "name": "esx02" } },
                "config": {
                    "annotation": "Primary database\r\nDo not migrate",
                    "uuid": "4215ABCD-0002",
                    "guestFullName": "Microsoft Windows Server 2019 (64-bit)",
                    "hardware": { "numCPU": 8, "memoryMB": 32768, "device": [
                        { "_typeName": "VirtualE1000", "macAddress": "00:50:56:aa:00:02",
                          "backing": { "deviceName": "VM Network" } },
                        disk("B", "db01/db01.vmdk", 40 * KIB_PER_GIB)
                    ] }
                },
                "guest": {
                    "guestFullName": "",
                    "ipAddress": "10.0.1.7",
                    "net": [ { "macAddress": "00:50:56:aa:00:02", "ipConfig": { "ipAddress": [
                        { "ipAddress": "10.0.1.7", "prefixLength": 16 }
                    ] } } ]
                }
            },
            {
                "_ref": "vm-3",
                "name": "lost",
                "runtime": { "connectionState": "orphaned" }
            },
            {
                "_ref": "vm-1",
                "name": "web01-duplicate",
                "runtime": { "connectionState": "connected" }
            }
        ],
        "HostSystem": [
            {
                "_ref": "host-1",
                "name": "esx01",
                "runtime": { "connectionState": "connected" },
                "summary": { "overallStatus": "green" },
                "hardware": {
                    "systemInfo": {
                        "vendor": "Dell Inc.", "model": "PowerEdge R740", "uuid": "4c4c4544-0001",
                        "otherIdentifyingInfo": [
                            { "identifierValue": "A-1001", "identifierType": { "key": "AssetTag", "label": "Asset Tag" } },
                            { "identifierValue": "7XK2Q63", "identifierType": { "key": "ServiceTag", "label": "Service tag" } }
                        ]
                    },
                    "cpuInfo": { "numCpuPackages": 2 },
                    "memorySize": 412316860416_i64
                },
                "config": {
                    "product": { "name": "VMware ESXi", "fullName": "VMware ESXi 7.0.3 build-21424296", "build": "21424296" },
                    "option": [ { "key": "Vpx.Vpxa.config.vpxa.hostIp", "value": "10.0.0.11" } ]
                }
            },
            {
                "_ref": "host-2",
                "name": "esx02",
                "runtime": { "connectionState": "connected" },
                "hardware": {
                    "systemInfo": { "vendor": "HPE", "model": "ProLiant DL380 Gen10", "uuid": "30393137-0002" },
                    "cpuInfo": { "numCpuPackages": 1 },
                    "memorySize": 137438953472_i64
                },
                "config": { "product": { "name": "VMware ESXi", "fullName": "VMware ESXi 8.0.1" } }
            },
            {
                "_ref": "host-3",
                "name": "esx03",
                "runtime": { "connectionState": "notResponding" }
            }
        ]
    })
}

pub fn snapshot_provider() -> SnapshotProvider {
    SnapshotProvider::from_value(inventory()).expect("Invalid inventory in test fixture")
}

/// Snapshot provider that counts `find_all` calls
pub struct CountingProvider {
    inner: SnapshotProvider,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new(inner: SnapshotProvider) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryProvider for CountingProvider {
    async fn find_all(
        &self,
        kind: ManagedObjectKind,
        properties: &PropertySet,
    ) -> InventoryResult<Vec<RawInventoryObject>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all(kind, properties).await
    }
}

/// Repository over the fixture inventory, with its call counter
pub fn repository() -> (InventoryRepository, Arc<CountingProvider>) {
    let provider = Arc::new(CountingProvider::new(snapshot_provider()));
    let repository = InventoryRepository::new(provider.clone(), Arc::new(settings()));
    (repository, provider)
}
