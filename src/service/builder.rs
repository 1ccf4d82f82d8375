// Copyright (c) 2025 - Cowboy AI, Inc.
//! Record Builder
//!
//! Turns one raw managed object into one normalized record, using the
//! topology indexes built once per collection pass.
//!
//! # Skipped objects
//!
//! Objects whose `runtime.connectionState` is not `connected` are skipped:
//! vSphere leaves most of their properties unpopulated. Objects that fail to
//! decode into their typed view are skipped as well. Both cases are logged
//! and never fail the pass.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::CollectorSettings;
use crate::domain::{resolve_farm, FarmMembership, HypervisorRecord, RecordClass, VirtualMachineRecord};
use crate::extract::{
    aggregate_usage, build_mac_to_network, extract_custom_attributes, extract_disks,
    extract_interfaces, reconcile_management_ip, render_scalar, LunIndex, PortgroupIndex,
};
use crate::inventory::model::{HostSystem, VirtualMachine};
use crate::inventory::RawInventoryObject;

const CONNECTED: &str = "connected";
const PRODUCTION: &str = "production";
const BYTES_PER_MIB: i64 = 1024 * 1024;
const SERVICE_TAG_KEY: &str = "ServiceTag";
const UNKNOWN_SERIAL: &str = "unknown";
const MANAGEMENT_IP_OPTION: &str = "Vpx.Vpxa.config.vpxa.hostIp";

/// Cross-object indexes resolved once per collection pass
#[derive(Debug, Clone, Default)]
pub struct TopologyContext {
    pub portgroups: PortgroupIndex,
    pub luns: LunIndex,
    pub farms: Vec<FarmMembership>,
}

/// Builds normalized records for one collection pass
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    settings: Arc<CollectorSettings>,
    topology: TopologyContext,
}

fn is_connected(kind: &str, name: &str, state: Option<&str>) -> bool {
    if state == Some(CONNECTED) {
        return true;
    }
    info!(
        "Skipping {} '{}' which is not connected (runtime.connectionState = '{}')",
        kind,
        name,
        state.unwrap_or_default()
    );
    false
}

impl RecordBuilder {
    pub fn new(settings: Arc<CollectorSettings>, topology: TopologyContext) -> Self {
        Self { settings, topology }
    }

    pub fn topology(&self) -> &TopologyContext {
        &self.topology
    }

    /// vCenter UI link recorded on every VM
    pub fn vcenter_url(&self) -> String {
        format!("https://{}/ui/?locale=en_US", self.settings.vcenter_uri)
    }

    /// Build a VM record, `None` when the object is skipped
    pub fn build_virtual_machine(&self, raw: &RawInventoryObject) -> Option<VirtualMachineRecord> {
        let vm: VirtualMachine = match raw.decode() {
            Ok(vm) => vm,
            Err(e) => {
                warn!("Skipping undecodable VM {} '{}': {}", raw.reference_id, raw.name(), e);
                return None;
            }
        };
        let name = vm.name.clone().unwrap_or_default();
        if !is_connected("VM", &name, vm.connection_state()) {
            return None;
        }
        debug!("Building VM record for {} ({})", name, raw.reference_id);

        let mappings = &self.settings.mappings;
        let guest_os = vm.guest_full_name();
        let devices = vm.devices();
        let guest = vm.guest.as_ref();
        let config = vm.config.as_ref();
        let hardware = config.and_then(|c| c.hardware.as_ref());

        let mac_to_network = build_mac_to_network(devices, &self.topology.portgroups);
        let interfaces = guest
            .map(|g| extract_interfaces(&g.net, &mac_to_network))
            .unwrap_or_default();
        let management_ip =
            reconcile_management_ip(guest.and_then(|g| g.ip_address.as_deref()), &interfaces);

        let host_name = vm.host_name();
        let farm = resolve_farm(host_name, &self.topology.farms);
        let virtual_host_id = if farm.is_empty() { host_name.to_string() } else { farm };

        let mut custom_attributes = extract_custom_attributes(&vm.available_field, &vm.custom_value);
        custom_attributes.extend(self.settings.custom_fields.evaluate(
            &[RecordClass::VirtualMachine],
            &name,
            &raw.graph(),
        ));

        Some(VirtualMachineRecord {
            id: raw.reference_id.clone(),
            org_id: self.settings.org_id.clone(),
            management_ip,
            cpu: hardware.and_then(|h| h.num_cpu),
            ram: hardware.and_then(|h| h.memory_mb),
            os_family_id: mappings.os_family.resolve(guest_os, ""),
            os_version_id: mappings.os_version.resolve(guest_os, guest_os),
            datastores: aggregate_usage(devices, &self.topology.luns, self.settings.decimal_separator),
            disks: guest.map(|g| extract_disks(&g.disk)).unwrap_or_default(),
            interfaces,
            virtual_host_id,
            description: config.and_then(|c| c.annotation.clone()).unwrap_or_default(),
            uuid: config.and_then(|c| c.uuid.clone()).unwrap_or_default(),
            power_state: vm
                .runtime
                .as_ref()
                .and_then(|r| r.power_state.clone())
                .unwrap_or_default(),
            vcenter: self.vcenter_url(),
            custom_attributes,
            name,
        })
    }

    /// Build a hypervisor record, `None` when the object is skipped
    pub fn build_hypervisor(&self, raw: &RawInventoryObject) -> Option<HypervisorRecord> {
        let host: HostSystem = match raw.decode() {
            Ok(host) => host,
            Err(e) => {
                warn!("Skipping undecodable host {} '{}': {}", raw.reference_id, raw.name(), e);
                return None;
            }
        };
        let name = host.name.clone().unwrap_or_default();
        if !is_connected("hypervisor", &name, host.connection_state()) {
            return None;
        }

        let mappings = &self.settings.mappings;
        let system_info = host.system_info();
        let vendor = system_info.and_then(|s| s.vendor.as_deref()).unwrap_or_default();
        let model = system_info.and_then(|s| s.model.as_deref()).unwrap_or_default();
        let product = host.product();
        let hardware = host.hardware.as_ref();
        debug!("Server {}: {} {}", name, vendor, model);

        let serial_number = host
            .identifying_info()
            .iter()
            .filter(|info| info.type_key() == Some(SERVICE_TAG_KEY))
            .filter_map(|info| info.identifier_value.clone())
            .last()
            .unwrap_or_else(|| UNKNOWN_SERIAL.to_string());

        let management_ip = host
            .options()
            .iter()
            .filter(|option| option.key.as_deref() == Some(MANAGEMENT_IP_OPTION))
            .map(|option| render_scalar(&option.value))
            .last()
            .unwrap_or_default();

        let custom_fields = self.settings.custom_fields.evaluate(
            &[RecordClass::Hypervisor, RecordClass::Server],
            &name,
            &raw.graph(),
        );

        Some(HypervisorRecord {
            id: raw.reference_id.clone(),
            org_id: self.settings.org_id.clone(),
            brand_id: mappings.brand.resolve(vendor, "Other"),
            model_id: mappings.model.resolve(model, ""),
            cpu: hardware
                .and_then(|h| h.cpu_info.as_ref())
                .and_then(|c| c.num_cpu_packages),
            ram: hardware.and_then(|h| h.memory_size).map(|bytes| bytes / BYTES_PER_MIB),
            os_family_id: mappings.os_family.resolve(
                product.and_then(|p| p.name.as_deref()).unwrap_or_default(),
                "Other",
            ),
            os_version_id: mappings.os_version.resolve(
                product.and_then(|p| p.full_name.as_deref()).unwrap_or_default(),
                "",
            ),
            status: PRODUCTION.to_string(),
            farm_id: resolve_farm(&name, &self.topology.farms),
            server_id: name.clone(),
            serial_number,
            management_ip,
            uuid: system_info.and_then(|s| s.uuid.clone()).unwrap_or_default(),
            custom_fields,
            name,
        })
    }
}
