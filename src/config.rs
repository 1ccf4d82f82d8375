// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collector Configuration
//!
//! Loaded from TOML, then overridden from the environment for the endpoint
//! and credentials:
//!
//! | Variable           | Key              |
//! |--------------------|------------------|
//! | `VSPHERE_URI`      | `vsphere.uri`    |
//! | `VSPHERE_LOGIN`    | `vsphere.login`  |
//! | `VSPHERE_PASSWORD` | `vsphere.password` |
//! | `DEFAULT_ORG_ID`   | `default_org_id` |
//!
//! # Example
//!
//! ```toml
//! default_org_id = "1"
//! decimal_separator = ","
//!
//! [vsphere]
//! uri = "vcenter.example.com"
//! login = "collector@vsphere.local"
//! password = "secret"
//!
//! [vsphere.connection_options]
//! verify_peer = false
//!
//! [mappings]
//! os_family = ["/^.*windows.*$/i;Windows", "/^.*linux.*$/i;Linux"]
//! os_version = ["/^.*\\((.+)\\)$/;%2$s"]
//! brand = ["/^Dell.*$/i;Dell"]
//! model = []
//!
//! [custom_synchro.hypervisor.fields.asset_number]
//! source = "hardware.systemInfo.otherIdentifyingInfo[AssetTag]"
//!
//! [[virtual_machine.attribute_fields]]
//! code = "expiration_date"
//! attribute = "CA-Expiration"
//! format = "date"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{MappingTable, RecordClass};
use crate::errors::{InventoryError, InventoryResult};
use crate::extract::{CustomFieldDefinition, CustomFieldSet};

/// Top-level collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default)]
    pub vsphere: VsphereConfig,

    /// Organization every record is attached to
    #[serde(default = "default_org_id")]
    pub default_org_id: String,

    /// Decimal separator for GiB sizes, a single character
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    #[serde(default)]
    pub mappings: MappingConfig,

    /// Custom field definitions keyed by record class name
    ///
    /// Both levels are sorted maps, so custom columns are emitted in code
    /// order whatever the file order.
    #[serde(default)]
    pub custom_synchro: BTreeMap<String, CustomSynchroConfig>,

    #[serde(default)]
    pub virtual_machine: VirtualMachineConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            vsphere: VsphereConfig::default(),
            default_org_id: default_org_id(),
            decimal_separator: default_decimal_separator(),
            mappings: MappingConfig::default(),
            custom_synchro: BTreeMap::new(),
            virtual_machine: VirtualMachineConfig::default(),
        }
    }
}

fn default_org_id() -> String {
    "1".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

/// vCenter endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VsphereConfig {
    /// Host name (and optional port) of the vCenter, without scheme
    #[serde(default)]
    pub uri: String,

    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub connection_options: ConnectionOptions,
}

/// TLS verification options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOptions {
    #[serde(default = "default_true")]
    pub verify_peer: bool,

    #[serde(default = "default_true")]
    pub verify_peer_name: bool,

    #[serde(default)]
    pub allow_self_signed: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            verify_peer: true,
            verify_peer_name: true,
            allow_self_signed: false,
        }
    }
}

impl ConnectionOptions {
    /// Whether certificate problems are tolerated
    pub fn accepts_invalid_certificates(&self) -> bool {
        !self.verify_peer || !self.verify_peer_name || self.allow_self_signed
    }
}

/// Raw mapping rules, `pattern;result` each
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub os_family: Vec<String>,

    #[serde(default)]
    pub os_version: Vec<String>,

    #[serde(default)]
    pub brand: Vec<String>,

    #[serde(default)]
    pub model: Vec<String>,
}

/// Custom fields of one record class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomSynchroConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, CustomFieldSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldSource {
    /// Field path expression
    pub source: String,
}

/// Extra VM row fields projected from custom attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualMachineConfig {
    #[serde(default)]
    pub attribute_fields: Vec<AttributeField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeField {
    /// Output column
    pub code: String,

    /// Record attribute code, usually `CA-<label>`
    pub attribute: String,

    #[serde(default)]
    pub format: AttributeFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeFormat {
    #[default]
    Text,
    /// `YYYY-MM-DD`, anything else is emitted as `0000-00-00`
    Date,
}

/// Compiled mapping tables, shared read-only by the record builder
#[derive(Debug, Clone)]
pub struct MappingTables {
    pub os_family: MappingTable,
    pub os_version: MappingTable,
    pub brand: MappingTable,
    pub model: MappingTable,
}

impl Default for MappingTables {
    fn default() -> Self {
        Self {
            os_family: MappingTable::empty("os_family"),
            os_version: MappingTable::empty("os_version"),
            brand: MappingTable::empty("brand"),
            model: MappingTable::empty("model"),
        }
    }
}

/// Validated settings a collection pass runs with
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub org_id: String,
    pub decimal_separator: char,
    pub vcenter_uri: String,
    pub mappings: Arc<MappingTables>,
    pub custom_fields: Arc<CustomFieldSet>,
    pub attribute_fields: Vec<AttributeField>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            org_id: default_org_id(),
            decimal_separator: ',',
            vcenter_uri: String::new(),
            mappings: Arc::new(MappingTables::default()),
            custom_fields: Arc::new(CustomFieldSet::default()),
            attribute_fields: Vec::new(),
        }
    }
}

impl CollectorConfig {
    /// Load a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_toml(&text)?.with_env_overrides())
    }

    /// Parse TOML without environment overrides
    pub fn from_toml(text: &str) -> InventoryResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `VSPHERE_*` and `DEFAULT_ORG_ID` from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut String); 4] = [
            ("VSPHERE_URI", &mut self.vsphere.uri),
            ("VSPHERE_LOGIN", &mut self.vsphere.login),
            ("VSPHERE_PASSWORD", &mut self.vsphere.password),
            ("DEFAULT_ORG_ID", &mut self.default_org_id),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key) {
                debug!("Configuration override from {}", key);
                *target = value;
            }
        }
        self
    }

    /// Validate and compile into collection settings
    pub fn settings(&self) -> InventoryResult<CollectorSettings> {
        let mut separator = self.decimal_separator.chars();
        let decimal_separator = match (separator.next(), separator.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(InventoryError::Configuration(format!(
                    "decimal_separator must be a single character, got '{}'",
                    self.decimal_separator
                )))
            }
        };

        Ok(CollectorSettings {
            org_id: self.default_org_id.clone(),
            decimal_separator,
            vcenter_uri: self.vsphere.uri.clone(),
            mappings: Arc::new(self.mapping_tables()?),
            custom_fields: Arc::new(self.custom_field_set()?),
            attribute_fields: self.virtual_machine.attribute_fields.clone(),
        })
    }

    fn mapping_tables(&self) -> InventoryResult<MappingTables> {
        let table = |name: &str, rules: &[String]| {
            MappingTable::from_rules(name, rules).map_err(|e| {
                InventoryError::Configuration(format!("invalid '{}' mapping: {}", name, e))
            })
        };

        Ok(MappingTables {
            os_family: table("os_family", &self.mappings.os_family)?,
            os_version: table("os_version", &self.mappings.os_version)?,
            brand: table("brand", &self.mappings.brand)?,
            model: table("model", &self.mappings.model)?,
        })
    }

    fn custom_field_set(&self) -> InventoryResult<CustomFieldSet> {
        let mut definitions = Vec::new();
        for (class_name, synchro) in &self.custom_synchro {
            let class = RecordClass::parse(class_name).ok_or_else(|| {
                InventoryError::Configuration(format!(
                    "unknown custom_synchro class '{}'",
                    class_name
                ))
            })?;
            definitions.extend(
                synchro
                    .fields
                    .iter()
                    .map(|(code, field)| CustomFieldDefinition::new(class, code, &field.source)),
            );
        }
        Ok(CustomFieldSet::new(definitions))
    }
}
