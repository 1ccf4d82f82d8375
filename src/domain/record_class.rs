// Copyright (c) 2025 - Cowboy AI, Inc.
//! Target Record Classes
//!
//! Custom field definitions are scoped to the downstream record class they
//! populate. Hypervisors and physical servers are built from the same
//! `HostSystem` graph, so both classes are evaluated for every host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Downstream record class taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordClass {
    /// Virtual machine records
    VirtualMachine,
    /// Hypervisor records
    Hypervisor,
    /// Physical server records derived from hypervisor hosts
    Server,
}

impl RecordClass {
    /// All classes, in evaluation order
    pub const ALL: [RecordClass; 3] = [Self::VirtualMachine, Self::Hypervisor, Self::Server];

    /// Get the canonical string representation (configuration key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VirtualMachine => "virtual_machine",
            Self::Hypervisor => "hypervisor",
            Self::Server => "server",
        }
    }

    /// Parse from a configuration key
    ///
    /// Accepts the collector class names used by existing synchro
    /// configurations as aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "virtual_machine" | "vm" | "vspherevirtualmachinecollector" => {
                Some(Self::VirtualMachine)
            }
            "hypervisor" | "vspherehypervisorcollector" => Some(Self::Hypervisor),
            "server" | "vsphereservercollector" => Some(Self::Server),
            _ => None,
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VirtualMachine => "Virtual Machine",
            Self::Hypervisor => "Hypervisor",
            Self::Server => "Server",
        }
    }

    /// Prefix under which this class's custom fields are stored on a record
    ///
    /// Server fields ride along on hypervisor records and need a namespace.
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Self::Server => "server-custom-",
            Self::VirtualMachine | Self::Hypervisor => "",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
