// Copyright (c) 2025 - Cowboy AI, Inc.
//! Farm (cluster) membership

use serde::{Deserialize, Serialize};

/// Operator-level grouping of hypervisor hosts, loaded once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmMembership {
    /// Farm name
    pub name: String,

    /// Member host names, in provider order
    pub hosts: Vec<String>,
}

impl FarmMembership {
    pub fn new(name: impl Into<String>, hosts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            hosts,
        }
    }

    pub fn contains(&self, host_name: &str) -> bool {
        self.hosts.iter().any(|h| h == host_name)
    }
}

/// Name of the first farm listing `host_name`, or an empty string
///
/// Farms are scanned in the given order; a host listed in several farms
/// resolves to the earliest one.
pub fn resolve_farm(host_name: &str, farms: &[FarmMembership]) -> String {
    farms
        .iter()
        .find(|farm| farm.contains(host_name))
        .map(|farm| farm.name.clone())
        .unwrap_or_default()
}
