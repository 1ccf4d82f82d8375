// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage Value Objects

use serde::{Deserialize, Serialize};

/// LUN id used when a datastore has no resolvable backing extent
pub const UNDEFINED_LUN: &str = "undefined";

const KIB_PER_GIB: u64 = 1024 * 1024;

/// Storage used by one VM on one datastore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreUsageRecord {
    /// Datastore name as found in the disk backing path
    pub name: String,

    /// Backing LUN/volume id, or [`UNDEFINED_LUN`]
    pub lun_id: String,

    /// Used size in GiB, two decimals
    pub size_used: String,
}

/// Guest-reported filesystem usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskRecord {
    /// Mount point or drive
    pub path: String,

    /// Capacity in bytes
    pub capacity: i64,

    /// Used bytes (capacity minus free space)
    pub used: i64,
}

/// Format a KiB amount as GiB with exactly two decimals
///
/// Rounds half up on the exact integer value, so the output does not depend
/// on float formatting or the process locale.
///
/// # Examples
///
/// ```rust
/// use cim_vsphere_inventory::domain::format_gib;
///
/// assert_eq!(format_gib(2 * 1048576, ','), "2,00");
/// assert_eq!(format_gib(524288, '.'), "0.50");
/// ```
pub fn format_gib(kib: u64, decimal_separator: char) -> String {
    let kib = u128::from(kib);
    let per_gib = u128::from(KIB_PER_GIB);
    let hundredths = (kib * 200 + per_gib) / (2 * per_gib);
    format!(
        "{}{}{:02}",
        hundredths / 100,
        decimal_separator,
        hundredths % 100
    )
}

/// Extract the datastore name from a `[datastore] folder/file.vmdk` path
pub fn datastore_name_from_path(path: &str) -> Option<&str> {
    let rest = path.trim_start().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "0,00")]
    #[test_case(1048576, "1,00")]
    #[test_case(2097152, "2,00")]
    #[test_case(524288, "0,50")]
    #[test_case(5242, "0,00" ; "below half a hundredth")]
    #[test_case(5243, "0,01" ; "rounds half up")]
    #[test_case(41943040, "40,00")]
    fn test_format_gib(kib: u64, expected: &str) {
        assert_eq!(format_gib(kib, ','), expected);
    }

    #[test]
    fn test_format_gib_separator() {
        assert_eq!(format_gib(1572864, '.'), "1.50");
    }

    #[test_case("[datastore1] vm01/vm01.vmdk", Some("datastore1"))]
    #[test_case("[SAN LUN 04] a/b.vmdk", Some("SAN LUN 04"))]
    #[test_case("[] orphan.vmdk", Some(""))]
    #[test_case("vm01/vm01.vmdk", None)]
    #[test_case("[unterminated vm01.vmdk", None)]
    fn test_datastore_name_from_path(path: &str, expected: Option<&str>) {
        assert_eq!(datastore_name_from_path(path), expected);
    }
}
