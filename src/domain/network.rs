// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects for Guest Interface Records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4)")]
    InvalidPrefixLength(u32),

    #[error("Invalid MAC address format: {0}")]
    InvalidMacAddress(String),
}

/// Whether a reported address is IPv6
///
/// vSphere reports guest addresses as plain strings; any `:` marks IPv6.
pub fn is_ipv6_literal(address: &str) -> bool {
    address.contains(':')
}

/// Compute the IPv4 subnet mask for a CIDR prefix length
///
/// `mask = (0xFFFFFFFF << (32 - prefix)) & 0xFFFFFFFF`
///
/// # Examples
///
/// ```rust
/// use cim_vsphere_inventory::domain::subnet_mask;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(subnet_mask(24).unwrap(), Ipv4Addr::new(255, 255, 255, 0));
/// assert_eq!(subnet_mask(0).unwrap(), Ipv4Addr::new(0, 0, 0, 0));
/// assert!(subnet_mask(33).is_err());
/// ```
pub fn subnet_mask(prefix_length: u32) -> Result<Ipv4Addr, NetworkError> {
    if prefix_length > 32 {
        return Err(NetworkError::InvalidPrefixLength(prefix_length));
    }

    // u64 so that a /0 shift by 32 stays defined
    let mask = (0xFFFF_FFFF_u64 << (32 - prefix_length)) & 0xFFFF_FFFF;
    Ok(Ipv4Addr::from(mask as u32))
}

/// MAC Address value object
///
/// Used as the join key between virtual hardware and guest NIC reports.
/// Invariants:
/// - Valid MAC address format (6 octets)
/// - Canonical representation (lowercase, colon-separated)
///
/// # Examples
///
/// ```rust
/// use cim_vsphere_inventory::domain::MacAddress;
///
/// let mac = MacAddress::new("00:50:56:AB:CD:EF").unwrap();
/// assert_eq!(mac.as_str(), "00:50:56:ab:cd:ef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a new MAC address with validation
    ///
    /// # Invariants
    /// - Valid MAC address format
    /// - 6 octets (48 bits)
    pub fn new(mac: impl AsRef<str>) -> Result<Self, NetworkError> {
        let mac = mac.as_ref();
        let mac_clean = mac.replace([':', '-'], "");

        // Invariant: Must be exactly 12 hex digits (6 octets)
        if mac_clean.len() != 12 || !mac_clean.is_ascii() {
            return Err(NetworkError::InvalidMacAddress(mac.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, chunk) in mac_clean.as_bytes().chunks(2).enumerate() {
            let hex_str = std::str::from_utf8(chunk)
                .map_err(|_| NetworkError::InvalidMacAddress(mac.to_string()))?;
            octets[i] = u8::from_str_radix(hex_str, 16)
                .map_err(|_| NetworkError::InvalidMacAddress(mac.to_string()))?;
        }

        Ok(Self(octets))
    }

    /// Canonical join key for a reported MAC string
    ///
    /// Falls back to the trimmed, lower-cased input when it is not a valid
    /// MAC so that two identical malformed reports still join.
    pub fn canonical_key(mac: &str) -> String {
        match Self::new(mac) {
            Ok(parsed) => parsed.as_str(),
            Err(_) => mac.trim().to_ascii_lowercase(),
        }
    }

    /// Get as canonical string (lowercase, colon-separated)
    pub fn as_str(&self) -> String {
        format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MacAddress {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One IPv4 address configured on a guest NIC
///
/// A VM owns these in provider NIC order; they are never persisted on their
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceRecord {
    /// IPv4 address
    pub ip: Ipv4Addr,

    /// MAC address as reported by the guest
    pub mac: String,

    /// Resolved network name, empty when the MAC is unknown
    pub network: String,

    /// Subnet mask derived from the prefix length
    pub subnet_mask: Ipv4Addr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "0.0.0.0")]
    #[test_case(1, "128.0.0.0")]
    #[test_case(8, "255.0.0.0")]
    #[test_case(20, "255.255.240.0")]
    #[test_case(24, "255.255.255.0")]
    #[test_case(31, "255.255.255.254")]
    #[test_case(32, "255.255.255.255")]
    fn test_subnet_mask(prefix: u32, expected: &str) {
        assert_eq!(subnet_mask(prefix).unwrap().to_string(), expected);
    }

    #[test]
    fn test_subnet_mask_rejects_large_prefix() {
        assert_eq!(subnet_mask(33), Err(NetworkError::InvalidPrefixLength(33)));
    }

    #[test]
    fn test_ipv6_literal() {
        assert!(is_ipv6_literal("fe80::250:56ff:fe9a:1"));
        assert!(!is_ipv6_literal("10.0.0.1"));
        assert!(!is_ipv6_literal(""));
    }

    #[test]
    fn test_mac_address_formats() {
        assert!(MacAddress::new("00:11:22:33:44:55").is_ok());
        assert!(MacAddress::new("00-11-22-33-44-55").is_ok());
        assert!(MacAddress::new("001122334455").is_ok());
        assert!(MacAddress::new("00:11:22:33:44").is_err());
        assert!(MacAddress::new("zz:11:22:33:44:55").is_err());
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(MacAddress::canonical_key("00:50:56:AB:CD:EF"), "00:50:56:ab:cd:ef");
        assert_eq!(MacAddress::canonical_key("00-50-56-ab-cd-ef"), "00:50:56:ab:cd:ef");
        assert_eq!(MacAddress::canonical_key(" Not-A-Mac "), "not-a-mac");
    }

    #[test]
    fn test_interface_record_serializes_dotted_quads() {
        let record = NetworkInterfaceRecord {
            ip: Ipv4Addr::new(10, 1, 2, 3),
            mac: "00:50:56:aa:bb:cc".to_string(),
            network: "VM Network".to_string(),
            subnet_mask: Ipv4Addr::new(255, 255, 255, 0),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ip"], "10.1.2.3");
        assert_eq!(json["subnet_mask"], "255.255.255.0");
    }
}
