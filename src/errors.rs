// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory collection

use thiserror::Error;

use crate::inventory::ManagedObjectKind;
use crate::state_machine::TransitionError;

/// Errors that abort an inventory collection run
///
/// Per-object problems (disconnected VMs, unmapped values, unresolved
/// references) never surface here: they are logged and replaced by defaults.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Endpoint did not answer within the connect timeout
    #[error("Failed to connect to https://{host}: timed out ({cause})")]
    ConnectTimeout { host: String, cause: String },

    /// Endpoint could not be reached at all
    #[error("Failed to connect to https://{host} ({cause})")]
    Unreachable { host: String, cause: String },

    /// Endpoint reachable, but its certificate was rejected
    #[error(
        "Failed to connect to https://{host} - invalid SSL certificate ({cause}). \
         Set [vsphere.connection_options] verify_peer = false, verify_peer_name = false \
         and allow_self_signed = true to bypass this check"
    )]
    CertificateRejected { host: String, cause: String },

    /// Inventory provider failed to return objects
    #[error("Inventory provider error while fetching {kind}: {message}")]
    Provider {
        kind: ManagedObjectKind,
        message: String,
    },

    /// Collection lifecycle violated
    #[error("Collection state error: {0}")]
    Lifecycle(#[from] TransitionError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    /// Build a provider error for the given object kind
    pub fn provider(kind: ManagedObjectKind, message: impl Into<String>) -> Self {
        InventoryError::Provider {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run before collection starts
    pub fn is_preflight_failure(&self) -> bool {
        matches!(
            self,
            InventoryError::ConnectTimeout { .. }
                | InventoryError::Unreachable { .. }
                | InventoryError::CertificateRejected { .. }
        )
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            InventoryError::Deserialization(err.to_string())
        } else {
            InventoryError::Serialization(err.to_string())
        }
    }
}

impl From<toml::de::Error> for InventoryError {
    fn from(err: toml::de::Error) -> Self {
        InventoryError::Configuration(err.to_string())
    }
}
