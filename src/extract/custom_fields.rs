// Copyright (c) 2025 - Cowboy AI, Inc.
//! Custom Attributes and Custom Fields
//!
//! Two unrelated mechanisms share this module:
//!
//! - **Custom attributes** are vCenter-side key/value annotations on a VM.
//!   They are exported as `CA-<label>` entries.
//! - **Custom fields** are collector-side definitions mapping an output code
//!   to a [`FieldExpression`] evaluated against the raw object graph.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use super::expression::{ExpressionError, FieldExpression};
use crate::domain::RecordClass;
use crate::inventory::model::{CustomFieldDef, CustomFieldValue};

/// Prefix of exported custom attribute keys
pub const CUSTOM_ATTRIBUTE_PREFIX: &str = "CA-";

/// `CA-<label>` → value for every custom value on an object
///
/// Values whose key has no field definition are exported under `CA-`.
pub fn extract_custom_attributes(
    available_fields: &[CustomFieldDef],
    custom_values: &[CustomFieldValue],
) -> BTreeMap<String, String> {
    let labels: HashMap<i64, &str> = available_fields
        .iter()
        .map(|field| (field.key, field.name.as_deref().unwrap_or_default()))
        .collect();

    custom_values
        .iter()
        .map(|value| {
            let label = labels.get(&value.key).copied().unwrap_or_default();
            (
                format!("{}{}", CUSTOM_ATTRIBUTE_PREFIX, label),
                value.value.clone().unwrap_or_default(),
            )
        })
        .collect()
}

/// One configured custom field
#[derive(Debug, Clone)]
pub struct CustomFieldDefinition {
    code: String,
    class: RecordClass,
    source: String,
    expression: Result<FieldExpression, ExpressionError>,
}

impl CustomFieldDefinition {
    /// Define a field; a malformed source is kept and reported at evaluation
    pub fn new(class: RecordClass, code: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            code: code.into(),
            class,
            expression: FieldExpression::parse(&source),
            source,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn class(&self) -> RecordClass {
        self.class
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Key under which the value is stored on a record
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.class.field_prefix(), self.code)
    }

    /// Evaluate for one object; a malformed definition yields `""`
    pub fn evaluate(&self, object_name: &str, graph: &Value) -> String {
        match &self.expression {
            Ok(expression) => expression.evaluate(graph),
            Err(e) => {
                warn!(
                    "Custom field '{}' of {} '{}' not evaluated: {}",
                    self.code, self.class, object_name, e
                );
                String::new()
            }
        }
    }
}

/// Custom field definitions for every record class
#[derive(Debug, Clone, Default)]
pub struct CustomFieldSet {
    definitions: Vec<CustomFieldDefinition>,
}

impl CustomFieldSet {
    pub fn new(definitions: Vec<CustomFieldDefinition>) -> Self {
        Self { definitions }
    }

    /// Definitions for one class, ordered by code
    pub fn for_class(&self, class: RecordClass) -> impl Iterator<Item = &CustomFieldDefinition> {
        self.definitions.iter().filter(move |d| d.class == class)
    }

    /// Output codes configured for one class
    pub fn codes(&self, class: RecordClass) -> Vec<String> {
        self.for_class(class).map(|d| d.code.clone()).collect()
    }

    /// Evaluate every definition of the given classes into storage keys
    pub fn evaluate(
        &self,
        classes: &[RecordClass],
        object_name: &str,
        graph: &Value,
    ) -> BTreeMap<String, String> {
        self.definitions
            .iter()
            .filter(|d| classes.contains(&d.class))
            .map(|d| (d.storage_key(), d.evaluate(object_name, graph)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
