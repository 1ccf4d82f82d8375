// Copyright (c) 2025 - Cowboy AI, Inc.
//! Field Path Expressions
//!
//! Custom fields are configured as property paths into a managed object
//! graph, e.g. `summary.config.product.build` or `hardware->cpuPkg[0]->vendor`.
//! A path parses into a typed AST and evaluates by walking JSON objects and
//! arrays only; no configured text is ever executed.
//!
//! # Forms
//!
//! - **Path**: segments separated by `.` or `->`, each an identifier followed
//!   by zero or more `[n]` indices.
//! - **Identifying info lookup**: `otherIdentifyingInfo[<key>]`, optionally
//!   prefixed by `hardware.systemInfo.`, selects the `identifierValue` of the
//!   first `hardware.systemInfo.otherIdentifyingInfo` entry whose
//!   `identifierType.key` equals `<key>`.
//!
//! # Example
//!
//! ```rust
//! use cim_vsphere_inventory::extract::FieldExpression;
//! use serde_json::json;
//!
//! let expr = FieldExpression::parse("config->product->version").unwrap();
//! let graph = json!({ "config": { "product": { "version": "7.0.3" } } });
//! assert_eq!(expr.evaluate(&graph), "7.0.3");
//! ```

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Expression parse errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Empty field expression")]
    Empty,

    #[error("Empty path segment in '{0}'")]
    EmptySegment(String),

    #[error("Invalid identifier '{segment}' in '{expression}'")]
    InvalidIdentifier { segment: String, expression: String },

    #[error("Invalid index in segment '{segment}' of '{expression}'")]
    InvalidIndex { segment: String, expression: String },
}

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member
    Property(String),
    /// Array element
    Index(usize),
}

/// Parsed custom field source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldExpression {
    /// Walk the graph along these segments
    Path(Vec<PathSegment>),
    /// Select a host identifying info value by type key
    IdentifyingInfo { key: String },
}

fn identifying_info_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:hardware(?:\.|->)systemInfo(?:\.|->))?otherIdentifyingInfo\[(.+)\]$")
            .expect("identifying info pattern is valid")
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FieldExpression {
    /// Parse an expression
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ExpressionError::Empty);
        }

        if let Some(captures) = identifying_info_pattern().captures(source) {
            return Ok(Self::IdentifyingInfo {
                key: captures[1].to_string(),
            });
        }

        let mut segments = Vec::new();
        for raw in source.split("->").flat_map(|part| part.split('.')) {
            if raw.is_empty() {
                return Err(ExpressionError::EmptySegment(source.to_string()));
            }
            parse_segment(raw, source, &mut segments)?;
        }
        Ok(Self::Path(segments))
    }

    /// Evaluate against an object graph
    ///
    /// Missing members, out-of-range indices, nulls and non-scalar leaves all
    /// evaluate to `""`.
    pub fn evaluate(&self, graph: &Value) -> String {
        match self {
            Self::Path(segments) => segments
                .iter()
                .try_fold(graph, |node, segment| match segment {
                    PathSegment::Property(name) => node.as_object()?.get(name),
                    PathSegment::Index(i) => node.as_array()?.get(*i),
                })
                .map(render_scalar)
                .unwrap_or_default(),
            Self::IdentifyingInfo { key } => lookup_identifying_info(graph, key).unwrap_or_else(|| {
                tracing::warn!("No identifying info of type '{}' found", key);
                String::new()
            }),
        }
    }
}

fn parse_segment(
    raw: &str,
    expression: &str,
    segments: &mut Vec<PathSegment>,
) -> Result<(), ExpressionError> {
    let (name, mut rest) = match raw.find('[') {
        Some(pos) => raw.split_at(pos),
        None => (raw, ""),
    };

    if !is_identifier(name) {
        return Err(ExpressionError::InvalidIdentifier {
            segment: raw.to_string(),
            expression: expression.to_string(),
        });
    }
    segments.push(PathSegment::Property(name.to_string()));

    let invalid_index = || ExpressionError::InvalidIndex {
        segment: raw.to_string(),
        expression: expression.to_string(),
    };

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[').ok_or_else(invalid_index)?;
        let close = inner.find(']').ok_or_else(invalid_index)?;
        let index = inner[..close].parse::<usize>().map_err(|_| invalid_index())?;
        segments.push(PathSegment::Index(index));
        rest = &inner[close + 1..];
    }
    Ok(())
}

fn lookup_identifying_info(graph: &Value, key: &str) -> Option<String> {
    graph
        .pointer("/hardware/systemInfo/otherIdentifyingInfo")?
        .as_array()?
        .iter()
        .find(|entry| entry.pointer("/identifierType/key").and_then(Value::as_str) == Some(key))
        .map(|entry| entry.get("identifierValue").map(render_scalar).unwrap_or_default())
}

/// Render a scalar leaf; anything else is empty
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

impl fmt::Display for FieldExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentifyingInfo { key } => {
                write!(f, "hardware.systemInfo.otherIdentifyingInfo[{}]", key)
            }
            Self::Path(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    match segment {
                        PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                        PathSegment::Property(name) => write!(f, ".{}", name)?,
                        PathSegment::Index(index) => write!(f, "[{}]", index)?,
                    }
                }
                Ok(())
            }
        }
    }
}
