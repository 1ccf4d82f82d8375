// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Configured Rules
//!
//! Mapping tables resolve to the first matching rule, and custom field
//! expressions never fail at evaluation time.

use cim_vsphere_inventory::domain::MappingTable;
use cim_vsphere_inventory::extract::FieldExpression;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary JSON up to a few levels deep
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Well-formed path expressions over short property names
fn arb_path_expression() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z]{1,4}", prop::option::of(0usize..3)), 1..5).prop_map(|segments| {
        segments
            .into_iter()
            .map(|(name, index)| match index {
                Some(i) => format!("{}[{}]", name, i),
                None => name,
            })
            .collect::<Vec<_>>()
            .join("->")
    })
}

// ============================================================================
// Mapping Tables
// ============================================================================

proptest! {
    /// With several literal rules for the same value, the first one wins
    #[test]
    fn prop_mapping_first_match_wins(
        raw in "[a-z]{1,8}",
        results in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..5),
    ) {
        let rules: Vec<String> = results.iter().map(|r| format!("{};{}", raw, r)).collect();
        let table = MappingTable::from_rules("brand", &rules).unwrap();
        prop_assert_eq!(table.resolve(&raw, "Other"), results[0].clone());
    }

    /// Values no rule matches resolve to the default
    #[test]
    fn prop_mapping_unmatched_uses_default(
        raw in "[a-z]{1,8}",
        default in "[A-Za-z]{0,8}",
    ) {
        let table = MappingTable::from_rules("model", ["/^[0-9]+$/;Numeric"]).unwrap();
        prop_assert_eq!(table.resolve(&raw, &default), default);
    }
}

// ============================================================================
// Field Expressions
// ============================================================================

proptest! {
    /// Parsing arbitrary text returns a value or an error, never panics
    #[test]
    fn prop_expression_parse_never_panics(source in ".{0,40}") {
        let _ = FieldExpression::parse(&source);
    }

    /// Well-formed paths always parse, and their Display form parses back
    /// to the same expression
    #[test]
    fn prop_well_formed_paths_parse(source in arb_path_expression()) {
        let expression = FieldExpression::parse(&source).unwrap();
        let reparsed = FieldExpression::parse(&expression.to_string()).unwrap();
        prop_assert_eq!(reparsed, expression);
    }

    /// Evaluation yields a scalar rendering or the empty string
    #[test]
    fn prop_evaluation_is_total(source in arb_path_expression(), graph in arb_json()) {
        let expression = FieldExpression::parse(&source).unwrap();
        let value = expression.evaluate(&graph);
        prop_assert!(!value.starts_with('{') && !value.starts_with('['), "evaluation rendered a non-scalar: {}", value);
    }
}
