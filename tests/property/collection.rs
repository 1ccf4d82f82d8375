// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Collection Passes
//!
//! Whatever mix of connection states and repeated references the provider
//! returns, each connected reference becomes exactly one record, in first
//! occurrence order.

use cim_vsphere_inventory::{
    CollectorSettings, InventoryRepository, ManagedObjectKind, RawInventoryObject, SnapshotProvider,
};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn arb_connection_state() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => Just("connected"),
        1 => Just("disconnected"),
        1 => Just("orphaned"),
        1 => Just("inaccessible"),
    ]
}

fn virtual_machine(id: u8, state: &str) -> RawInventoryObject {
    let graph = json!({
        "name": format!("vm{}", id),
        "runtime": { "connectionState": state }
    });
    RawInventoryObject::new(format!("vm-{}", id), graph.as_object().cloned().unwrap())
}

proptest! {
    #[test]
    fn prop_each_connected_reference_emitted_once(
        objects in prop::collection::vec((0u8..8, arb_connection_state()), 0..24),
    ) {
        let provider = SnapshotProvider::default().with_objects(
            ManagedObjectKind::VirtualMachine,
            objects.iter().map(|(id, state)| virtual_machine(*id, state)),
        );
        let repository = InventoryRepository::new(
            Arc::new(provider),
            Arc::new(CollectorSettings::default()),
        );

        let snapshot = tokio_test::block_on(repository.snapshot()).unwrap();
        let emitted: Vec<String> = snapshot.virtual_machines.iter().map(|vm| vm.id.clone()).collect();

        // The first occurrence of a reference decides; later copies are skipped
        let mut seen = Vec::new();
        let mut expected = Vec::new();
        for (id, state) in &objects {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);
            if *state == "connected" {
                expected.push(format!("vm-{}", id));
            }
        }

        prop_assert_eq!(emitted, expected);
    }
}
