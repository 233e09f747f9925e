// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the `TestComponent` and `TestConnection` types,
//! which implement the `Node` and `Edge` traits respectively.
//!
//! They are shared by all the test modules in the `graph` module.

use crate::{ComponentCategory, ComponentGraph, Edge, Node};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestComponent(u64, ComponentCategory);

impl TestComponent {
    pub(crate) fn new(id: u64, category: ComponentCategory) -> Self {
        TestComponent(id, category)
    }
}

impl Node for TestComponent {
    fn component_id(&self) -> u64 {
        self.0
    }

    fn category(&self) -> ComponentCategory {
        self.1
    }

    fn is_supported(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestConnection(u64, u64);

impl TestConnection {
    pub(crate) fn new(source: u64, destination: u64) -> Self {
        TestConnection(source, destination)
    }
}

impl Edge for TestConnection {
    fn source(&self) -> u64 {
        self.0
    }

    fn destination(&self) -> u64 {
        self.1
    }
}

/// A minimal grid → meter → battery-inverter → battery fixture, the smallest
/// graph satisfying every structural invariant.
pub(crate) fn minimal_battery_chain() -> (Vec<TestComponent>, Vec<TestConnection>) {
    use crate::InverterType;

    let components = vec![
        TestComponent::new(0, ComponentCategory::Grid),
        TestComponent::new(1, ComponentCategory::Meter),
        TestComponent::new(2, ComponentCategory::Inverter(InverterType::Battery)),
        TestComponent::new(3, ComponentCategory::Battery),
    ];
    let connections = vec![
        TestConnection::new(0, 1),
        TestConnection::new(1, 2),
        TestConnection::new(2, 3),
    ];
    (components, connections)
}

pub(crate) fn build_graph(
    components: Vec<TestComponent>,
    connections: Vec<TestConnection>,
) -> ComponentGraph<TestComponent, TestConnection> {
    ComponentGraph::try_new(components, connections)
        .expect("fixture graph must be structurally valid")
}
