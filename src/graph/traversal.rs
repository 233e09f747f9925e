// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains methods that help with graph traversal, including
//! descendant search and "chain" membership predicates.

use crate::{component_category::CategoryPredicates, ComponentCategory, ComponentGraph, Edge, Error, Node};

/// Traversal methods.
impl<N, E> ComponentGraph<N, E>
where
    N: Node,
    E: Edge,
{
    fn find(
        &self,
        from: u64,
        mut pred: impl FnMut(&N) -> bool,
        direction: petgraph::Direction,
    ) -> Result<Option<&N>, Error> {
        let index = self.node_indices.get(&from).ok_or_else(|| {
            Error::unknown_component(format!("Component with id {} not found.", from))
        })?;
        let mut stack = vec![*index];

        while let Some(index) = stack.pop() {
            let node = &self.graph[index];
            if pred(node) {
                return Ok(Some(node));
            }

            let neighbors = self.graph.neighbors_directed(index, direction);
            stack.extend(neighbors);
        }

        Ok(None)
    }

    fn find_all(
        &self,
        from: u64,
        mut pred: impl FnMut(&N) -> bool,
        direction: petgraph::Direction,
    ) -> Result<Vec<&N>, Error> {
        let index = self.node_indices.get(&from).ok_or_else(|| {
            Error::unknown_component(format!("Component with id {} not found.", from))
        })?;
        let mut stack = vec![*index];
        let mut found = vec![];

        while let Some(index) = stack.pop() {
            let node = &self.graph[index];
            if pred(node) {
                found.push(node);
            }

            let neighbors = self.graph.neighbors_directed(index, direction);
            stack.extend(neighbors);
        }

        Ok(found)
    }

    /// Find the node that satisfies the given predicate starting from the given
    /// node and traversing away from the root.
    pub fn find_successor(
        &self,
        from: u64,
        pred: impl FnMut(&N) -> bool,
    ) -> Result<Option<&N>, Error> {
        self.find(from, pred, petgraph::Direction::Outgoing)
    }

    /// Find the node that satisfies the given predicate starting from the given
    /// node and traversing towards the root.
    pub fn find_predecessor(
        &self,
        from: u64,
        pred: impl FnMut(&N) -> bool,
    ) -> Result<Option<&N>, Error> {
        self.find(from, pred, petgraph::Direction::Incoming)
    }

    pub(crate) fn has_battery_successors(&self, from: u64) -> Result<bool, Error> {
        self.find(
            from,
            |n| n.is_battery() || n.is_battery_inverter(),
            petgraph::Direction::Outgoing,
        )
        .map(|n| n.is_some())
    }

    /// Returns `true` if the component is part of a battery chain, i.e. it is
    /// either a battery inverter or a battery meter.
    pub fn is_battery_chain(&self, component_id: u64) -> Result<bool, Error> {
        let component = self.component(component_id)?;
        Ok(component.is_battery_inverter() || self.is_battery_meter(component_id)?)
    }

    /// Returns `true` if the component is part of a PV chain, i.e. it is
    /// either a PV inverter or a PV meter.
    pub fn is_pv_chain(&self, component_id: u64) -> Result<bool, Error> {
        let component = self.component(component_id)?;
        Ok(component.is_pv_inverter() || self.is_pv_meter(component_id)?)
    }

    /// Returns `true` if the component is part of an EV charger chain, i.e.
    /// it is either an EV charger or an EV charger meter.
    pub fn is_ev_charger_chain(&self, component_id: u64) -> Result<bool, Error> {
        let component = self.component(component_id)?;
        Ok(component.is_ev_charger() || self.is_ev_charger_meter(component_id)?)
    }

    /// Returns `true` if the component is part of a CHP chain, i.e. it is
    /// either a CHP or a CHP meter.
    pub fn is_chp_chain(&self, component_id: u64) -> Result<bool, Error> {
        let component = self.component(component_id)?;
        Ok(component.is_chp() || self.is_chp_meter(component_id)?)
    }

    /// Finds the first descendant component given a root and a priority-ordered
    /// list of descendant categories.
    ///
    /// The first component with `root_category` (in iteration order) is taken
    /// as the root. Only its immediate successors are considered, sorted by
    /// component ID for determinism; the first successor matching a category
    /// in `descendant_categories`, trying categories in order, is returned.
    pub fn find_first_descendant_component(
        &self,
        root_category: ComponentCategory,
        descendant_categories: &[ComponentCategory],
    ) -> Result<&N, Error> {
        let root = self
            .components()
            .find(|c| c.category() == root_category)
            .ok_or_else(|| {
                Error::no_matching_descendant(format!(
                    "Root component not found for category {root_category}."
                ))
            })?;

        let mut successors: Vec<&N> = self.successors(root.component_id())?.collect();
        successors.sort_by_key(|c| c.component_id());

        for category in descendant_categories {
            if let Some(found) = successors.iter().find(|c| c.category() == *category) {
                return Ok(found);
            }
        }

        Err(Error::no_matching_descendant(
            "Component not found in any of the descendant categories.",
        ))
    }
}
