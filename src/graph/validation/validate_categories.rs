// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating that every component category observes its
//! structural role in a [`ComponentGraph`].

use crate::{component_category::CategoryPredicates, ComponentCategory, Edge, Error, Node};

use super::ComponentGraphValidator;

impl<N, E> ComponentGraphValidator<'_, N, E>
where
    N: Node,
    E: Edge,
{
    /// Validates that the root node:
    ///  - does not have any predecessors,
    ///  - has category Grid or None,
    ///  - is not a leaf node,
    ///  - has only exclusive successors, i.e. none of the root node's
    ///    successors have any other predecessors.
    pub(super) fn validate_root(&self) -> Result<(), Error> {
        self.ensure_root(self.root)?;
        if !matches!(
            self.root.category(),
            ComponentCategory::Grid | ComponentCategory::None
        ) {
            return Err(Error::invalid_graph(format!(
                "Root component {}:{} must have category Grid or None.",
                self.root.category(),
                self.root.component_id()
            )));
        }
        self.ensure_not_leaf(self.root)?;
        self.ensure_exclusive_successors(self.root)?;
        Ok(())
    }

    /// Validates that no non-root component is left with category `None`,
    /// and that Grid is unique and always in-degree zero.
    pub(super) fn validate_categories_assigned(&self) -> Result<(), Error> {
        for component in self.cg.components() {
            if component.component_id() == self.root.component_id() {
                continue;
            }
            if component.is_none() {
                return Err(Error::invalid_graph(format!(
                    "Component {} has no category assigned.",
                    component.component_id()
                )));
            }
            if component.is_grid() {
                return Err(Error::invalid_graph(format!(
                    "Multiple Grid components found: {} and {}.",
                    self.root.component_id(),
                    component.component_id()
                )));
            }
        }
        Ok(())
    }

    /// Validates that all meters:
    ///  - have only the Grid or another Meter as predecessors,
    ///  - don't have Batteries as successors.
    pub(super) fn validate_meters(&self) -> Result<(), Error> {
        for meter in self.cg.components().filter(|n| n.is_meter()) {
            self.ensure_on_predecessors(
                &meter,
                |n| n.is_grid() || n.is_meter(),
                "the Grid or a Meter",
            )?;
            self.ensure_on_successors(&meter, |n| !n.is_battery(), "not Batteries")?;
        }
        Ok(())
    }

    /// Validates inverters:
    ///  - have only the Grid or a Meter as predecessors,
    ///  - have at least one predecessor,
    ///  - **Battery inverters**: have only Batteries as successors, and at
    ///    least one.
    ///  - **Solar inverters**: have no successors.
    pub(super) fn validate_inverters(&self) -> Result<(), Error> {
        use crate::InverterType;

        for inverter in self.cg.components().filter(|n| n.is_inverter()) {
            let ComponentCategory::Inverter(inverter_type) = inverter.category() else {
                continue;
            };

            self.ensure_has_predecessor(&inverter)?;
            self.ensure_on_predecessors(
                &inverter,
                |n| n.is_grid() || n.is_meter(),
                "the Grid or a Meter",
            )?;

            match inverter_type {
                InverterType::Battery => {
                    self.ensure_not_leaf(&inverter)?;
                    self.ensure_on_successors(&inverter, |n| n.is_battery(), "Batteries")?;
                }
                InverterType::Solar => {
                    self.ensure_leaf(&inverter)?;
                }
            }
        }

        Ok(())
    }

    /// Validates that Batteries:
    ///  - have at least one predecessor, and only Battery inverters,
    ///  - don't have any successors.
    pub(super) fn validate_batteries(&self) -> Result<(), Error> {
        for battery in self.cg.components().filter(|n| n.is_battery()) {
            self.ensure_has_predecessor(&battery)?;
            self.ensure_leaf(&battery)?;
            self.ensure_on_predecessors(&battery, |n| n.is_battery_inverter(), "BatteryInverters")?;
        }
        Ok(())
    }

    /// Validates that EV Chargers:
    ///  - have at least one predecessor, only the Grid or a Meter,
    ///  - don't have any successors.
    pub(super) fn validate_ev_chargers(&self) -> Result<(), Error> {
        for ev_charger in self.cg.components().filter(|n| n.is_ev_charger()) {
            self.ensure_has_predecessor(&ev_charger)?;
            self.ensure_leaf(&ev_charger)?;
            self.ensure_on_predecessors(
                &ev_charger,
                |n| n.is_grid() || n.is_meter(),
                "the Grid or a Meter",
            )?;
        }
        Ok(())
    }

    /// Validates that CHPs have only the Grid or a Meter as predecessors and
    /// don't have any successors.
    pub(super) fn validate_chps(&self) -> Result<(), Error> {
        for chp in self.cg.components().filter(|n| n.is_chp()) {
            self.ensure_leaf(&chp)?;
            self.ensure_on_predecessors(
                &chp,
                |n| n.is_grid() || n.is_meter(),
                "the Grid or a Meter",
            )?;
        }
        Ok(())
    }

    /// Validates that Loads have only the Grid or a Meter as predecessors
    /// and don't have any successors.
    pub(super) fn validate_loads(&self) -> Result<(), Error> {
        for load in self.cg.components().filter(|n| n.is_load()) {
            self.ensure_leaf(&load)?;
            self.ensure_on_predecessors(
                &load,
                |n| n.is_grid() || n.is_meter(),
                "the Grid or a Meter",
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::{TestComponent, TestConnection};
    use crate::ComponentCategory;
    use crate::ComponentGraph;
    use crate::InverterType;

    #[test]
    fn test_validate_root() {
        let components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
        ];
        let connections = vec![TestConnection::new(1, 2)];
        assert!(ComponentGraph::try_new(components, connections).is_ok());

        let components = vec![TestComponent::new(1, ComponentCategory::Grid)];
        let connections: Vec<TestConnection> = vec![];
        assert!(ComponentGraph::try_new(components, connections).is_err_and(|e| {
            e == Error::invalid_graph("Grid:1 must have at least one successor.")
        }));

        let components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
            TestComponent::new(3, ComponentCategory::Meter),
        ];
        let connections = vec![
            TestConnection::new(1, 2),
            TestConnection::new(1, 3),
            TestConnection::new(2, 3),
        ];
        assert!(
            ComponentGraph::try_new(components, connections).is_err_and(|e| e
                == Error::invalid_graph(
                    "Grid:1 can't have successors with multiple predecessors. Found Meter:3."
                ))
        );
    }

    #[test]
    fn test_validate_meter() {
        let components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
            TestComponent::new(3, ComponentCategory::Battery),
        ];
        let connections = vec![TestConnection::new(1, 2), TestConnection::new(2, 3)];
        let err = ComponentGraph::try_new(components, connections).unwrap_err();
        assert_eq!(
            err,
            Error::invalid_graph("Meter:2 can only have successors that are not Batteries. Found Battery:3.")
        );
    }

    #[test]
    fn test_validate_battery_inverter() {
        let mut components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
            TestComponent::new(3, ComponentCategory::Inverter(InverterType::Battery)),
            TestComponent::new(4, ComponentCategory::Chp),
        ];
        let mut connections = vec![
            TestConnection::new(1, 2),
            TestConnection::new(2, 3),
            TestConnection::new(3, 4),
        ];
        assert!(
            ComponentGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::invalid_graph(
                    "BatteryInverter:3 can only have successors that are Batteries. Found CHP:4."
                ))
        );

        components.pop();
        connections.pop();
        assert!(ComponentGraph::try_new(components.clone(), connections.clone())
            .is_err_and(|e| e
                == Error::invalid_graph("BatteryInverter:3 must have at least one successor.")));

        components.push(TestComponent::new(4, ComponentCategory::Battery));
        connections.push(TestConnection::new(3, 4));
        assert!(ComponentGraph::try_new(components, connections).is_ok());
    }

    #[test]
    fn test_validate_pv_inverter() {
        let mut components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
            TestComponent::new(3, ComponentCategory::Inverter(InverterType::Solar)),
            TestComponent::new(4, ComponentCategory::Chp),
        ];
        let mut connections = vec![
            TestConnection::new(1, 2),
            TestConnection::new(2, 3),
            TestConnection::new(3, 4),
        ];
        assert!(
            ComponentGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::invalid_graph("SolarInverter:3 can't have any successors. Found CHP:4."))
        );

        components.pop();
        connections.pop();
        assert!(ComponentGraph::try_new(components, connections).is_ok());
    }

    #[test]
    fn test_validate_batteries() {
        let components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Battery),
        ];
        let connections = vec![TestConnection::new(1, 2)];
        assert!(
            ComponentGraph::try_new(components, connections).is_err_and(|e| e
                == Error::invalid_graph(
                    "Battery:2 can only have predecessors that are BatteryInverters. Found Grid:1."
                ))
        );
    }

    #[test]
    fn test_validate_ev_chargers() {
        let mut components = vec![
            TestComponent::new(1, ComponentCategory::Grid),
            TestComponent::new(2, ComponentCategory::Meter),
            TestComponent::new(3, ComponentCategory::EvCharger),
            TestComponent::new(4, ComponentCategory::Chp),
        ];
        let mut connections = vec![
            TestConnection::new(1, 2),
            TestConnection::new(2, 3),
            TestConnection::new(3, 4),
        ];
        assert!(
            ComponentGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::invalid_graph(
                    "EVCharger:3 can't have any successors. Found CHP:4."
                ))
        );

        components.pop();
        connections.pop();
        assert!(ComponentGraph::try_new(components, connections).is_ok());
    }
}
