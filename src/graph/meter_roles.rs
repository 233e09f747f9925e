// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for checking the roles of meters in a [`ComponentGraph`].

use crate::{component_category::CategoryPredicates, ComponentGraph, Edge, Error, Node};

/// Meter role identification.
impl<N, E> ComponentGraph<N, E>
where
    N: Node,
    E: Edge,
{
    /// Returns true if a node is a grid meter.
    ///
    /// A meter is identified as a grid meter if:
    ///   - it is a successor of the grid component,
    ///   - all its siblings are meters,
    ///   - if there are siblings, the successors of it and the successors of
    ///     its siblings are meters.
    pub fn is_grid_meter(&self, component_id: u64) -> Result<bool, Error> {
        let component = self.component(component_id)?;

        // Component must be a meter.
        if !component.is_meter() {
            return Ok(false);
        }

        let mut predecessors = self.predecessors(component_id)?;

        // The meter must have a grid as a predecessor.
        let Some(grid) = predecessors.next() else {
            return Ok(false);
        };

        let has_multiple_predecessors = predecessors.next().is_some();

        if !grid.is_grid() || has_multiple_predecessors {
            return Ok(false);
        }

        // All siblings must be meters.
        let mut num_grid_successors = 0;
        let mut non_meter_successors = false;
        for grid_successor in self.successors(grid.component_id())? {
            if grid_successor.is_meter() {
                num_grid_successors += 1;
            } else {
                return Ok(false);
            }
            let mut successors = self.successors(grid_successor.component_id())?;
            if successors.any(|n| !n.is_meter()) {
                non_meter_successors = true;
            }
        }

        // If there are no siblings, the meter is a grid meter.
        if num_grid_successors == 1 {
            return Ok(true);
        }

        // If there are siblings, the meter is a grid meter if the successors of
        // it and the successors of the siblings are meters.
        if non_meter_successors {
            return Ok(false);
        }
        Ok(true)
    }

    /// Returns true if the node is a PV meter.
    ///
    /// A meter is identified as a PV meter if:
    ///   - it has atleast one successor,
    ///   - all its successors are PV inverters.
    pub fn is_pv_meter(&self, component_id: u64) -> Result<bool, Error> {
        let mut has_successors = false;
        Ok(self.component(component_id)?.is_meter()
            && self.successors(component_id)?.all(|n| {
                has_successors = true;
                n.is_pv_inverter()
            })
            && has_successors)
    }

    /// Returns true if the node is a battery meter.
    ///
    /// A meter is identified as a battery meter if
    ///   - it has atleast one successor,
    ///   - all its successors are battery inverters.
    pub fn is_battery_meter(&self, component_id: u64) -> Result<bool, Error> {
        let mut has_successors = false;
        Ok(self.component(component_id)?.is_meter()
            && self.successors(component_id)?.all(|n| {
                has_successors = true;
                n.is_battery_inverter()
            })
            && has_successors)
    }

    /// Returns true if the node is an EV charger meter.
    ///
    /// A meter is identified as an EV charger meter if
    ///   - it has atleast one successor,
    ///   - all its successors are EV chargers.
    pub fn is_ev_charger_meter(&self, component_id: u64) -> Result<bool, Error> {
        let mut has_successors = false;
        Ok(self.component(component_id)?.is_meter()
            && self.successors(component_id)?.all(|n| {
                has_successors = true;
                n.is_ev_charger()
            })
            && has_successors)
    }

    /// Returns true if the node is a CHP meter.
    ///
    /// A meter is identified as a CHP meter if
    ///   - has atleast one successor,
    ///   - all its successors are CHPs.
    pub fn is_chp_meter(&self, component_id: u64) -> Result<bool, Error> {
        let mut has_successors = false;
        Ok(self.component(component_id)?.is_meter()
            && self.successors(component_id)?.all(|n| {
                has_successors = true;
                n.is_chp()
            })
            && has_successors)
    }
}
