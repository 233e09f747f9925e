// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `ComponentCategory` enum, which represents the
//! category of a component.

use crate::graph_traits::Node;
use std::fmt::Display;

/// Represents the type of an inverter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InverterType {
    Solar,
    Battery,
}

impl Display for InverterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InverterType::Solar => write!(f, "Solar"),
            InverterType::Battery => write!(f, "Battery"),
        }
    }
}

/// Represents the category of a component.
///
/// Values of the underlying generated API component/type need to be converted
/// to this type via [`crate::Node::category`], so that they can be used by
/// the [`crate::graph::ComponentGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentCategory {
    /// The connection point to the utility grid. At most one per graph.
    Grid,
    /// A metering point; its role (grid/battery/PV/EV/CHP meter) is inferred
    /// from its position in the graph, not stored explicitly.
    Meter,
    /// An inverter, further distinguished by [`InverterType`].
    Inverter(InverterType),
    /// A battery. Always a leaf with at least one predecessor.
    Battery,
    /// An EV charging point. Always a leaf with at least one predecessor.
    EvCharger,
    /// A combined heat and power generator.
    Chp,
    /// A passive consumer with no further structural role.
    Load,
    /// No category assigned. Only valid for a root node awaiting
    /// auto-correction (see [`crate::graph::ComponentGraph::refresh_from`]).
    None,
}

impl Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentCategory::Grid => write!(f, "Grid"),
            ComponentCategory::Meter => write!(f, "Meter"),
            ComponentCategory::Inverter(inverter_type) => write!(f, "{}Inverter", inverter_type),
            ComponentCategory::Battery => write!(f, "Battery"),
            ComponentCategory::EvCharger => write!(f, "EVCharger"),
            ComponentCategory::Chp => write!(f, "CHP"),
            ComponentCategory::Load => write!(f, "Load"),
            ComponentCategory::None => write!(f, "None"),
        }
    }
}

/// Predicates for checking the component category of a `Node`.
pub(crate) trait CategoryPredicates: Node {
    fn is_grid(&self) -> bool {
        self.category() == ComponentCategory::Grid
    }

    fn is_meter(&self) -> bool {
        self.category() == ComponentCategory::Meter
    }

    fn is_battery(&self) -> bool {
        self.category() == ComponentCategory::Battery
    }

    fn is_inverter(&self) -> bool {
        matches!(self.category(), ComponentCategory::Inverter(_))
    }

    fn is_battery_inverter(&self) -> bool {
        self.category() == ComponentCategory::Inverter(InverterType::Battery)
    }

    fn is_pv_inverter(&self) -> bool {
        self.category() == ComponentCategory::Inverter(InverterType::Solar)
    }

    fn is_ev_charger(&self) -> bool {
        self.category() == ComponentCategory::EvCharger
    }

    fn is_chp(&self) -> bool {
        self.category() == ComponentCategory::Chp
    }

    fn is_load(&self) -> bool {
        self.category() == ComponentCategory::Load
    }

    fn is_none(&self) -> bool {
        self.category() == ComponentCategory::None
    }
}

/// Implement the `CategoryPredicates` trait for all types that implement the
/// `Node` trait.
impl<T: Node> CategoryPredicates for T {}
