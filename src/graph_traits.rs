// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the traits that need to be implemented by the types
//! that represent a node and an edge.

use crate::component_category::ComponentCategory;

/**
This trait needs to be implemented by the type that represents a node.

Read more about why this is necessary [here][crate#the-node-and-edge-traits].

<details>
<summary>Example implementation for a generated API component type:</summary>

```ignore
impl microgrid_core::Node for api::v1::Component {
    fn component_id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> microgrid_core::ComponentCategory {
        use microgrid_core as core;

        match api::v1::ComponentCategory::try_from(self.category).unwrap_or_default() {
            api::v1::ComponentCategory::Grid => core::ComponentCategory::Grid,
            api::v1::ComponentCategory::Meter => core::ComponentCategory::Meter,
            api::v1::ComponentCategory::Battery => core::ComponentCategory::Battery,
            api::v1::ComponentCategory::EvCharger => core::ComponentCategory::EvCharger,
            api::v1::ComponentCategory::Chp => core::ComponentCategory::Chp,
            api::v1::ComponentCategory::Load => core::ComponentCategory::Load,
            api::v1::ComponentCategory::Inverter => {
                core::ComponentCategory::Inverter(match self.inverter_type() {
                    api::v1::InverterType::Solar => core::InverterType::Solar,
                    api::v1::InverterType::Battery => core::InverterType::Battery,
                })
            }
            _ => core::ComponentCategory::None,
        }
    }

    fn is_supported(&self) -> bool {
        self.status != api::v1::ComponentStatus::Inactive as i32
    }
}
```

</details>
*/
pub trait Node: Clone {
    /// Returns the component id of the component.
    fn component_id(&self) -> u64;
    /// Returns the category of the component.
    fn category(&self) -> ComponentCategory;
    /// Returns true if the component can be read from and/or controlled.
    ///
    /// Unsupported components are still placed in the graph (they may be
    /// structurally load-bearing, e.g. a meter between a battery inverter and
    /// its battery) but are never targeted by trackers or dispatchers.
    fn is_supported(&self) -> bool;
}

/**
This trait needs to be implemented by the type that represents a connection.

Read more about why this is necessary [here][crate#the-node-and-edge-traits].

<details>
<summary>Example implementation for a generated API connection type:</summary>

```ignore
impl microgrid_core::Edge for api::v1::ComponentConnection {
    fn source(&self) -> u64 {
        self.source_component_id
    }

    fn destination(&self) -> u64 {
        self.destination_component_id
    }
}
```

</details>
*/
pub trait Edge: Clone {
    /// Returns the source component id of the connection.
    fn source(&self) -> u64;
    /// Returns the destination component id of the connection.
    fn destination(&self) -> u64;
}
