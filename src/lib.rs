// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Component Graph

`component_graph` is a library for representing the components of a microgrid
and the connections between them as a Directed Acyclic Graph (DAG).

A graph representation makes it easy to reason about the relationships between
the components and to come up with formulas for calculating aggregated metrics
for the microgrid.

## The `Node` and `Edge` traits

The main struct is [`ComponentGraph`], instances of which can be created by
passing an iterator of components and the connections between them to the
[`try_new`][ComponentGraph::try_new] method.

But because `component_graph` is an independent library, it doesn't know about
the component and connection types and instead uses traits to interact with
them.

Therefore, to be usable with this library, the component and connection types
must implement the [`Node`] and [`Edge`] traits, respectively.  Check out the
documentation for these traits for sample implementations.

## Validation

The [`try_new`][ComponentGraph::try_new] method several checks on the graph
including checking that:

- There is exactly one root node.
- All edges point to existing nodes.
- All nodes are reachable from the root node.
- There are no cycles in the graph.
- The components have sensible neighbor types.  For example, a battery shouldn't
  have successors and should have a battery inverter as a predecessor.

If any of the validation steps fail, the method will return an [`Error`], and a
[`ComponentGraph`] instance otherwise.

## Runtime

On top of the static graph, this crate also provides the long-lived pieces
that keep a microgrid's live state current: [`channel_registry`] for named
pub/sub streams, [`health`] and [`pool_status`] for battery/inverter health
tracking, [`resampling`] and [`data_sourcing`] for turning raw telemetry into
fixed-period metric streams, and [`runtime::Runtime`] that wires all of the
above together for an embedding binary.
*/

mod component_category;
pub use component_category::{ComponentCategory, InverterType};

mod graph;
pub use graph::{iterators, ComponentGraph, GraphApiClient};

mod graph_traits;
pub use graph_traits::{Edge, Node};

mod error;
pub use error::Error;

mod config;
pub use config::RuntimeConfig;

pub mod clock;
pub use clock::Clock;

pub mod telemetry;

pub mod channel_registry;
pub use channel_registry::ChannelRegistry;

pub mod health;

pub mod pool_status;

pub mod resampling;

pub mod data_sourcing;

mod runtime;
pub use runtime::Runtime;
