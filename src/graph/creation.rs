// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating and refreshing [`ComponentGraph`] instances from
//! given components and connections.

use petgraph::graph::DiGraph;
use petgraph::Direction;

use crate::{Edge, Error, Node};

use super::{ComponentGraph, EdgeMap, NodeIndexMap};

/// A fallible, one-shot repair of a rejected `(components, connections)` pair,
/// given the chance to run once before a refresh gives up.
///
/// See [`ComponentGraph::refresh_from`].
pub type Corrector<N, E> = Box<dyn FnOnce(Vec<N>, Vec<E>) -> (Vec<N>, Vec<E>)>;

/// `ComponentGraph` instantiation and refresh.
impl<N, E> ComponentGraph<N, E>
where
    N: Node,
    E: Edge,
{
    /// Creates a new [`ComponentGraph`] from the given components and
    /// connections.
    ///
    /// Returns an error if the graph is structurally invalid. Equivalent to
    /// [`ComponentGraph::refresh_from`] with no prior graph and no corrector.
    pub fn try_new(
        components: impl IntoIterator<Item = N>,
        connections: impl IntoIterator<Item = E>,
    ) -> Result<Self, Error> {
        Self::build(
            components.into_iter().collect(),
            connections.into_iter().collect(),
        )
    }

    /// Replaces this graph's contents with a freshly validated graph built
    /// from `components` and `connections`.
    ///
    /// The graph is validated; if validation fails and `corrector` is
    /// `Some`, it is invoked exactly once with the original inputs and
    /// validation is retried on its output. If that also fails — or no
    /// corrector was given — `self` is left untouched and the error is
    /// returned.
    pub fn refresh_from(
        &mut self,
        components: Vec<N>,
        connections: Vec<E>,
        corrector: Option<Corrector<N, E>>,
    ) -> Result<(), Error> {
        let built = match Self::build(components.clone(), connections.clone()) {
            Ok(graph) => graph,
            Err(err) => {
                let Some(corrector) = corrector else {
                    tracing::error!("component graph refresh rejected: {err}");
                    return Err(err);
                };
                let (components, connections) = corrector(components, connections);
                Self::build(components, connections).map_err(|err| {
                    tracing::error!("component graph refresh rejected after correction: {err}");
                    err
                })?
            }
        };
        *self = built;
        Ok(())
    }

    fn build(components: Vec<N>, connections: Vec<E>) -> Result<Self, Error> {
        let (graph, indices) = Self::create_graph(components)?;
        let mut cg = Self {
            graph,
            node_indices: indices,
            root_id: 0,
            edges: EdgeMap::new(),
        };
        cg.add_connections(connections)?;
        cg.root_id = Self::find_root(&cg.graph)?;
        cg.validate()?;
        Ok(cg)
    }

    /// Finds the unique component with in-degree zero.
    fn find_root(graph: &DiGraph<N, ()>) -> Result<u64, Error> {
        let mut roots = graph
            .node_indices()
            .filter(|&idx| graph.neighbors_directed(idx, Direction::Incoming).next().is_none());

        let root = roots.next().ok_or_else(|| {
            Error::invalid_graph("No root component found (no component has in-degree zero).")
        })?;

        if roots.next().is_some() {
            return Err(Error::invalid_graph(
                "Multiple root components found (more than one component has in-degree zero).",
            ));
        }

        Ok(graph[root].component_id())
    }

    fn create_graph(
        components: impl IntoIterator<Item = N>,
    ) -> Result<(DiGraph<N, ()>, NodeIndexMap), Error> {
        let mut graph = DiGraph::new();
        let mut indices = NodeIndexMap::new();

        for component in components {
            let cid = component.component_id();

            if indices.contains_key(&cid) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate component ID found: {cid}"
                )));
            }

            let idx = graph.add_node(component);
            indices.insert(cid, idx);
        }

        Ok((graph, indices))
    }

    fn add_connections(&mut self, connections: impl IntoIterator<Item = E>) -> Result<(), Error> {
        for connection in connections {
            let sid = connection.source();
            let did = connection.destination();

            if sid == did {
                return Err(Error::invalid_connection(format!(
                    "Connection:({sid}, {did}) Can't connect a component to itself."
                )));
            }
            for cid in [sid, did] {
                if !self.node_indices.contains_key(&cid) {
                    return Err(Error::invalid_connection(format!(
                        "Connection:({sid}, {did}) Can't find a component with ID {cid}"
                    )));
                }
            }

            let source_idx = self.node_indices[&sid];
            let dest_idx = self.node_indices[&did];
            self.edges.insert((source_idx, dest_idx), connection);
            self.graph.update_edge(source_idx, dest_idx, ());
        }

        Ok(())
    }
}
