// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! An async client abstraction for fetching the components and connections
//! that make up a [`ComponentGraph`], and the concurrent refresh built on
//! top of it.

use async_trait::async_trait;

use crate::{Edge, Error, Node};

use super::creation::Corrector;
use super::ComponentGraph;

/// Fetches the components and connections of a microgrid from an upstream
/// API.
///
/// Implementations are expected to issue their two fetches independently;
/// [`ComponentGraph::refresh_from_api`] runs them concurrently.
#[async_trait]
pub trait GraphApiClient<N, E>
where
    N: Node,
    E: Edge,
{
    /// Fetches the current set of components.
    async fn fetch_components(&self) -> Result<Vec<N>, Error>;

    /// Fetches the current set of connections.
    async fn fetch_connections(&self) -> Result<Vec<E>, Error>;
}

impl<N, E> ComponentGraph<N, E>
where
    N: Node,
    E: Edge,
{
    /// Refreshes this graph from an upstream [`GraphApiClient`].
    ///
    /// The component and connection listings are fetched concurrently. If
    /// either fetch fails, the existing graph is left untouched and the
    /// transport error is returned.
    pub async fn refresh_from_api(
        &mut self,
        client: &(impl GraphApiClient<N, E> + Sync),
        corrector: Option<Corrector<N, E>>,
    ) -> Result<(), Error> {
        let (components, connections) =
            tokio::try_join!(client.fetch_components(), client.fetch_connections())?;
        self.refresh_from(components, connections, corrector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::{minimal_battery_chain, TestComponent, TestConnection};

    struct FakeClient {
        components: Vec<TestComponent>,
        connections: Vec<TestConnection>,
    }

    #[async_trait]
    impl GraphApiClient<TestComponent, TestConnection> for FakeClient {
        async fn fetch_components(&self) -> Result<Vec<TestComponent>, Error> {
            Ok(self.components.clone())
        }

        async fn fetch_connections(&self) -> Result<Vec<TestConnection>, Error> {
            Ok(self.connections.clone())
        }
    }

    #[tokio::test]
    async fn test_refresh_from_api() {
        let (components, connections) = minimal_battery_chain();
        let client = FakeClient {
            components: components.clone(),
            connections: connections.clone(),
        };
        let mut cg = ComponentGraph::try_new(components, connections).unwrap();

        cg.refresh_from_api(&client, None).await.unwrap();
        assert_eq!(cg.root_id(), 0);
    }

    struct FailingClient;

    #[async_trait]
    impl GraphApiClient<TestComponent, TestConnection> for FailingClient {
        async fn fetch_components(&self) -> Result<Vec<TestComponent>, Error> {
            Err(Error::transport_failure("component fetch unavailable"))
        }

        async fn fetch_connections(&self) -> Result<Vec<TestConnection>, Error> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_refresh_from_api_leaves_graph_untouched_on_transport_failure() {
        let (components, connections) = minimal_battery_chain();
        let mut cg = ComponentGraph::try_new(components, connections).unwrap();
        let root_before = cg.root_id();

        let err = cg.refresh_from_api(&FailingClient, None).await.unwrap_err();
        assert_eq!(err, Error::transport_failure("component fetch unavailable"));
        assert_eq!(cg.root_id(), root_before);
    }
}
