// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Ensures a component's raw telemetry channel is being filled from a
//! transport, on demand.
//!
//! This is the leaf of the pipeline that [`crate::resampling`] reads from:
//! a raw channel `"{component_id}:{metric_id}"` holding the latest
//! [`Quantity`] seen from the transport for that metric.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::channel_registry::ChannelRegistry;
use crate::telemetry::{MetricId, Quantity};
use crate::Error;

/// A source of raw metric readings for a component, e.g. a microgrid
/// transport client.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Awaits and returns the next reading for `(component_id, metric_id)`.
    ///
    /// Implementations are expected to loop internally and this is called
    /// once per value; the data sourcing task calls it repeatedly.
    async fn next_reading(
        &self,
        component_id: u64,
        metric_id: MetricId,
    ) -> Result<Quantity, Error>;
}

/// Ensures exactly one streaming task per `(component_id, metric_id)` is
/// pulling from a [`MetricSource`] and publishing onto the raw channel.
pub struct DataSourcingRequester {
    registry: Arc<ChannelRegistry>,
    source: Arc<dyn MetricSource>,
    tasks: Mutex<HashMap<(u64, MetricId), JoinHandle<()>>>,
}

impl DataSourcingRequester {
    pub fn new(registry: Arc<ChannelRegistry>, source: Arc<dyn MetricSource>) -> Self {
        Self {
            registry,
            source,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Ensures the raw channel for `(component_id, metric_id)` is being
    /// filled, and returns a receiver subscribed to it.
    pub fn ensure_streaming(
        &self,
        component_id: u64,
        metric_id: MetricId,
    ) -> broadcast::Receiver<Quantity> {
        let key = (component_id, metric_id);
        let mut tasks = self.tasks.lock().expect("data sourcing lock poisoned");

        let needs_spawn = match tasks.get(&key) {
            Some(handle) => handle.is_finished(),
            None => true,
        };

        if needs_spawn {
            let channel_key = format!("{component_id}:{metric_id}");
            let tx = self.registry.sender::<Quantity>(&channel_key);
            let source = self.source.clone();
            let handle = tokio::spawn(async move {
                loop {
                    match source.next_reading(component_id, metric_id).await {
                        Ok(reading) => {
                            if tx.send(reading).is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            tracing::warn!(component_id, %metric_id, %error, "metric source read failed");
                        }
                    }
                }
            });
            tasks.insert(key, handle);
        }

        self.registry
            .receiver::<Quantity>(&format!("{component_id}:{metric_id}"))
    }
}
