// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The composition root wiring the channel registry, health tracking, and
//! resampling dispatch into one object.
//!
//! Collaborators are expected to take `&Runtime` (or an `Arc<Runtime>`)
//! rather than constructing their own channel registries, so every
//! subscription in a process resolves against the same named channels.

use std::sync::Arc;

use crate::channel_registry::ChannelRegistry;
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::data_sourcing::{DataSourcingRequester, MetricSource};
use crate::pool_status::{ComponentPair, ComponentPoolStatusTracker};
use crate::resampling::ResamplingDispatcher;

/// Owns the shared channel registry and the long-lived dispatch tasks built
/// on top of it.
pub struct Runtime {
    pub config: RuntimeConfig,
    pub clock: Arc<dyn Clock>,
    pub channels: Arc<ChannelRegistry>,
    pub resampling: ResamplingDispatcher,
    data_sourcing: DataSourcingRequester,
}

impl Runtime {
    /// Builds a runtime using the real system clock.
    pub fn new(name: impl Into<String>, config: RuntimeConfig, source: Arc<dyn MetricSource>) -> Self {
        Self::with_clock(name, config, source, Arc::new(SystemClock))
    }

    /// Builds a runtime with an injected clock, for deterministic tests.
    pub fn with_clock(
        name: impl Into<String>,
        config: RuntimeConfig,
        source: Arc<dyn MetricSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let channels = Arc::new(ChannelRegistry::with_capacity(
            name,
            config.broadcast_queue_depth,
        ));
        let resampling =
            ResamplingDispatcher::new(channels.clone(), config.resampling_period, clock.clone());
        let data_sourcing = DataSourcingRequester::new(channels.clone(), source);

        Self {
            config,
            clock,
            channels,
            resampling,
            data_sourcing,
        }
    }

    /// Ensures raw telemetry for `(component_id, metric_id)` is flowing,
    /// and starts the matching resampled stream.
    pub fn ensure_streaming(
        &self,
        component_id: u64,
        metric_id: crate::telemetry::MetricId,
    ) -> tokio::sync::broadcast::Receiver<crate::telemetry::Quantity> {
        self.data_sourcing.ensure_streaming(component_id, metric_id)
    }

    /// Spawns a pool-wide health tracker over the given battery/inverter
    /// pairs, subscribing to their raw telemetry via this runtime's
    /// channel registry.
    pub fn spawn_pool_status(&self, pairs: Vec<ComponentPair>) -> ComponentPoolStatusTracker {
        let channels = self.channels.clone();
        let battery_key = "battery-data".to_string();
        let inverter_key = "inverter-data".to_string();
        let set_power_tx = self.channels.sender("set-power-result");

        ComponentPoolStatusTracker::spawn(
            pairs,
            self.config.max_data_age,
            self.config.max_blocking_duration,
            self.clock.clone(),
            || channels.receiver(&battery_key),
            || channels.receiver(&inverter_key),
            set_power_tx,
        )
    }
}
