// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Fans a raw telemetry stream out into a fixed-period resampled stream,
//! one forwarding task per distinct [`ComponentMetricRequest`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::request::ComponentMetricRequest;
use crate::channel_registry::ChannelRegistry;
use crate::clock::Clock;
use crate::telemetry::{Quantity, Sample};

/// Dispatches resampled-metric subscriptions, reusing a single forwarding
/// task per channel across repeated subscribers.
pub struct ResamplingDispatcher {
    registry: Arc<ChannelRegistry>,
    resampling_period: Duration,
    clock: Arc<dyn Clock>,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ResamplingDispatcher {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        resampling_period: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            resampling_period,
            clock,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribes to a resampled metric stream, starting its forwarding
    /// task if one isn't already running.
    ///
    /// Idempotent: a second call for the same request while its task is
    /// still alive reuses it rather than spawning a duplicate.
    pub fn subscribe(&self, request: &ComponentMetricRequest) -> broadcast::Receiver<Sample> {
        let channel_name = request.channel_name();
        let mut tasks = self.tasks.lock().expect("resampling dispatcher lock poisoned");

        let needs_spawn = match tasks.get(&channel_name) {
            Some(handle) => handle.is_finished(),
            None => true,
        };

        if needs_spawn {
            let raw_key = format!("{}:{}", request.component_id, request.metric_id);
            let raw_rx = self.registry.receiver::<Quantity>(&raw_key);
            let out_tx = self.registry.sender::<Sample>(&channel_name);
            let handle = tokio::spawn(forward(
                raw_rx,
                out_tx,
                self.resampling_period,
                self.clock.clone(),
            ));
            tasks.insert(channel_name.clone(), handle);
        }

        self.registry.receiver::<Sample>(&channel_name)
    }
}

/// Ticks every `period`, emitting the raw value seen since the previous
/// tick, or a null sample if the window had no input. Values don't carry
/// over between windows: each tick consumes whatever arrived and resets to
/// `None`, so two consecutive silent windows both emit `None` rather than
/// the last-seen value repeating indefinitely.
async fn forward(
    mut raw_rx: broadcast::Receiver<Quantity>,
    out_tx: broadcast::Sender<Sample>,
    period: Duration,
    clock: Arc<dyn Clock>,
) {
    let mut interval = tokio::time::interval(period);
    let mut window_value: Option<Quantity> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let sample = Sample {
                    timestamp: clock.now(),
                    value: window_value.take(),
                };
                if out_tx.send(sample).is_err() {
                    break;
                }
            }
            msg = raw_rx.recv() => {
                match msg {
                    Ok(value) => window_value = Some(value),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        tracing::warn!("resampling forwarder lagged on raw channel");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::telemetry::MetricId;
    use std::time::Duration as StdDuration;

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_forwards_last_observation() {
        let registry = Arc::new(ChannelRegistry::new("test"));
        let dispatcher = ResamplingDispatcher::new(
            registry.clone(),
            Duration::from_millis(10),
            Arc::new(SystemClock),
        );

        let request = ComponentMetricRequest::new("ns", 1, MetricId::Soc);
        let mut out_rx = dispatcher.subscribe(&request);

        let raw_tx = registry.sender::<Quantity>("1:soc");
        raw_tx.send(Quantity(5.0)).unwrap();

        tokio::time::advance(StdDuration::from_millis(10)).await;
        let sample = out_rx.recv().await.unwrap();
        assert_eq!(sample.value, Some(Quantity(5.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_window_emits_null_without_carrying_forward() {
        let registry = Arc::new(ChannelRegistry::new("test"));
        let dispatcher = ResamplingDispatcher::new(
            registry.clone(),
            Duration::from_millis(10),
            Arc::new(SystemClock),
        );

        let request = ComponentMetricRequest::new("ns", 3, MetricId::Soc);
        let mut out_rx = dispatcher.subscribe(&request);

        let raw_tx = registry.sender::<Quantity>("3:soc");
        raw_tx.send(Quantity(1.0)).unwrap();

        tokio::time::advance(StdDuration::from_millis(10)).await;
        assert_eq!(out_rx.recv().await.unwrap().value, Some(Quantity(1.0)));

        // No new raw value arrives in this window.
        tokio::time::advance(StdDuration::from_millis(10)).await;
        assert_eq!(out_rx.recv().await.unwrap().value, None);
    }

    #[tokio::test]
    async fn test_repeated_subscribe_reuses_task() {
        let registry = Arc::new(ChannelRegistry::new("test"));
        let dispatcher = ResamplingDispatcher::new(
            registry.clone(),
            Duration::from_secs(1),
            Arc::new(SystemClock),
        );

        let request = ComponentMetricRequest::new("ns", 2, MetricId::Power);
        let _rx1 = dispatcher.subscribe(&request);
        let tasks_after_first = dispatcher.tasks.lock().unwrap().len();
        let _rx2 = dispatcher.subscribe(&request);
        let tasks_after_second = dispatcher.tasks.lock().unwrap().len();

        assert_eq!(tasks_after_first, tasks_after_second);
    }
}
