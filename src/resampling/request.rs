// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The request type identifying a resampled metric subscription.

use std::time::SystemTime;

use crate::telemetry::MetricId;

/// Identifies one resampled-metric stream a caller wants to subscribe to.
///
/// `start_time` lets a late subscriber ask for a stream anchored to a
/// specific historical start instead of "from now"; two requests that
/// differ only in `start_time` still resolve to the same live channel once
/// that window has passed, since [`Self::channel_name`] only encodes it
/// when present.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentMetricRequest {
    pub namespace: String,
    pub component_id: u64,
    pub metric_id: MetricId,
    pub start_time: Option<SystemTime>,
}

impl ComponentMetricRequest {
    pub fn new(namespace: impl Into<String>, component_id: u64, metric_id: MetricId) -> Self {
        Self {
            namespace: namespace.into(),
            component_id,
            metric_id,
            start_time: None,
        }
    }

    pub fn with_start_time(mut self, start_time: SystemTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// The broadcast-channel key this request resolves to.
    pub fn channel_name(&self) -> String {
        match self.start_time {
            Some(start) => {
                let since_epoch = start
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .map(|d| d.as_millis())
                    .unwrap_or(0);
                format!(
                    "{}:{}:{}:{}",
                    self.namespace, self.component_id, self.metric_id, since_epoch
                )
            }
            None => format!("{}:{}:{}", self.namespace, self.component_id, self.metric_id),
        }
    }
}
