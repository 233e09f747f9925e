// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the runtime configuration shared by the health
//! tracking and resampling actors.

use std::time::Duration;

/// Tunables for the health trackers and resampling dispatcher.
///
/// Loading these from a file or environment is outside the core and is left
/// to the embedding binary.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// How old a telemetry message is allowed to be before it is considered
    /// stale. Also the arm duration of each freshness timer.
    pub max_data_age: Duration,

    /// The ceiling that the exponential back-off blocking window saturates
    /// at (see [`crate::health`]).
    pub max_blocking_duration: Duration,

    /// The fixed period at which the resampling dispatcher emits aligned
    /// samples.
    pub resampling_period: Duration,

    /// The bounded queue depth for every broadcast channel created by the
    /// [`crate::channel_registry::ChannelRegistry`].
    pub broadcast_queue_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_data_age: Duration::from_secs(30),
            max_blocking_duration: Duration::from_secs(30),
            resampling_period: Duration::from_secs(1),
            broadcast_queue_depth: 16,
        }
    }
}
