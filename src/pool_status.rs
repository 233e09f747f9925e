// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Aggregates per-pair [`ComponentHealthTracker`]s into a pool-wide
//! working/uncertain view.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};

use crate::clock::Clock;
use crate::health::ComponentHealthTracker;
use crate::telemetry::{BatteryData, ComponentPoolStatus, HealthStatus, InverterData, SetPowerResult};

/// One battery/inverter pair to be tracked by the pool.
pub struct ComponentPair {
    pub battery_id: u64,
    pub inverter_id: u64,
}

/// Tracks the combined working/uncertain status of a set of
/// battery/inverter pairs.
pub struct ComponentPoolStatusTracker {
    trackers: Vec<ComponentHealthTracker>,
    status_tx: watch::Sender<ComponentPoolStatus>,
    set_power_tx: broadcast::Sender<SetPowerResult>,
}

impl ComponentPoolStatusTracker {
    /// Spawns one [`ComponentHealthTracker`] per pair and starts aggregating
    /// their status into a single [`ComponentPoolStatus`] view.
    ///
    /// `set_power_tx` is kept so that [`Self::update_status`] can forward a
    /// dispatch result to every child tracker through the same channel they
    /// were subscribed to.
    pub fn spawn(
        pairs: Vec<ComponentPair>,
        max_data_age: Duration,
        max_blocking_duration: Duration,
        clock: Arc<dyn Clock>,
        battery_rx_factory: impl Fn() -> broadcast::Receiver<BatteryData>,
        inverter_rx_factory: impl Fn() -> broadcast::Receiver<InverterData>,
        set_power_tx: broadcast::Sender<SetPowerResult>,
    ) -> Self {
        let trackers: Vec<ComponentHealthTracker> = pairs
            .into_iter()
            .map(|pair| {
                ComponentHealthTracker::spawn(
                    pair.battery_id,
                    pair.inverter_id,
                    max_data_age,
                    max_blocking_duration,
                    clock.clone(),
                    battery_rx_factory(),
                    inverter_rx_factory(),
                    set_power_tx.subscribe(),
                )
            })
            .collect();

        let (status_tx, _status_rx) = watch::channel(ComponentPoolStatus::default());

        Self {
            trackers,
            status_tx,
            set_power_tx,
        }
    }

    /// Forwards a `set_power` dispatch result to every child tracker's
    /// `set_power_result` input.
    pub fn update_status(&self, result: SetPowerResult) {
        let _ = self.set_power_tx.send(result);
    }

    /// Recomputes the aggregate status from each tracker's current state.
    ///
    /// Called after observing a change on any individual tracker; kept as
    /// an explicit pull rather than its own background task so tests can
    /// drive it deterministically.
    pub fn refresh(&self) -> ComponentPoolStatus {
        let mut status = ComponentPoolStatus::default();
        for tracker in &self.trackers {
            match tracker.status() {
                HealthStatus::Working => {
                    status.working.insert(tracker.battery_id());
                    status.working.insert(tracker.inverter_id());
                }
                HealthStatus::Uncertain => {
                    status.uncertain.insert(tracker.battery_id());
                    status.uncertain.insert(tracker.inverter_id());
                }
                HealthStatus::NotWorking => {}
            }
        }
        self.status_tx.send_replace(status.clone());
        status
    }

    /// Returns the working/uncertain subset of `components` as of the last
    /// [`Self::refresh`].
    pub fn get_working_components(&self, components: &HashSet<u64>) -> ComponentPoolStatus {
        let current = self.status_tx.borrow().clone();
        ComponentPoolStatus {
            working: current.working.intersection(components).copied().collect(),
            uncertain: current
                .uncertain
                .intersection(components)
                .copied()
                .collect(),
        }
    }

    /// A handle for observing pool status changes.
    pub fn status_receiver(&self) -> watch::Receiver<ComponentPoolStatus> {
        self.status_tx.subscribe()
    }

    /// Stops every underlying tracker.
    pub async fn stop(self) {
        for tracker in self.trackers {
            tracker.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::telemetry::{ComponentState, RelayState};
    use std::time::SystemTime;

    #[tokio::test]
    async fn test_aggregates_working_and_uncertain() {
        let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let (battery_tx, _battery_rx) = broadcast::channel::<BatteryData>(16);
        let (inverter_tx, _inverter_rx) = broadcast::channel::<InverterData>(16);
        let (set_power_tx, _set_power_rx) = broadcast::channel::<SetPowerResult>(16);

        let pairs = vec![
            ComponentPair {
                battery_id: 1,
                inverter_id: 2,
            },
            ComponentPair {
                battery_id: 3,
                inverter_id: 4,
            },
        ];

        let tracker = ComponentPoolStatusTracker::spawn(
            pairs,
            Duration::from_secs(5),
            Duration::from_secs(30),
            clock.clone(),
            || battery_tx.subscribe(),
            || inverter_tx.subscribe(),
            set_power_tx.clone(),
        );

        battery_tx
            .send(BatteryData {
                component_id: 1,
                timestamp: clock.now(),
                component_state: ComponentState::Charging,
                relay_state: RelayState::Closed,
                errors: vec![],
                capacity: 1.0,
            })
            .unwrap();
        inverter_tx
            .send(InverterData {
                component_id: 2,
                timestamp: clock.now(),
                component_state: ComponentState::Charging,
                errors: vec![],
            })
            .unwrap();

        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let status = tracker.refresh();
        assert!(status.working.contains(&1));
        assert!(status.working.contains(&2));
        assert!(!status.working.contains(&3));

        tracker.stop().await;
    }

    #[tokio::test]
    async fn test_update_status_forwards_failure_to_child() {
        let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let (battery_tx, _battery_rx) = broadcast::channel::<BatteryData>(16);
        let (inverter_tx, _inverter_rx) = broadcast::channel::<InverterData>(16);
        let (set_power_tx, _set_power_rx) = broadcast::channel::<SetPowerResult>(16);

        let pairs = vec![ComponentPair {
            battery_id: 1,
            inverter_id: 2,
        }];

        let tracker = ComponentPoolStatusTracker::spawn(
            pairs,
            Duration::from_secs(5),
            Duration::from_secs(30),
            clock.clone(),
            || battery_tx.subscribe(),
            || inverter_tx.subscribe(),
            set_power_tx,
        );

        battery_tx
            .send(BatteryData {
                component_id: 1,
                timestamp: clock.now(),
                component_state: ComponentState::Charging,
                relay_state: RelayState::Closed,
                errors: vec![],
                capacity: 1.0,
            })
            .unwrap();
        inverter_tx
            .send(InverterData {
                component_id: 2,
                timestamp: clock.now(),
                component_state: ComponentState::Charging,
                errors: vec![],
            })
            .unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(tracker.refresh().working.contains(&1));

        let mut failed = HashSet::new();
        failed.insert(1);
        tracker.update_status(SetPowerResult {
            succeeded: Default::default(),
            failed,
        });
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(tracker.refresh().uncertain.contains(&1));

        tracker.stop().await;
    }
}
