// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The async actor wrapping [`HealthCore`] for one battery/inverter pair.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::state::HealthCore;
use crate::clock::Clock;
use crate::telemetry::{BatteryData, HealthStatus, InverterData, SetPowerResult};

/// Tracks the health of one battery/inverter pair and republishes
/// [`HealthStatus`] changes on a watch channel.
pub struct ComponentHealthTracker {
    battery_id: u64,
    inverter_id: u64,
    status_rx: watch::Receiver<HealthStatus>,
    cancellation: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

impl ComponentHealthTracker {
    /// Spawns the tracker, subscribing to the given telemetry and set-power
    /// result channels.
    ///
    /// `max_data_age` and `max_blocking_duration` are independent knobs:
    /// the former arms the per-stream silence timers below, the latter
    /// bounds the `set_power` back-off window in [`HealthCore`].
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        battery_id: u64,
        inverter_id: u64,
        max_data_age: Duration,
        max_blocking_duration: Duration,
        clock: Arc<dyn Clock>,
        battery_rx: broadcast::Receiver<BatteryData>,
        inverter_rx: broadcast::Receiver<InverterData>,
        set_power_rx: broadcast::Receiver<SetPowerResult>,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(HealthStatus::NotWorking);
        let cancellation = CancellationToken::new();
        let task_cancellation = cancellation.clone();

        let handle = tokio::spawn(run(
            battery_id,
            inverter_id,
            max_data_age,
            max_blocking_duration,
            clock,
            battery_rx,
            inverter_rx,
            set_power_rx,
            status_tx,
            task_cancellation,
        ));

        Self {
            battery_id,
            inverter_id,
            status_rx,
            cancellation,
            handle,
        }
    }

    pub fn battery_id(&self) -> u64 {
        self.battery_id
    }

    pub fn inverter_id(&self) -> u64 {
        self.inverter_id
    }

    /// The current health status.
    pub fn status(&self) -> HealthStatus {
        *self.status_rx.borrow()
    }

    /// A handle that can be awaited for future status changes.
    pub fn status_receiver(&self) -> watch::Receiver<HealthStatus> {
        self.status_rx.clone()
    }

    /// Blocks the calling task until the status has changed from what it
    /// was the last time this or [`Self::status_receiver`] was observed,
    /// then marks that value as seen.
    ///
    /// Intended for tests that assert on a sequence of transitions; it
    /// cannot be used to assert that a status did *not* change, since it
    /// never resolves in that case.
    pub async fn get_new_status_if_changed(&mut self) -> HealthStatus {
        self.status_rx
            .changed()
            .await
            .expect("health tracker task ended unexpectedly");
        *self.status_rx.borrow_and_update()
    }

    /// Signals the background task to stop and waits for it to finish.
    pub async fn stop(self) {
        self.cancellation.cancel();
        let _ = self.handle.await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    battery_id: u64,
    inverter_id: u64,
    max_data_age: Duration,
    max_blocking_duration: Duration,
    clock: Arc<dyn Clock>,
    mut battery_rx: broadcast::Receiver<BatteryData>,
    mut inverter_rx: broadcast::Receiver<InverterData>,
    mut set_power_rx: broadcast::Receiver<SetPowerResult>,
    status_tx: watch::Sender<HealthStatus>,
    cancellation: CancellationToken,
) {
    let mut core = HealthCore::new(max_blocking_duration);

    // Resettable silence timers: a stream that simply stops producing
    // messages (rather than producing stale or invalid ones) must still be
    // declared invalid once `max_data_age` has elapsed since its last
    // valid message.
    let mut battery_deadline = Instant::now() + max_data_age;
    let mut inverter_deadline = Instant::now() + max_data_age;

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => break,
            () = tokio::time::sleep_until(battery_deadline) => {
                core.set_battery_valid(false);
                battery_deadline = Instant::now() + max_data_age;
            }
            () = tokio::time::sleep_until(inverter_deadline) => {
                core.set_inverter_valid(false);
                inverter_deadline = Instant::now() + max_data_age;
            }
            msg = battery_rx.recv() => {
                match msg {
                    Ok(data) if data.component_id == battery_id => {
                        let now = clock.now();
                        let valid = data.is_valid(now, max_data_age);
                        core.set_battery_valid(valid);
                        if valid {
                            battery_deadline = Instant::now() + max_data_age;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        tracing::warn!(battery_id, "health tracker lagged on battery channel");
                    }
                }
            }
            msg = inverter_rx.recv() => {
                match msg {
                    Ok(data) if data.component_id == inverter_id => {
                        let now = clock.now();
                        let valid = data.is_valid(now, max_data_age);
                        core.set_inverter_valid(valid);
                        if valid {
                            inverter_deadline = Instant::now() + max_data_age;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        tracing::warn!(inverter_id, "health tracker lagged on inverter channel");
                    }
                }
            }
            msg = set_power_rx.recv() => {
                match msg {
                    Ok(result) => {
                        // Dispatch results are keyed on the battery id.
                        let now = clock.now();
                        if result.failed.contains(&battery_id) {
                            core.record_failure(now);
                        } else if result.succeeded.contains(&battery_id) {
                            core.record_success();
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        tracing::warn!(battery_id, inverter_id, "health tracker lagged on set_power channel");
                    }
                }
            }
        }

        let new_status = core.status(clock.now());
        status_tx.send_if_modified(|current| {
            if *current != new_status {
                *current = new_status;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::telemetry::{ComponentState, RelayState};
    use std::time::SystemTime;

    fn battery_msg(id: u64, now: SystemTime) -> BatteryData {
        BatteryData {
            component_id: id,
            timestamp: now,
            component_state: ComponentState::Charging,
            relay_state: RelayState::Closed,
            errors: vec![],
            capacity: 10.0,
        }
    }

    fn inverter_msg(id: u64, now: SystemTime) -> InverterData {
        InverterData {
            component_id: id,
            timestamp: now,
            component_state: ComponentState::Charging,
            errors: vec![],
        }
    }

    /// Lets the background task's `select!` loop process whatever was just
    /// sent, without relying on a status-change notification that may
    /// never fire.
    async fn let_background_task_run() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_becomes_working_once_both_valid() {
        let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let (battery_tx, battery_rx) = broadcast::channel(16);
        let (inverter_tx, inverter_rx) = broadcast::channel(16);
        let (_set_power_tx, set_power_rx) = broadcast::channel::<SetPowerResult>(16);

        let mut tracker = ComponentHealthTracker::spawn(
            1,
            2,
            Duration::from_secs(5),
            Duration::from_secs(30),
            clock.clone(),
            battery_rx,
            inverter_rx,
            set_power_rx,
        );

        assert_eq!(tracker.status(), HealthStatus::NotWorking);

        battery_tx.send(battery_msg(1, clock.now())).unwrap();
        let_background_task_run().await;
        // Still not working: a valid battery message alone produces no
        // transition, so there's nothing to wait on here.
        assert_eq!(tracker.status(), HealthStatus::NotWorking);

        inverter_tx.send(inverter_msg(2, clock.now())).unwrap();
        assert_eq!(
            tracker.get_new_status_if_changed().await,
            HealthStatus::Working
        );

        tracker.stop().await;
    }

    #[tokio::test]
    async fn test_failure_blocks_then_expires() {
        let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let (battery_tx, battery_rx) = broadcast::channel(16);
        let (inverter_tx, inverter_rx) = broadcast::channel(16);
        let (set_power_tx, set_power_rx) = broadcast::channel(16);

        let mut tracker = ComponentHealthTracker::spawn(
            1,
            2,
            Duration::from_secs(5),
            Duration::from_secs(30),
            clock.clone(),
            battery_rx,
            inverter_rx,
            set_power_rx,
        );

        battery_tx.send(battery_msg(1, clock.now())).unwrap();
        inverter_tx.send(inverter_msg(2, clock.now())).unwrap();
        assert_eq!(
            tracker.get_new_status_if_changed().await,
            HealthStatus::Working
        );

        let mut failed = std::collections::HashSet::new();
        failed.insert(1);
        set_power_tx
            .send(SetPowerResult {
                succeeded: Default::default(),
                failed,
            })
            .unwrap();

        assert_eq!(
            tracker.get_new_status_if_changed().await,
            HealthStatus::Uncertain
        );

        tracker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_forces_not_working() {
        let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let (battery_tx, battery_rx) = broadcast::channel(16);
        let (inverter_tx, inverter_rx) = broadcast::channel(16);
        let (_set_power_tx, set_power_rx) = broadcast::channel::<SetPowerResult>(16);

        let mut tracker = ComponentHealthTracker::spawn(
            1,
            2,
            Duration::from_secs(5),
            Duration::from_secs(30),
            clock.clone(),
            battery_rx,
            inverter_rx,
            set_power_rx,
        );

        battery_tx.send(battery_msg(1, clock.now())).unwrap();
        inverter_tx.send(inverter_msg(2, clock.now())).unwrap();
        assert_eq!(
            tracker.get_new_status_if_changed().await,
            HealthStatus::Working
        );

        // No further battery messages arrive; once max_data_age has
        // elapsed since the last one, the silence timer should force the
        // battery input invalid again, with no new message involved.
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(
            tracker.get_new_status_if_changed().await,
            HealthStatus::NotWorking
        );

        tracker.stop().await;
    }
}
