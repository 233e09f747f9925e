// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The pure health state machine for a single battery/inverter pair.
//!
//! Kept free of channels and async so the transition logic in §4.3 —
//! including the "failure recovery cancels blocking" rule — can be tested
//! directly against a [`ManualClock`](crate::clock::ManualClock) timeline.

use std::time::{Duration, SystemTime};

use super::backoff::backoff_duration;
use crate::telemetry::HealthStatus;

/// Tracks combined battery/inverter message validity and `set_power`
/// back-off state for one component pair.
pub struct HealthCore {
    battery_valid: bool,
    inverter_valid: bool,
    blocked_until: Option<SystemTime>,
    backoff_step: u32,
    max_blocking_duration: Duration,
}

impl HealthCore {
    /// Creates a tracker with both inputs assumed invalid until the first
    /// message arrives.
    pub fn new(max_blocking_duration: Duration) -> Self {
        Self {
            battery_valid: false,
            inverter_valid: false,
            blocked_until: None,
            backoff_step: 0,
            max_blocking_duration,
        }
    }

    fn combined_valid(&self) -> bool {
        self.battery_valid && self.inverter_valid
    }

    /// A freshness-and-content check on the latest battery message changed.
    ///
    /// Transitioning from invalid to valid combined validity cancels any
    /// active blocking window, per the rule that fresh valid messages
    /// preempt back-off.
    pub fn set_battery_valid(&mut self, valid: bool) {
        self.update_validity(|core| core.battery_valid = valid);
    }

    /// As [`Self::set_battery_valid`], for the inverter input.
    pub fn set_inverter_valid(&mut self, valid: bool) {
        self.update_validity(|core| core.inverter_valid = valid);
    }

    fn update_validity(&mut self, apply: impl FnOnce(&mut Self)) {
        let was_valid = self.combined_valid();
        apply(self);
        let is_valid = self.combined_valid();

        if !was_valid && is_valid {
            self.backoff_step = 0;
            self.blocked_until = None;
        }
    }

    /// Records a failed `set_power` dispatch, extending the blocking window.
    pub fn record_failure(&mut self, now: SystemTime) {
        self.backoff_step += 1;
        let duration = backoff_duration(self.backoff_step, self.max_blocking_duration);
        self.blocked_until = Some(now + duration);
    }

    /// Records a successful `set_power` dispatch, clearing any back-off.
    pub fn record_success(&mut self) {
        self.backoff_step = 0;
        self.blocked_until = None;
    }

    /// Returns the current health status as of `now`.
    pub fn status(&self, now: SystemTime) -> HealthStatus {
        if !self.combined_valid() {
            return HealthStatus::NotWorking;
        }
        match self.blocked_until {
            Some(until) if now < until => HealthStatus::Uncertain,
            _ => HealthStatus::Working,
        }
    }
}
