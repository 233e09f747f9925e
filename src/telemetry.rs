// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Telemetry and status types exchanged between the health tracker, pool
//! status tracker, and resampling pipeline.

use std::collections::HashSet;
use std::time::SystemTime;

/// The operating state reported by a battery or inverter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentState {
    Idle,
    Charging,
    Discharging,
    SwitchingOff,
    Error,
    Unspecified,
}

impl ComponentState {
    /// Whether this state counts as a normal operating state.
    ///
    /// `Error`, `SwitchingOff`, and `Unspecified` are the non-operational
    /// states a valid message must not report.
    pub fn is_operational(self) -> bool {
        !matches!(
            self,
            ComponentState::Error | ComponentState::SwitchingOff | ComponentState::Unspecified
        )
    }
}

/// Whether a battery's relay is open or closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayState {
    Open,
    Closed,
}

/// The severity of a [`ComponentError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorLevel {
    Warn,
    Critical,
}

/// A single error reported alongside a telemetry sample.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentError {
    pub code: u32,
    pub level: ErrorLevel,
    pub msg: String,
}

impl ComponentError {
    pub fn new(code: u32, level: ErrorLevel, msg: impl Into<String>) -> Self {
        Self {
            code,
            level,
            msg: msg.into(),
        }
    }

    fn is_critical(&self) -> bool {
        self.level == ErrorLevel::Critical
    }
}

/// A battery telemetry message.
#[derive(Clone, Debug, PartialEq)]
pub struct BatteryData {
    pub component_id: u64,
    pub timestamp: SystemTime,
    pub component_state: ComponentState,
    pub relay_state: RelayState,
    pub errors: Vec<ComponentError>,
    pub capacity: f64,
}

impl BatteryData {
    /// Whether this message is valid per §4.3: fresh, relay closed,
    /// operational, no critical error, finite capacity.
    pub fn is_valid(&self, now: SystemTime, max_data_age: std::time::Duration) -> bool {
        is_fresh(self.timestamp, now, max_data_age)
            && self.relay_state == RelayState::Closed
            && self.component_state.is_operational()
            && !self.errors.iter().any(ComponentError::is_critical)
            && self.capacity.is_finite()
    }
}

/// An inverter telemetry message.
#[derive(Clone, Debug, PartialEq)]
pub struct InverterData {
    pub component_id: u64,
    pub timestamp: SystemTime,
    pub component_state: ComponentState,
    pub errors: Vec<ComponentError>,
}

impl InverterData {
    /// Whether this message is valid per §4.3: fresh, operational, no
    /// critical error. WARN-level errors alone do not invalidate.
    pub fn is_valid(&self, now: SystemTime, max_data_age: std::time::Duration) -> bool {
        is_fresh(self.timestamp, now, max_data_age)
            && self.component_state.is_operational()
            && !self.errors.iter().any(ComponentError::is_critical)
    }
}

fn is_fresh(timestamp: SystemTime, now: SystemTime, max_data_age: std::time::Duration) -> bool {
    match now.duration_since(timestamp) {
        Ok(age) => age <= max_data_age,
        // A timestamp in the future is trivially fresh.
        Err(_) => true,
    }
}

/// The coarse health of a component, as exported to consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    NotWorking,
    Working,
    Uncertain,
}

/// A downstream controller's report of which components honored a
/// dispatched power command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetPowerResult {
    pub succeeded: HashSet<u64>,
    pub failed: HashSet<u64>,
}

/// A roll-up of per-component health into a working-set view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentPoolStatus {
    pub working: HashSet<u64>,
    pub uncertain: HashSet<u64>,
}

/// Identifies which physical quantity a sample carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricId {
    Soc,
    Power,
    Voltage,
    Current,
    Frequency,
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MetricId::Soc => "soc",
            MetricId::Power => "power",
            MetricId::Voltage => "voltage",
            MetricId::Current => "current",
            MetricId::Frequency => "frequency",
        };
        write!(f, "{s}")
    }
}

/// A single measured value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity(pub f64);

/// A telemetry or resampled data point.
///
/// `value: None` represents a known gap in the data (the resampling window
/// had no input), distinct from a tick that hasn't happened yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: SystemTime,
    pub value: Option<Quantity>,
}
