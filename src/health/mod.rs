// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Battery/inverter pair health tracking (back-off on `set_power` failure,
//! validity-driven status).

mod backoff;
mod state;
mod tracker;

pub use backoff::backoff_duration;
pub use state::HealthCore;
pub use tracker::ComponentHealthTracker;
