// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Exponential back-off applied after a failed `set_power` dispatch.

use std::time::Duration;

/// Returns the blocking duration for the `step`-th consecutive failure
/// (1-indexed): 1s, 2s, 4s, 8s, 16s, 30s, 30s, ... capped at `max`.
pub fn backoff_duration(step: u32, max: Duration) -> Duration {
    if step == 0 {
        return Duration::ZERO;
    }
    let exponent = step.saturating_sub(1).min(30);
    let seconds = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    Duration::from_secs(seconds).min(max)
}
