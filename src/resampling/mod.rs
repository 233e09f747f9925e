// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Resampled-metric subscription dispatch.

mod dispatcher;
mod request;

pub use dispatcher::ResamplingDispatcher;
pub use request::ComponentMetricRequest;
