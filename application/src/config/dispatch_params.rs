//! Dispatch parameters for a fan-out round.
//!
//! [`DispatchParams`] groups the static parameters of one fan-out round in
//! [`FanOutDispatcher`](crate::use_cases::dispatch::FanOutDispatcher).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on simultaneous backend calls
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Default wall-clock deadline for a whole round
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Fan-out round parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Maximum number of backend calls in flight at once.
    pub max_concurrency: usize,
    /// Single deadline for the whole round, measured from dispatch start.
    pub deadline: Duration,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl DispatchParams {
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}
