//! Scheduler configuration.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Top-level scheduler configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the scheduler builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Milliseconds between pulses.  Default: 50.
    pub update_interval_ms: u64,

    /// Global enable flag.  When `false`, pulses are skipped without
    /// unregistering anything.
    pub active: bool,

    /// Root seed handed to stochastic nodes built through the scheduler.
    pub seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 50,
            active:             true,
            seed:               0,
        }
    }
}

impl SchedulerConfig {
    #[inline]
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.update_interval_ms == 0 {
            return Err(CoreError::Config("update_interval_ms must be positive".into()));
        }
        Ok(())
    }
}
