//! Schedule progression worker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the worker that moves validated sessions to
/// `ongoing` and `completed` as their schedule elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between two progression ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
    /// Seconds to wait for an in-flight tick on shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tick_interval_seconds: default_tick_interval(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    60
}

fn default_shutdown_grace() -> u64 {
    10
}
