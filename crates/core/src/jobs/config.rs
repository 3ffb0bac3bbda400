//! Job registry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the job registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Terminal jobs that were never retrieved are evicted (and their
    /// artifacts released) after this many seconds.
    #[serde(default = "default_retention")]
    pub retention_secs: u64,

    /// How often the retention sweep runs, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_retention() -> u64 {
    600 // 10 minutes
}

fn default_sweep_interval() -> u64 {
    30
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}
