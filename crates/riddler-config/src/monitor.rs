use std::time::Duration;

use riddler_types::MatchPolicy;
use serde::{Deserialize, Serialize};

use crate::{env_flag, env_parse};

fn default_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pause between two cycles
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Keep capture files on disk for inspection
    pub retain_artifacts: bool,
    pub match_policy: MatchPolicy,
}

impl MonitorConfig {
    pub fn new() -> Self {
        let interval_ms = env_parse("RIDDLER_INTERVAL_MS").unwrap_or_else(default_interval_ms);
        let retain_artifacts = env_flag("RIDDLER_RETAIN_ARTIFACTS").unwrap_or(false);
        let match_policy = env_parse("RIDDLER_MATCH_POLICY").unwrap_or_default();

        Self {
            interval_ms,
            retain_artifacts,
            match_policy,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            retain_artifacts: false,
            match_policy: MatchPolicy::default(),
        }
    }
}
