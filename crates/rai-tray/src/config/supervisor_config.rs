use crate::config::{default_exit_poll_ms, default_terminate_grace_ms};

use rai_tray_core::OsLauncher;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Supervisor tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// How often the worker is polled for exit, in milliseconds.
    #[serde(default = "default_exit_poll_ms")]
    pub exit_poll_ms: u64,
    /// How long a stopped worker gets to exit before it is killed, in
    /// milliseconds.
    #[serde(default = "default_terminate_grace_ms")]
    pub terminate_grace_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            exit_poll_ms: default_exit_poll_ms(),
            terminate_grace_ms: default_terminate_grace_ms(),
        }
    }
}

impl SupervisorConfig {
    /// Exit poll interval, never below 10 ms.
    pub fn exit_poll_interval(&self) -> Duration {
        Duration::from_millis(self.exit_poll_ms.max(10))
    }

    /// Grace period between the stop request and the kill.
    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }

    /// Process launcher configured from these settings.
    pub fn launcher(&self) -> OsLauncher {
        OsLauncher::new(self.exit_poll_interval()).with_terminate_grace(self.terminate_grace())
    }
}
