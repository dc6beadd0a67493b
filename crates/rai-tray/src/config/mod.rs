mod interpreter_config;
mod logging_config;
mod notification_config;
mod paths_config;
mod shell_config;
mod supervisor_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {
    config::Config, interpreter_config::InterpreterConfig, logging_config::LoggingConfig,
    notification_config::NotificationConfig, paths_config::PathsConfig,
    shell_config::ShellConfig, supervisor_config::SupervisorConfig,
};

pub(crate) const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;
pub(crate) const DEFAULT_LOG_TO_FILE: bool = true;
pub(crate) const DEFAULT_LOG_FILTER: &str = "rai_tray=info,rai_tray_core=info";

pub(crate) fn default_notifications_enabled() -> bool {
    DEFAULT_NOTIFICATIONS_ENABLED
}

pub(crate) fn default_log_to_file() -> bool {
    DEFAULT_LOG_TO_FILE
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub(crate) fn default_exit_poll_ms() -> u64 {
    rai_tray_core::DEFAULT_EXIT_POLL_INTERVAL.as_millis() as u64
}

pub(crate) fn default_terminate_grace_ms() -> u64 {
    rai_tray_core::DEFAULT_TERMINATE_GRACE.as_millis() as u64
}
