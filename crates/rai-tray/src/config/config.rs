//! Configuration management for rai-tray.
//!
//! Handles loading and saving the TOML configuration file with cross-platform
//! paths and atomic writes, and turns it into the core launch layout.

use crate::{
    AppError, AppResult,
    config::{
        InterpreterConfig, LoggingConfig, NotificationConfig, PathsConfig, ShellConfig,
        SupervisorConfig,
    },
};

use rai_tray_core::AppLayout;

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Worker file locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Interpreter discovery names.
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    /// Shell used for setup and interactive sessions.
    #[serde(default)]
    pub shell: ShellConfig,
    /// Supervisor tuning.
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    /// Desktop notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Runs before logging is initialised, so failures are returned rather
    /// than logged here.
    #[track_caller]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            Self::parse(&contents)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Parse configuration text. Missing sections and fields take defaults.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Build the launch layout, anchoring relative paths at the app directory.
    ///
    /// The app directory defaults to the directory holding the running
    /// executable, so launched scripts see the same relative paths no matter
    /// where rai-tray was started from.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn layout(&self) -> AppResult<AppLayout> {
        let app_dir = match &self.paths.app_dir {
            Some(dir) => dir.clone(),
            None => Self::executable_dir()?,
        };

        let layout = self.layout_in(&app_dir);

        debug!(app_dir = ?layout.app_dir, catalog = ?layout.catalog_file, "Launch layout resolved");

        Ok(layout)
    }

    /// Build the launch layout rooted at `app_dir`.
    pub fn layout_in(&self, app_dir: &Path) -> AppLayout {
        let mut layout = AppLayout::with_defaults(app_dir);

        layout.catalog_file = layout.anchor(&self.paths.catalog_file);
        layout.setup_script = layout.anchor(&self.paths.setup_script);
        layout.entry_script = layout.anchor(&self.paths.entry_script);
        layout.interpreter_dir = layout.anchor(&self.paths.interpreter_dir);
        layout.windowless_interpreters = self.interpreter.windowless.clone();
        layout.console_interpreters = self.interpreter.console.clone();
        layout.shell = self.shell.profile();

        layout
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory for log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("logs"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "rai", "RAI-Tray").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn executable_dir() -> AppResult<PathBuf> {
        let exe = std::env::current_exe()?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::ConfigError {
                reason: format!("Executable has no parent directory: {:?}", exe),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let config = Config::default();
        config.save_to(config_path)?;
        Ok(config)
    }
}
