use rai_tray_core::defaults;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the worker's files live.
///
/// Relative paths are resolved against `app_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Application directory (None = directory of the rai-tray executable).
    pub app_dir: Option<PathBuf>,
    /// Evidence file whose presence selects client mode.
    pub catalog_file: PathBuf,
    /// Setup driver script.
    pub setup_script: PathBuf,
    /// Client entry script.
    pub entry_script: PathBuf,
    /// Project-local interpreter directory.
    pub interpreter_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app_dir: None,
            catalog_file: PathBuf::from(defaults::CATALOG_FILE),
            setup_script: PathBuf::from(defaults::SETUP_SCRIPT),
            entry_script: PathBuf::from(defaults::ENTRY_SCRIPT),
            interpreter_dir: PathBuf::from(defaults::INTERPRETER_DIR),
        }
    }
}
