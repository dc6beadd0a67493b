use rai_tray_core::defaults;

use serde::{Deserialize, Serialize};

/// Interpreter names probed locally and on the search path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Names that run without a console window, in preference order.
    pub windowless: Vec<String>,
    /// Console names, in preference order.
    pub console: Vec<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            windowless: defaults::WINDOWLESS.iter().map(|s| s.to_string()).collect(),
            console: defaults::CONSOLE.iter().map(|s| s.to_string()).collect(),
        }
    }
}
