use rai_tray_core::{ShellProfile, ShellSyntax};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Quoting rules for the configured shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellSyntaxSetting {
    /// POSIX `sh` single quoting.
    Posix,
    /// `cmd.exe` double quoting.
    Cmd,
}

impl From<ShellSyntax> for ShellSyntaxSetting {
    fn from(syntax: ShellSyntax) -> Self {
        match syntax {
            ShellSyntax::Posix => ShellSyntaxSetting::Posix,
            ShellSyntax::Cmd => ShellSyntaxSetting::Cmd,
        }
    }
}

impl From<ShellSyntaxSetting> for ShellSyntax {
    fn from(setting: ShellSyntaxSetting) -> Self {
        match setting {
            ShellSyntaxSetting::Posix => ShellSyntax::Posix,
            ShellSyntaxSetting::Cmd => ShellSyntax::Cmd,
        }
    }
}

/// Shell hosting setup runs and interactive sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell executable.
    pub program: PathBuf,
    /// How the command string is quoted: `posix` or `cmd`.
    pub syntax: ShellSyntaxSetting,
    /// Flag that keeps the shell open after the command.
    pub keep_open_flag: String,
    /// Flag that closes the shell after the command.
    pub close_flag: String,
    /// Text appended to the command when the shell stays open.
    pub keep_open_suffix: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let profile = ShellProfile::default();
        Self {
            program: profile.program,
            syntax: profile.syntax.into(),
            keep_open_flag: profile.keep_open_flag,
            close_flag: profile.close_flag,
            keep_open_suffix: profile.keep_open_suffix,
        }
    }
}

impl ShellConfig {
    /// Convert to the core shell profile.
    pub fn profile(&self) -> ShellProfile {
        ShellProfile {
            program: self.program.clone(),
            syntax: self.syntax.into(),
            keep_open_flag: self.keep_open_flag.clone(),
            close_flag: self.close_flag.clone(),
            keep_open_suffix: self.keep_open_suffix.clone(),
        }
    }
}
