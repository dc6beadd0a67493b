use crate::quote_arg;

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

/// Quoting rules of the shell that parses the command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellSyntax {
    /// `sh` and friends: single quotes, nothing expands inside them.
    Posix,
    /// `cmd.exe`: double quotes.
    Cmd,
}

impl ShellSyntax {
    /// Quote `arg` as one word for this shell.
    pub fn quote(self, arg: &str) -> Cow<'_, str> {
        match self {
            ShellSyntax::Posix => posix_quote(arg),
            ShellSyntax::Cmd => quote_arg(arg),
        }
    }
}

/// Command shell used for setup runs and interactive sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProfile {
    /// Shell executable.
    pub program: PathBuf,
    /// How words in the command string are quoted.
    pub syntax: ShellSyntax,
    /// Flag that runs a command and keeps the shell open afterwards.
    pub keep_open_flag: String,
    /// Flag that runs a command and exits.
    pub close_flag: String,
    /// Appended to the command string when the shell must stay open.
    pub keep_open_suffix: String,
}

impl Default for ShellProfile {
    #[cfg(windows)]
    fn default() -> Self {
        Self {
            program: PathBuf::from("cmd.exe"),
            syntax: ShellSyntax::Cmd,
            keep_open_flag: "/k".to_string(),
            close_flag: "/c".to_string(),
            keep_open_suffix: String::new(),
        }
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self {
            program: PathBuf::from("sh"),
            syntax: ShellSyntax::Posix,
            keep_open_flag: "-c".to_string(),
            close_flag: "-c".to_string(),
            keep_open_suffix: "; exec sh".to_string(),
        }
    }
}

/// Every path the resolver and mode controller look at.
///
/// All paths are absolute; [`AppLayout::with_defaults`] anchors the default
/// names to the application directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    /// Application directory, working directory of every launch.
    pub app_dir: PathBuf,
    /// Evidence file written by setup. Its presence selects client mode.
    pub catalog_file: PathBuf,
    /// Script run through the shell in setup mode.
    pub setup_script: PathBuf,
    /// Script run by the interpreter in client mode.
    pub entry_script: PathBuf,
    /// Project-local interpreter directory (e.g. `.venv/bin`).
    pub interpreter_dir: PathBuf,
    /// Interpreter names that do not open a console, in preference order.
    pub windowless_interpreters: Vec<String>,
    /// Console interpreter names, in preference order.
    pub console_interpreters: Vec<String>,
    /// Shell used to host setup and interactive runs.
    pub shell: ShellProfile,
}

/// Platform default names used by [`AppLayout::with_defaults`].
pub mod defaults {
    /// Evidence file name.
    pub const CATALOG_FILE: &str = "apps.json";
    /// Client entry script name.
    pub const ENTRY_SCRIPT: &str = "client.py";

    /// Setup driver script name.
    #[cfg(windows)]
    pub const SETUP_SCRIPT: &str = "setup.bat";
    /// Setup driver script name.
    #[cfg(not(windows))]
    pub const SETUP_SCRIPT: &str = "setup.sh";

    /// Project-local interpreter directory.
    #[cfg(windows)]
    pub const INTERPRETER_DIR: &str = ".venv/Scripts";
    /// Project-local interpreter directory.
    #[cfg(not(windows))]
    pub const INTERPRETER_DIR: &str = ".venv/bin";

    /// Interpreters that run without a console window.
    #[cfg(windows)]
    pub const WINDOWLESS: &[&str] = &["pythonw"];
    /// Interpreters that run without a console window.
    #[cfg(not(windows))]
    pub const WINDOWLESS: &[&str] = &["python3", "python"];

    /// Console interpreters.
    #[cfg(windows)]
    pub const CONSOLE: &[&str] = &["python", "py"];
    /// Console interpreters.
    #[cfg(not(windows))]
    pub const CONSOLE: &[&str] = &["python3", "python"];
}

impl AppLayout {
    /// Layout with the platform default names under `app_dir`.
    pub fn with_defaults(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();

        Self {
            catalog_file: app_dir.join(defaults::CATALOG_FILE),
            setup_script: app_dir.join(defaults::SETUP_SCRIPT),
            entry_script: app_dir.join(defaults::ENTRY_SCRIPT),
            interpreter_dir: app_dir.join(defaults::INTERPRETER_DIR),
            windowless_interpreters: to_owned(defaults::WINDOWLESS),
            console_interpreters: to_owned(defaults::CONSOLE),
            shell: ShellProfile::default(),
            app_dir,
        }
    }

    /// Resolve `name` against the application directory unless absolute.
    pub fn anchor(&self, name: &Path) -> PathBuf {
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.app_dir.join(name)
        }
    }
}

/// Single-quote `arg` unless it only holds characters `sh` takes literally.
fn posix_quote(arg: &str) -> Cow<'_, str> {
    let literal = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c));

    if literal {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
