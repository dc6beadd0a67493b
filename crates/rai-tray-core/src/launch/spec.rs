use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

/// Whether the worker's console is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Interactive: console window stays open so output can be read.
    Visible,
    /// Silent: no window, output discarded.
    Hidden,
}

impl Visibility {
    /// `true` for [`Visibility::Visible`].
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Fully resolved launch of one worker process.
///
/// Produced fresh by the resolver for every launch decision and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
    visibility: Visibility,
}

impl LaunchSpec {
    /// Build a spec. Arguments are passed through verbatim; a shell command
    /// string must already carry its own inner quoting.
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
        visibility: Visibility,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: working_dir.into(),
            visibility,
        }
    }

    /// Executable to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, unquoted.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Directory the process starts in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Console visibility requested for this launch.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Arguments joined into one string, each quoted where needed.
    pub fn argument_string(&self) -> String {
        self.args
            .iter()
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Quoted program followed by [`LaunchSpec::argument_string`].
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let program = quote_arg(&program);
        if self.args.is_empty() {
            program.into_owned()
        } else {
            format!("{} {}", program, self.argument_string())
        }
    }
}

/// Wrap `arg` in double quotes when it is empty or contains whitespace.
///
/// An argument that is already a single quoted token is left alone. One with
/// interior quotes (a shell command string) gets an outer pair, which is what
/// `cmd.exe /c` and `/k` strip.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    let already_quoted = arg.len() >= 2
        && arg.starts_with('"')
        && arg.ends_with('"')
        && !arg[1..arg.len() - 1].contains('"');

    if already_quoted || (!arg.is_empty() && !arg.chars().any(char::is_whitespace)) {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("\"{}\"", arg))
    }
}
