//! Turns a (mode, visibility) pair into a concrete [`LaunchSpec`].

use crate::{
    AppLayout, CoreResult, LaunchMode, LaunchSpec, PathProbe, SupervisorError, Visibility,
};

use std::{
    fmt,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// One place an interpreter may be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InterpreterCandidate {
    /// A file inside the project-local interpreter directory.
    Local(PathBuf),
    /// A bare name looked up on the search path.
    OnPath(String),
}

impl fmt::Display for InterpreterCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpreterCandidate::Local(path) => write!(f, "{}", path.display()),
            InterpreterCandidate::OnPath(name) => write!(f, "{} (PATH)", name),
        }
    }
}

/// Resolves launch commands against an [`AppLayout`].
#[derive(Debug)]
pub struct CommandResolver<P> {
    layout: AppLayout,
    probe: P,
}

impl<P: PathProbe> CommandResolver<P> {
    /// Create a resolver over `layout`, checking paths with `probe`.
    pub fn new(layout: AppLayout, probe: P) -> Self {
        Self { layout, probe }
    }

    /// Layout this resolver checks.
    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    /// Produce the launch spec for `mode` at `visibility`.
    ///
    /// # Errors
    ///
    /// `MissingArtifact` when the setup or entry script is absent,
    /// `NoInterpreter` when no interpreter candidate is executable.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resolve(&self, mode: LaunchMode, visibility: Visibility) -> CoreResult<LaunchSpec> {
        let spec = match mode {
            LaunchMode::Setup => self.resolve_setup(visibility)?,
            LaunchMode::Client => self.resolve_client(visibility)?,
        };

        debug!(command = %spec.command_line(), "Launch command resolved");

        Ok(spec)
    }

    #[track_caller]
    fn resolve_setup(&self, visibility: Visibility) -> CoreResult<LaunchSpec> {
        self.require(&self.layout.setup_script)?;

        let script = self.layout.setup_script.to_string_lossy();
        let command = self.layout.shell.syntax.quote(&script).into_owned();
        Ok(self.shell_spec(command, visibility))
    }

    #[track_caller]
    fn resolve_client(&self, visibility: Visibility) -> CoreResult<LaunchSpec> {
        self.require(&self.layout.entry_script)?;
        let interpreter = self.find_interpreter(visibility)?;

        match visibility {
            Visibility::Visible => {
                let interpreter = interpreter.to_string_lossy();
                let script = self.layout.entry_script.to_string_lossy();
                let syntax = self.layout.shell.syntax;
                let command = format!(
                    "{} {}",
                    syntax.quote(&interpreter),
                    syntax.quote(&script)
                );
                Ok(self.shell_spec(command, visibility))
            }
            Visibility::Hidden => Ok(LaunchSpec::new(
                interpreter,
                vec![self.layout.entry_script.to_string_lossy().into_owned()],
                &self.layout.app_dir,
                visibility,
            )),
        }
    }

    /// Find the first executable interpreter for `visibility`.
    ///
    /// # Errors
    ///
    /// `NoInterpreter` listing every candidate tried.
    #[track_caller]
    pub fn find_interpreter(&self, visibility: Visibility) -> CoreResult<PathBuf> {
        let candidates = self.interpreter_candidates(visibility);

        for candidate in &candidates {
            let path = match candidate {
                InterpreterCandidate::Local(path) => Some(path.clone()),
                InterpreterCandidate::OnPath(name) => self.probe.search(name),
            };

            if let Some(path) = path.filter(|p| self.probe.is_executable(p)) {
                debug!(interpreter = ?path, "Interpreter selected");
                return Ok(path);
            }
        }

        Err(SupervisorError::NoInterpreter {
            tried: candidates.iter().map(ToString::to_string).collect(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Probe order: local variant matching `visibility`, then the search
    /// path with the matching variant before the other one.
    pub(crate) fn interpreter_candidates(&self, visibility: Visibility) -> Vec<InterpreterCandidate> {
        let (preferred, fallback) = match visibility {
            Visibility::Hidden => (
                &self.layout.windowless_interpreters,
                &self.layout.console_interpreters,
            ),
            Visibility::Visible => (
                &self.layout.console_interpreters,
                &self.layout.windowless_interpreters,
            ),
        };

        let mut candidates: Vec<InterpreterCandidate> = preferred
            .iter()
            .map(|name| InterpreterCandidate::Local(self.local_interpreter(name)))
            .collect();

        for name in preferred.iter().chain(fallback) {
            let candidate = InterpreterCandidate::OnPath(name.clone());
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    fn local_interpreter(&self, name: &str) -> PathBuf {
        if Path::new(name).extension().is_some() || std::env::consts::EXE_SUFFIX.is_empty() {
            self.layout.interpreter_dir.join(name)
        } else {
            self.layout
                .interpreter_dir
                .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
        }
    }

    fn shell_spec(&self, command: String, visibility: Visibility) -> LaunchSpec {
        let shell = &self.layout.shell;
        let (flag, command) = match visibility {
            Visibility::Visible => (
                shell.keep_open_flag.clone(),
                format!("{}{}", command, shell.keep_open_suffix),
            ),
            Visibility::Hidden => (shell.close_flag.clone(), command),
        };

        LaunchSpec::new(
            shell.program.clone(),
            vec![flag, command],
            &self.layout.app_dir,
            visibility,
        )
    }

    #[track_caller]
    fn require(&self, path: &Path) -> CoreResult<()> {
        if self.probe.exists(path) {
            Ok(())
        } else {
            Err(SupervisorError::MissingArtifact {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}
