use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Supervision errors with source location tracking.
///
/// Every variant is non-fatal: the supervisor turns it into a notification
/// and stays idle.
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// A required script or file does not exist.
    #[error("Required file missing: {path:?} {location}")]
    MissingArtifact {
        /// Path that was expected to exist.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No interpreter candidate resolved to an executable.
    #[error("No usable interpreter found (tried: {}) {location}", tried.join(", "))]
    NoInterpreter {
        /// Every candidate probed, in order.
        tried: Vec<String>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS refused to create the process.
    #[error("Failed to spawn {program:?}: {source} {location}")]
    SpawnFailed {
        /// Program that was being launched.
        program: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Terminating or reaping a child failed.
    #[error("Failed to stop process: {source} {location}")]
    TerminateFailed {
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A silent run ended with a non-zero or missing exit code.
    #[error("Worker exited unexpectedly (code {code:?}) {location}")]
    UnexpectedExit {
        /// Exit code, `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SupervisorError {
    /// Short text for a desktop notification, without location noise.
    pub fn user_message(&self) -> String {
        match self {
            SupervisorError::MissingArtifact { path, .. } => {
                format!("Missing file: {}", path.display())
            }
            SupervisorError::NoInterpreter { .. } => {
                "No Python interpreter found. Install Python or create .venv.".to_string()
            }
            SupervisorError::SpawnFailed {
                program, source, ..
            } => format!("Could not start {}: {}", program.display(), source),
            SupervisorError::TerminateFailed { source, .. } => {
                format!("Could not stop the assistant: {}", source)
            }
            SupervisorError::UnexpectedExit {
                code: Some(code), ..
            } => format!("The assistant stopped with exit code {}", code),
            SupervisorError::UnexpectedExit { code: None, .. } => {
                "The assistant was terminated without an exit code".to_string()
            }
        }
    }
}

/// Result type alias using [`SupervisorError`].
pub type Result<T> = std::result::Result<T, SupervisorError>;
