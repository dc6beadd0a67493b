use crate::{CoreResult, ExitObserver, LaunchSpec};

/// A live child process owned by the supervisor.
///
/// Dropping the handle releases it.
pub trait ChildHandle {
    /// OS process id, if known.
    fn pid(&self) -> Option<u32>;

    /// End the process and everything it started: a polite stop request
    /// first, a kill once the grace period runs out.
    fn terminate(&mut self) -> CoreResult<()>;

    /// Block until the process has exited and return its exit code.
    fn wait(&mut self) -> CoreResult<Option<i32>>;
}

/// Process creation boundary.
pub trait ProcessLauncher {
    /// Handle type for launched children.
    type Handle: ChildHandle;

    /// Launch `spec` and arrange for `observer` to fire when it exits.
    ///
    /// # Errors
    ///
    /// `SpawnFailed` when the OS cannot create the process.
    fn spawn(&mut self, spec: &LaunchSpec, observer: ExitObserver) -> CoreResult<Self::Handle>;
}
