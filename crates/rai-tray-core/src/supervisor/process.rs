use crate::{ChildHandle, Visibility, supervisor::Registration};

use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The single child currently tracked by the supervisor.
pub(crate) struct SupervisedProcess<H> {
    pub(crate) run_id: Uuid,
    pub(crate) visibility: Visibility,
    pub(crate) handle: H,
    pub(crate) registration: Registration,
}

impl<H: ChildHandle> SupervisedProcess<H> {
    /// Forced stop: deregister, terminate, wait, release.
    ///
    /// Best-effort. Failures are logged and swallowed because this runs on
    /// replace and shutdown paths.
    #[instrument(skip(self), fields(run_id = %self.run_id, pid = ?self.handle.pid()))]
    pub(crate) fn force_stop(mut self) {
        self.registration.deregister();

        if let Err(e) = self.handle.terminate() {
            debug!(error = ?e, "Terminate failed, process may already be gone");
        }

        match self.handle.wait() {
            Ok(code) => debug!(?code, "Process reaped"),
            Err(e) => debug!(error = ?e, "Wait after terminate failed"),
        }

        // Dropping `self` releases the handle.
        info!("Worker stopped");
    }
}
