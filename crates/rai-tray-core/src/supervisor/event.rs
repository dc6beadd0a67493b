use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::mpsc;
use uuid::Uuid;

/// Events delivered to the supervisor's control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A launched worker terminated.
    Exited {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },
}

/// Exit callback handed to a [`crate::ProcessLauncher`] for one run.
///
/// Safe to call from any thread. It never touches supervisor state: it only
/// enqueues a [`SupervisorEvent`] for the control loop, at most once, and only
/// while the run is still registered.
#[derive(Debug, Clone)]
pub struct ExitObserver {
    run_id: Uuid,
    registered: Arc<AtomicBool>,
    event_tx: mpsc::UnboundedSender<SupervisorEvent>,
}

/// Supervisor-side half of an [`ExitObserver`].
#[derive(Debug)]
pub(crate) struct Registration {
    registered: Arc<AtomicBool>,
}

impl ExitObserver {
    pub(crate) fn new(
        run_id: Uuid,
        event_tx: mpsc::UnboundedSender<SupervisorEvent>,
    ) -> (Self, Registration) {
        let registered = Arc::new(AtomicBool::new(true));
        let registration = Registration {
            registered: Arc::clone(&registered),
        };

        (
            Self {
                run_id,
                registered,
                event_tx,
            },
            registration,
        )
    }

    /// Run this observer reports for.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// `false` once the supervisor deregistered or the exit was reported.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Report the exit. Returns whether an event was posted.
    pub fn notify_exit(&self, code: Option<i32>) -> bool {
        if !self.registered.swap(false, Ordering::AcqRel) {
            return false;
        }

        self.event_tx
            .send(SupervisorEvent::Exited {
                run_id: self.run_id,
                code,
            })
            .is_ok()
    }
}

impl Registration {
    /// Stop the paired observer from posting anything further.
    pub(crate) fn deregister(&self) {
        self.registered.store(false, Ordering::Release);
    }
}
