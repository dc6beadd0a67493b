//! Process supervision state machine.
//!
//! All state lives here and is only mutated through `&mut self`, which the
//! owning control loop calls serially. Exit notifications from watcher
//! threads arrive as [`SupervisorEvent`]s on the loop's channel.

use crate::{
    CommandResolver, ExitObserver, LaunchMode, ModeController, NotificationSink, PathProbe,
    ProcessLauncher, Severity, SupervisorError, SupervisorEvent, Visibility,
    supervisor::SupervisedProcess,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Externally observable supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorStatus {
    /// No child is running.
    Idle,
    /// One child is running with the given visibility.
    Running(Visibility),
    /// Terminal: nothing will be started again.
    ShuttingDown,
}

/// Owns the single worker process and applies the restart policy.
pub struct Supervisor<P, L, N>
where
    P: PathProbe,
    L: ProcessLauncher,
    N: NotificationSink,
{
    resolver: CommandResolver<P>,
    mode: ModeController<P>,
    launcher: L,
    notifier: N,
    event_tx: mpsc::UnboundedSender<SupervisorEvent>,
    child: Option<SupervisedProcess<L::Handle>>,
    shutting_down: bool,
}

impl<P, L, N> Supervisor<P, L, N>
where
    P: PathProbe,
    L: ProcessLauncher,
    N: NotificationSink,
{
    /// Create an idle supervisor.
    ///
    /// Exit observers post to `event_tx`; the owner must feed everything
    /// received on the paired receiver back into [`Supervisor::handle_event`].
    pub fn new(
        resolver: CommandResolver<P>,
        mode: ModeController<P>,
        launcher: L,
        notifier: N,
        event_tx: mpsc::UnboundedSender<SupervisorEvent>,
    ) -> Self {
        Self {
            resolver,
            mode,
            launcher,
            notifier,
            event_tx,
            child: None,
            shutting_down: false,
        }
    }

    /// Current state.
    pub fn status(&self) -> SupervisorStatus {
        if self.shutting_down {
            return SupervisorStatus::ShuttingDown;
        }

        match &self.child {
            Some(process) => SupervisorStatus::Running(process.visibility),
            None => SupervisorStatus::Idle,
        }
    }

    /// Mode currently in effect.
    pub fn mode(&self) -> LaunchMode {
        self.mode.mode()
    }

    /// OS id of the tracked child, if any.
    pub fn child_pid(&self) -> Option<u32> {
        use crate::ChildHandle;

        self.child.as_ref().and_then(|process| process.handle.pid())
    }

    /// First launch after startup: setup runs visibly, the client silently.
    pub fn start_initial(&mut self) {
        let visibility = match self.mode.mode() {
            LaunchMode::Setup => Visibility::Visible,
            LaunchMode::Client => Visibility::Hidden,
        };
        self.start(visibility);
    }

    /// Launch the worker for the current mode, replacing any running child.
    pub fn start(&mut self, visibility: Visibility) {
        let mode = self.mode.mode();
        self.replace(mode, visibility);
    }

    /// User asked for an interactive console.
    ///
    /// No-op while a visible session is already tracked or after shutdown.
    #[instrument(skip(self))]
    pub fn open_terminal(&mut self) {
        match self.status() {
            SupervisorStatus::ShuttingDown => {
                debug!("Ignoring terminal request during shutdown");
            }
            SupervisorStatus::Running(Visibility::Visible) => {
                info!("Terminal already open");
            }
            SupervisorStatus::Idle | SupervisorStatus::Running(Visibility::Hidden) => {
                self.start(Visibility::Visible);
            }
        }
    }

    /// Apply an event received from an exit observer.
    pub fn handle_event(&mut self, event: SupervisorEvent) {
        match event {
            SupervisorEvent::Exited { run_id, code } => self.on_exit(run_id, code),
        }
    }

    /// Enter the terminal state and stop the child.
    ///
    /// Idempotent.
    #[instrument(skip(self))]
    pub fn request_exit(&mut self) {
        if self.shutting_down {
            return;
        }

        self.shutting_down = true;

        if let Some(process) = self.child.take() {
            process.force_stop();
        }

        info!("Supervisor shut down");
    }

    #[instrument(skip(self))]
    fn on_exit(&mut self, run_id: Uuid, code: Option<i32>) {
        if self.shutting_down {
            debug!(%run_id, "Exit ignored during shutdown");
            return;
        }

        let Some(process) = self.child.take_if(|process| process.run_id == run_id) else {
            debug!(%run_id, "Stale exit event ignored");
            return;
        };

        let visibility = process.visibility;
        // The child is gone; release its handle before deciding what is next.
        drop(process);

        info!(%run_id, ?code, ?visibility, "Worker exited");

        if self.mode.observe_exit() {
            self.notifier.notify(
                "Setup complete. Starting the assistant in the background.",
                Severity::Info,
            );
            self.replace(LaunchMode::Client, Visibility::Hidden);
            return;
        }

        if visibility.is_visible() {
            info!("Interactive session closed, relaunching in the background");
            self.start(Visibility::Hidden);
            return;
        }

        if code != Some(0) {
            let e = SupervisorError::UnexpectedExit {
                code,
                location: ErrorLocation::from(Location::caller()),
            };
            warn!(error = ?e, "Silent run ended with failure, not relaunching");
            self.notifier.notify(&e.user_message(), Severity::Warning);
        }
    }

    /// Stop whatever runs, then launch `mode` at `visibility`.
    ///
    /// The previous child is fully retired before the new one is spawned.
    /// Resolve and spawn failures are reported and leave the supervisor idle.
    #[instrument(skip(self))]
    fn replace(&mut self, mode: LaunchMode, visibility: Visibility) {
        if self.shutting_down {
            debug!("Start ignored during shutdown");
            return;
        }

        if let Some(previous) = self.child.take() {
            previous.force_stop();
        }

        let spec = match self.resolver.resolve(mode, visibility) {
            Ok(spec) => spec,
            Err(e) => {
                error!(error = ?e, "Could not resolve launch command");
                self.notifier.notify(&e.user_message(), Severity::Error);
                return;
            }
        };

        let run_id = Uuid::new_v4();
        let (observer, registration) = ExitObserver::new(run_id, self.event_tx.clone());

        match self.launcher.spawn(&spec, observer) {
            Ok(handle) => {
                info!(%run_id, command = %spec.command_line(), "Worker started");
                self.child = Some(SupervisedProcess {
                    run_id,
                    visibility,
                    handle,
                    registration,
                });
            }
            Err(e) => {
                registration.deregister();
                error!(error = ?e, "Could not start worker");
                self.notifier.notify(&e.user_message(), Severity::Error);
            }
        }
    }
}

impl<P, L, N> Drop for Supervisor<P, L, N>
where
    P: PathProbe,
    L: ProcessLauncher,
    N: NotificationSink,
{
    fn drop(&mut self) {
        self.request_exit();
    }
}
