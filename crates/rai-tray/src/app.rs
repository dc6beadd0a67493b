use crate::{
    AppCommand, AppError, AppResult, DesktopNotifier, TrayCommand, TrayIconState, TrayMenuIds,
};

use rai_tray_core::{
    AppLayout, CommandResolver, HostPaths, ModeController, OsLauncher, Supervisor,
    SupervisorEvent,
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Supervisor wired to the real filesystem, OS processes and desktop
/// notifications.
pub type TraySupervisor = Supervisor<HostPaths, OsLauncher, DesktopNotifier>;

/// Control loop state.
///
/// Runs on the async runtime thread and is the only owner of the
/// supervisor, so every transition happens here, one at a time. Tray icon
/// updates go back to the main thread via `tray_proxy` because `TrayIcon`
/// is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) supervisor: TraySupervisor,
    pub(crate) supervisor_rx: mpsc::UnboundedReceiver<SupervisorEvent>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) menu_ids: TrayMenuIds,
    pub(crate) last_tray_state: Option<TrayIconState>,
}

impl App {
    /// Wire a supervisor for `layout` and the channels feeding it.
    pub(crate) fn new(
        layout: AppLayout,
        launcher: OsLauncher,
        notifier: DesktopNotifier,
        tray_proxy: EventLoopProxy<TrayCommand>,
        menu_ids: TrayMenuIds,
    ) -> Self {
        let (event_tx, supervisor_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(32);

        let mode = ModeController::new(HostPaths, layout.catalog_file.clone());
        let resolver = CommandResolver::new(layout, HostPaths);
        let supervisor = Supervisor::new(
            resolver,
            mode,
            launcher,
            notifier,
            event_tx,
        );

        Self {
            supervisor,
            supervisor_rx,
            tray_proxy,
            command_tx,
            command_rx,
            menu_ids,
            last_tray_state: None,
        }
    }

    /// Run the control loop until exit is requested.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(mode = ?self.supervisor.mode(), "RAI tray starting");

        // Menu forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() has a blocking recv(), so one thread forwards
        // clicks without polling. When command_rx is closed (loop breaks),
        // blocking_send() fails and the task ends on the next click.
        let command_tx = self.command_tx.clone();
        let menu_ids = self.menu_ids.clone();
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                let Some(cmd) = menu_ids.command_for(&event.id) else {
                    continue;
                };
                if command_tx.blocking_send(cmd).is_err() {
                    break;
                }
            }
        });

        self.supervisor.start_initial();
        self.refresh_tray();

        loop {
            tokio::select! {
                Some(event) = self.supervisor_rx.recv() => {
                    self.supervisor.handle_event(event);
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::OpenTerminal => {
                            info!("Terminal requested from tray menu");
                            self.supervisor.open_terminal();
                        }
                        AppCommand::Exit => {
                            info!("Exit requested from tray menu");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }

            self.refresh_tray();
        }

        self.supervisor.request_exit();
        self.command_rx.close();

        if let Err(e) = self.send_tray(TrayCommand::Shutdown) {
            error!(error = ?e, "Failed to ask UI thread to exit");
        }

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        info!("RAI tray shut down successfully");

        Ok(())
    }

    /// Push the icon state implied by the supervisor, if it changed.
    fn refresh_tray(&mut self) {
        let state =
            TrayIconState::from_supervisor(self.supervisor.status(), self.supervisor.mode());

        if self.last_tray_state == Some(state) {
            return;
        }

        match self.send_tray(TrayCommand::SetState(state)) {
            Ok(()) => self.last_tray_state = Some(state),
            Err(e) => warn!(error = ?e, "Failed to update tray state"),
        }
    }

    #[track_caller]
    fn send_tray(&self, cmd: TrayCommand) -> AppResult<()> {
        self.tray_proxy
            .send_event(cmd)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("UI event loop closed: {:?}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
