//! RAI Tray Core Library
//!
//! Keeps a single worker process alive for a desktop session: picks the
//! command line for the current operating mode, launches it, observes its
//! exit and decides whether and how to relaunch.
//!
//! # Example
//!
//! ```no_run
//! use rai_tray_core::{
//!     AppLayout, CommandResolver, HostPaths, LogNotifier, ModeController, OsLauncher,
//!     Supervisor,
//! };
//!
//! # async fn run() {
//! let layout = AppLayout::with_defaults("/opt/rai");
//! let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let mode = ModeController::new(HostPaths, layout.catalog_file.clone());
//! let resolver = CommandResolver::new(layout, HostPaths);
//! let mut supervisor = Supervisor::new(resolver, mode, OsLauncher::default(), LogNotifier, event_tx);
//!
//! supervisor.start_initial();
//! while let Some(event) = event_rx.recv().await {
//!     supervisor.handle_event(event);
//! }
//! # }
//! ```

mod error;
mod launch;
mod supervisor;

pub use {
    error::{Result as CoreResult, SupervisorError},
    launch::{
        AppLayout, CommandResolver, HostPaths, LaunchMode, LaunchSpec, ModeController, PathProbe,
        ShellProfile, ShellSyntax, Visibility, defaults, quote_arg,
    },
    supervisor::{
        ChildHandle, DEFAULT_EXIT_POLL_INTERVAL, DEFAULT_TERMINATE_GRACE, ExitObserver,
        LogNotifier, NotificationSink, OsChild, OsLauncher, ProcessLauncher, Severity, Supervisor,
        SupervisorEvent, SupervisorStatus,
    },
};
