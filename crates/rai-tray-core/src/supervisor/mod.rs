mod event;
mod launcher;
mod notify;
mod os_launcher;
mod process;
#[allow(clippy::module_inception)]
mod supervisor;

pub(crate) use {event::Registration, process::SupervisedProcess};

pub use {
    event::{ExitObserver, SupervisorEvent},
    launcher::{ChildHandle, ProcessLauncher},
    notify::{LogNotifier, NotificationSink, Severity},
    os_launcher::{DEFAULT_EXIT_POLL_INTERVAL, DEFAULT_TERMINATE_GRACE, OsChild, OsLauncher},
    supervisor::{Supervisor, SupervisorStatus},
};
