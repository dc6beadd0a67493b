//! [`ProcessLauncher`] backed by `std::process`.
//!
//! Each child gets a named watcher thread that polls `try_wait` and fires the
//! run's [`ExitObserver`]. The watcher shares the `Child` with the handle
//! behind a mutex, only holding the lock for the non-blocking poll, so a
//! forced stop can always get in to kill and reap.
//!
//! Children lead their own process group (on Windows, their own process
//! tree), and termination targets the whole group: the shell wrapping a setup
//! script or an interactive session takes the script and interpreter with it.

use crate::{
    ChildHandle, CoreResult, ExitObserver, LaunchSpec, ProcessLauncher, SupervisorError,
    Visibility,
};

use std::{
    io,
    panic::Location,
    process::{Child, Command, Stdio},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// How often watcher threads poll their child for exit.
pub const DEFAULT_EXIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How long a terminated process group gets to exit before it is killed.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// Poll step while waiting out the terminate grace period.
const GRACE_POLL: Duration = Duration::from_millis(20);

/// Launches real OS processes.
#[derive(Debug, Clone)]
pub struct OsLauncher {
    poll_interval: Duration,
    terminate_grace: Duration,
}

impl Default for OsLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_EXIT_POLL_INTERVAL)
    }
}

impl OsLauncher {
    /// Create a launcher whose watchers poll every `poll_interval`.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            terminate_grace: DEFAULT_TERMINATE_GRACE,
        }
    }

    /// Time children get between the polite stop request and the kill.
    pub fn with_terminate_grace(mut self, grace: Duration) -> Self {
        self.terminate_grace = grace;
        self
    }
}

/// Handle to a child launched by [`OsLauncher`].
#[derive(Debug)]
pub struct OsChild {
    pid: u32,
    child: Arc<Mutex<Child>>,
    terminate_grace: Duration,
}

/// How hard to ask a process tree to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Graceful,
    Force,
}

impl ProcessLauncher for OsLauncher {
    type Handle = OsChild;

    #[track_caller]
    #[instrument(skip(self, spec, observer), fields(run_id = %observer.run_id()))]
    fn spawn(&mut self, spec: &LaunchSpec, observer: ExitObserver) -> CoreResult<OsChild> {
        let mut command = Command::new(spec.program());
        command.current_dir(spec.working_dir());
        apply_args(&mut command, spec.args());
        apply_visibility(&mut command, spec.visibility());
        isolate_tree(&mut command);

        let child = command.spawn().map_err(|source| SupervisorError::SpawnFailed {
            program: spec.program().to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id();
        let child = Arc::new(Mutex::new(child));
        let watched = Arc::clone(&child);
        let interval = self.poll_interval;

        let watcher = thread::Builder::new()
            .name(format!("exit-watch-{}", pid))
            .spawn(move || watch_exit(watched, observer, interval));

        if let Err(source) = watcher {
            // Without a watcher the exit would never be observed.
            let _ = signal_tree(pid, Stop::Force);
            let mut guard = lock(&child);
            let _ = guard.kill();
            let _ = guard.wait();
            return Err(SupervisorError::SpawnFailed {
                program: spec.program().to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(pid, command = %spec.command_line(), "Process spawned");

        Ok(OsChild {
            pid,
            child,
            terminate_grace: self.terminate_grace,
        })
    }
}

impl ChildHandle for OsChild {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    /// Ask the whole process tree to stop, then kill whatever is left once
    /// the grace period runs out.
    #[track_caller]
    fn terminate(&mut self) -> CoreResult<()> {
        if let Err(e) = signal_tree(self.pid, Stop::Graceful) {
            debug!(pid = self.pid, error = ?e, "Graceful stop request failed");
        }

        let deadline = Instant::now() + self.terminate_grace;
        while self.tree_alive() {
            if Instant::now() >= deadline {
                debug!(pid = self.pid, "Grace period over, killing process tree");
                let killed = signal_tree(self.pid, Stop::Force);
                // The leader itself, in case the tree signal could not reach it.
                let _ = lock(&self.child).kill();
                return killed.map_err(|source| SupervisorError::TerminateFailed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            thread::sleep(GRACE_POLL);
        }

        Ok(())
    }

    #[track_caller]
    fn wait(&mut self) -> CoreResult<Option<i32>> {
        lock(&self.child)
            .wait()
            .map(|status| status.code())
            .map_err(|source| SupervisorError::TerminateFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl OsChild {
    /// Whether anything in the child's process tree still runs.
    ///
    /// Reaps the leader on the way so its zombie does not count as alive.
    #[cfg(unix)]
    fn tree_alive(&self) -> bool {
        let _ = lock(&self.child).try_wait();
        nix::sys::signal::killpg(group_id(self.pid), None).is_ok()
    }

    #[cfg(not(unix))]
    fn tree_alive(&self) -> bool {
        matches!(lock(&self.child).try_wait(), Ok(None))
    }
}

fn lock(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

fn watch_exit(child: Arc<Mutex<Child>>, observer: ExitObserver, interval: Duration) {
    loop {
        if !observer.is_registered() {
            debug!(run_id = %observer.run_id(), "Exit watcher deregistered");
            return;
        }

        let polled = lock(&child).try_wait();

        match polled {
            Ok(Some(status)) => {
                debug!(run_id = %observer.run_id(), code = ?status.code(), "Exit observed");
                observer.notify_exit(status.code());
                return;
            }
            Ok(None) => thread::sleep(interval),
            Err(e) => {
                warn!(run_id = %observer.run_id(), error = ?e, "Exit poll failed, reporting as exited");
                observer.notify_exit(None);
                return;
            }
        }
    }
}

#[cfg(unix)]
fn isolate_tree(command: &mut Command) {
    use std::os::unix::process::CommandExt;

    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate_tree(_command: &mut Command) {}

#[cfg(unix)]
#[allow(clippy::cast_possible_wrap)]
fn group_id(pid: u32) -> nix::unistd::Pid {
    nix::unistd::Pid::from_raw(pid as i32)
}

/// Signal the process group led by `pid`. A group that is already gone is
/// not an error.
#[cfg(unix)]
fn signal_tree(pid: u32, stop: Stop) -> io::Result<()> {
    use nix::{errno::Errno, sys::signal::Signal};

    let signal = match stop {
        Stop::Graceful => Signal::SIGTERM,
        Stop::Force => Signal::SIGKILL,
    };

    match nix::sys::signal::killpg(group_id(pid), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

/// Stop the process tree rooted at `pid` with `taskkill /T`.
#[cfg(windows)]
fn signal_tree(pid: u32, stop: Stop) -> io::Result<()> {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let mut command = Command::new("taskkill");
    if stop == Stop::Force {
        command.arg("/F");
    }

    let status = command
        .args(["/T", "/PID", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(CREATE_NO_WINDOW)
        .status()?;

    // Non-zero also covers a tree that already exited.
    if !status.success() {
        debug!(pid, ?stop, code = ?status.code(), "taskkill reported failure");
    }

    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn signal_tree(_pid: u32, _stop: Stop) -> io::Result<()> {
    Ok(())
}

#[cfg(windows)]
fn apply_args(command: &mut Command, args: &[String]) {
    use std::os::windows::process::CommandExt;

    // cmd.exe does not understand the MSVCRT escaping `arg()` applies.
    for arg in args {
        command.raw_arg(crate::quote_arg(arg).as_ref());
    }
}

#[cfg(not(windows))]
fn apply_args(command: &mut Command, args: &[String]) {
    command.args(args);
}

fn apply_visibility(command: &mut Command, visibility: Visibility) {
    if visibility == Visibility::Hidden {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;

        const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;

        command.creation_flags(match visibility {
            Visibility::Visible => CREATE_NEW_CONSOLE,
            Visibility::Hidden => CREATE_NO_WINDOW,
        });
    }
}
