#![allow(clippy::unwrap_used)]

use crate::{
    LaunchMode, Severity, SupervisorEvent, SupervisorStatus, Visibility,
    tests::fakes::{Harness, local_interpreter},
};

/// WHAT: Without a catalog the first launch is the setup script, visible
/// WHY: The user has to answer the setup prompts in a console
#[test]
fn given_missing_catalog_when_starting_initial_then_setup_runs_visible() {
    // Given: No catalog on disk
    let mut h = Harness::new(false);

    // When: Starting for the first time
    h.supervisor.start_initial();

    // Then: The shell runs the setup script and stays open
    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].program(), h.layout.shell.program.as_path());
    assert_eq!(spawned[0].args()[0], h.layout.shell.keep_open_flag);
    assert_eq!(spawned[0].visibility(), Visibility::Visible);
    assert_eq!(h.supervisor.mode(), LaunchMode::Setup);
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Visible)
    );
}

/// WHAT: With a catalog the first launch is the client, silent
/// WHY: A configured assistant should run in the background
#[test]
fn given_catalog_when_starting_initial_then_client_runs_hidden() {
    // Given: Catalog already generated
    let mut h = Harness::new(true);

    // When: Starting for the first time
    h.supervisor.start_initial();

    // Then: The windowless interpreter runs the entry script directly
    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(
        spawned[0].program(),
        local_interpreter(&h.layout, "pythonw").as_path()
    );
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Hidden)
    );
}

/// WHAT: Setup exit after the catalog appears hands off to a silent client
/// WHY: This is the first-run flow end to end
#[test]
fn given_setup_running_when_it_writes_catalog_and_exits_then_client_relaunched_silently() {
    // Given: Setup running visibly
    let mut h = Harness::new(false);
    h.supervisor.start_initial();

    // When: The setup script writes the catalog and exits
    h.paths.add_file(&h.layout.catalog_file);
    assert!(h.launcher.exit_last(Some(0)));
    assert_eq!(h.drain(), 1);

    // Then: Mode flips to Client and a hidden client run is in flight
    assert_eq!(h.supervisor.mode(), LaunchMode::Client);
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Hidden)
    );

    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 2);
    assert_eq!(
        spawned[1].program(),
        local_interpreter(&h.layout, "pythonw").as_path()
    );
    assert_eq!(
        spawned[1].args(),
        &[h.layout.entry_script.to_string_lossy().into_owned()]
    );
    assert_eq!(h.notifier.count(Severity::Info), 1);
    assert_eq!(h.launcher.live(), 1);
}

/// WHAT: A visible setup that exits without a catalog relaunches setup silently
/// WHY: Interactive sessions always bounce back to the background
#[test]
fn given_visible_setup_when_exits_without_catalog_then_setup_relaunched_hidden() {
    // Given: Setup running visibly, catalog never written
    let mut h = Harness::new(false);
    h.supervisor.start_initial();

    // When: The setup console is closed
    h.launcher.exit_last(Some(1));
    h.drain();

    // Then: Still Setup, relaunched with the closing shell flag
    assert_eq!(h.supervisor.mode(), LaunchMode::Setup);
    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 2);
    assert_eq!(spawned[1].args()[0], h.layout.shell.close_flag);
    assert_eq!(spawned[1].visibility(), Visibility::Hidden);
}

/// WHAT: A visible client run exiting with an error still relaunches silently once
/// WHY: Exit code is not consulted for interactive sessions
#[test]
fn given_visible_client_when_exits_with_error_then_exactly_one_silent_relaunch() {
    // Given: Client mode with the terminal open
    let mut h = Harness::new(true);
    h.supervisor.open_terminal();

    // When: The console exits with code 5
    h.launcher.exit_last(Some(5));
    h.drain();

    // Then: One hidden relaunch, no warning
    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 2);
    assert_eq!(spawned[1].visibility(), Visibility::Hidden);
    assert_eq!(h.notifier.count(Severity::Warning), 0);
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Hidden)
    );
}

/// WHAT: A silent run exiting cleanly goes idle quietly
/// WHY: A clean exit is the worker's own decision
#[test]
fn given_silent_client_when_exits_with_zero_then_idle_without_notification() {
    // Given: Silent client running
    let mut h = Harness::new(true);
    h.supervisor.start_initial();

    // When: It exits with code 0
    h.launcher.exit_last(Some(0));
    h.drain();

    // Then: Idle, nothing relaunched, nothing notified
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
    assert_eq!(h.launcher.spawned().len(), 1);
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.launcher.live(), 0);
}

/// WHAT: A silent run failing emits one warning with the code and does not retry
/// WHY: Prevents crash loops while still telling the user
#[test]
fn given_silent_client_when_exits_with_three_then_single_warning_and_idle() {
    // Given: Silent client running
    let mut h = Harness::new(true);
    h.supervisor.start_initial();

    // When: It exits with code 3
    h.launcher.exit_last(Some(3));
    h.drain();

    // Then: Exactly one warning mentioning 3, Idle, no relaunch
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Warning);
    assert!(messages[0].0.contains('3'));
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
    assert_eq!(h.launcher.spawned().len(), 1);
}

/// WHAT: A silent run killed without an exit code counts as a failure
/// WHY: Signals are not a clean exit
#[test]
fn given_silent_client_when_killed_without_code_then_warning() {
    let mut h = Harness::new(true);
    h.supervisor.start_initial();

    h.launcher.exit_last(None);
    h.drain();

    assert_eq!(h.notifier.count(Severity::Warning), 1);
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
}

/// WHAT: Starting over a running child retires it completely first
/// WHY: Two workers must never overlap
#[test]
fn given_running_child_when_starting_again_then_old_child_fully_stopped_before_spawn() {
    // Given: Silent client running
    let mut h = Harness::new(true);
    h.supervisor.start(Visibility::Hidden);

    // When: Starting again
    h.supervisor.start(Visibility::Hidden);

    // Then: Deregister, terminate, wait and release all precede the new spawn
    assert_eq!(
        h.launcher.journal(),
        vec![
            "spawn 1".to_string(),
            "terminate 1 registered=false".to_string(),
            "wait 1".to_string(),
            "release 1".to_string(),
            "spawn 2".to_string(),
        ]
    );
    assert_eq!(h.launcher.max_live(), 1);
    assert!(!h.launcher.observer(0).is_registered());
}

/// WHAT: Any sequence of starts keeps at most one live handle
/// WHY: Guards against double spawn
#[test]
fn given_many_start_requests_when_interleaved_then_at_most_one_live_handle() {
    let mut h = Harness::new(true);

    for visibility in [
        Visibility::Hidden,
        Visibility::Visible,
        Visibility::Hidden,
        Visibility::Visible,
        Visibility::Visible,
    ] {
        h.supervisor.start(visibility);
        assert_eq!(h.launcher.live(), 1);
    }
    h.supervisor.open_terminal();

    assert_eq!(h.launcher.max_live(), 1);
    assert_eq!(h.launcher.spawned().len(), 5);
}

/// WHAT: An exit event from a replaced child changes nothing
/// WHY: Only the tracked run may drive transitions
#[test]
fn given_replaced_child_when_its_exit_event_arrives_then_ignored() {
    // Given: A hidden run replaced by a visible one
    let mut h = Harness::new(true);
    h.supervisor.start(Visibility::Hidden);
    let first = h.launcher.observer(0);
    h.supervisor.open_terminal();

    // When: The first run's exit arrives late
    assert!(!first.notify_exit(Some(0)));
    h.supervisor.handle_event(SupervisorEvent::Exited {
        run_id: first.run_id(),
        code: Some(0),
    });

    // Then: The visible session is untouched
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Visible)
    );
    assert_eq!(h.launcher.spawned().len(), 2);
}

/// WHAT: Open terminal while a visible session runs is a no-op
/// WHY: Prevents duplicate consoles
#[test]
fn given_visible_session_when_opening_terminal_then_nothing_spawned() {
    // Given: Visible session running
    let mut h = Harness::new(true);
    h.supervisor.open_terminal();
    let journal_before = h.launcher.journal();

    // When: Requesting the terminal again
    h.supervisor.open_terminal();

    // Then: No process activity at all
    assert_eq!(h.launcher.journal(), journal_before);
    assert_eq!(
        h.supervisor.status(),
        SupervisorStatus::Running(Visibility::Visible)
    );
}

/// WHAT: Open terminal over a silent run swaps it for a visible one
/// WHY: The user wants to see the assistant's output
#[test]
fn given_silent_run_when_opening_terminal_then_replaced_by_visible_session() {
    let mut h = Harness::new(true);
    h.supervisor.start_initial();

    h.supervisor.open_terminal();

    let spawned = h.launcher.spawned();
    assert_eq!(spawned.len(), 2);
    assert_eq!(spawned[1].program(), h.layout.shell.program.as_path());
    assert_eq!(spawned[1].args()[0], h.layout.shell.keep_open_flag);
    assert_eq!(h.launcher.live(), 1);
}

/// WHAT: After shutdown nothing can start a child
/// WHY: Shutdown supersedes every other transition
#[test]
fn given_shutdown_when_start_terminal_or_exit_event_arrive_then_no_new_child() {
    // Given: A visible session whose observer is captured
    let mut h = Harness::new(true);
    h.supervisor.open_terminal();
    let observer = h.launcher.observer(0);

    // When: Shutting down, then poking the supervisor from every side
    h.supervisor.request_exit();
    assert!(!observer.notify_exit(Some(0)));
    h.supervisor.handle_event(SupervisorEvent::Exited {
        run_id: observer.run_id(),
        code: Some(0),
    });
    h.supervisor.start(Visibility::Hidden);
    h.supervisor.open_terminal();
    h.supervisor.start_initial();

    // Then: The child was stopped and nothing else was spawned
    assert_eq!(h.supervisor.status(), SupervisorStatus::ShuttingDown);
    assert_eq!(h.launcher.spawned().len(), 1);
    assert_eq!(h.launcher.live(), 0);
    assert_eq!(h.drain(), 0);
}

/// WHAT: A missing entry script is reported and leaves the supervisor idle
/// WHY: Resolution failures are non-fatal
#[test]
fn given_missing_entry_script_when_starting_client_then_error_notified_and_idle() {
    // Given: Catalog present but client.py gone
    let mut h = Harness::new(true);
    h.paths.remove(&h.layout.entry_script);

    // When: Starting
    h.supervisor.start_initial();

    // Then: One error notification naming the file
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Error);
    assert!(messages[0].0.contains("client.py"));
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
    assert!(h.launcher.spawned().is_empty());
}

/// WHAT: A spawn failure is reported and leaves the supervisor idle
/// WHY: OS errors must not crash the control loop
#[test]
fn given_spawn_failure_when_starting_then_error_notified_and_idle() {
    let mut h = Harness::new(true);
    h.launcher.fail_next_spawn();

    h.supervisor.start(Visibility::Hidden);

    assert_eq!(h.notifier.count(Severity::Error), 1);
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
    assert_eq!(h.launcher.live(), 0);
}

/// WHAT: A failed restart still stops the previous child
/// WHY: Start always retires the old child before resolving the new one
#[test]
fn given_running_child_when_restart_cannot_resolve_then_old_child_stopped_and_idle() {
    let mut h = Harness::new(true);
    h.supervisor.start(Visibility::Hidden);
    h.paths.remove(&h.layout.entry_script);

    h.supervisor.open_terminal();

    assert_eq!(h.launcher.live(), 0);
    assert_eq!(h.supervisor.status(), SupervisorStatus::Idle);
    assert_eq!(h.notifier.count(Severity::Error), 1);
}

/// WHAT: Client mode survives the catalog disappearing
/// WHY: The Setup to Client handoff is one-way
#[test]
fn given_client_mode_when_catalog_removed_and_run_exits_then_mode_stays_client() {
    let mut h = Harness::new(true);
    h.supervisor.open_terminal();
    h.paths.remove(&h.layout.catalog_file);

    h.launcher.exit_last(Some(0));
    h.drain();

    assert_eq!(h.supervisor.mode(), LaunchMode::Client);
    let spawned = h.launcher.spawned();
    assert_eq!(
        spawned[1].program(),
        local_interpreter(&h.layout, "pythonw").as_path()
    );
}

/// WHAT: Dropping the supervisor stops the child
/// WHY: The worker must not outlive the tray
#[test]
fn given_running_child_when_supervisor_dropped_then_child_released() {
    let h = Harness::new(true);
    let launcher = h.launcher.clone();
    let Harness { mut supervisor, .. } = h;
    supervisor.start(Visibility::Hidden);

    drop(supervisor);

    assert_eq!(launcher.live(), 0);
}
