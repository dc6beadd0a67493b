/// User actions delivered to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Show the assistant in a console window.
    OpenTerminal,
    /// Stop the worker and quit.
    Exit,
}
