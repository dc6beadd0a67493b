use crate::TrayIconState;

/// What the supervisor loop asks of the UI thread, delivered through the tao
/// `EventLoopProxy`.
///
/// The loop owns the supervisor and derives a [`TrayIconState`] from its
/// status after every exit event or menu command; only changes are sent.
#[derive(Debug, Clone, Copy)]
pub enum TrayCommand {
    /// Redraw the icon and tooltip for the worker's current state.
    SetState(TrayIconState),
    /// The worker has been stopped; leave the event loop.
    Shutdown,
}
