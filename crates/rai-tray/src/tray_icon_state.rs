use rai_tray_core::{LaunchMode, SupervisorStatus, Visibility};

/// Tray icon states derived from the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// No worker running.
    Idle,
    /// The setup script is running.
    Setup,
    /// The assistant runs in the background.
    Running,
    /// The assistant runs in a console window.
    Interactive,
}

impl TrayIconState {
    /// Map supervisor status and mode to an icon state.
    pub fn from_supervisor(status: SupervisorStatus, mode: LaunchMode) -> Self {
        match (status, mode) {
            (SupervisorStatus::Idle | SupervisorStatus::ShuttingDown, _) => TrayIconState::Idle,
            (SupervisorStatus::Running(_), LaunchMode::Setup) => TrayIconState::Setup,
            (SupervisorStatus::Running(Visibility::Visible), LaunchMode::Client) => {
                TrayIconState::Interactive
            }
            (SupervisorStatus::Running(Visibility::Hidden), LaunchMode::Client) => {
                TrayIconState::Running
            }
        }
    }

    /// Hover text for this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Idle => "RAI - Stopped",
            TrayIconState::Setup => "RAI - Running setup...",
            TrayIconState::Running => "RAI - Running",
            TrayIconState::Interactive => "RAI - Terminal open",
        }
    }

    /// Icon fill colour (RGBA).
    pub fn color(self) -> [u8; 4] {
        match self {
            TrayIconState::Idle => [128, 128, 128, 255],
            TrayIconState::Setup => [230, 160, 30, 255],
            TrayIconState::Running => [40, 170, 80, 255],
            TrayIconState::Interactive => [50, 120, 220, 255],
        }
    }
}
