//! System tray icon with state-based updates.
//!
//! Shows one coloured dot per [`TrayIconState`] and a context menu with
//! "Open terminal" and "Exit".

use crate::{AppCommand, AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Icon edge length in pixels.
const ICON_SIZE: u32 = 32;

/// Menu item ids, shareable with the control loop.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// "Open terminal" item.
    pub open_terminal: MenuId,
    /// "Exit" item.
    pub exit: MenuId,
}

impl TrayMenuIds {
    /// Map a clicked menu item to the command it triggers.
    pub fn command_for(&self, id: &MenuId) -> Option<AppCommand> {
        if *id == self.open_terminal {
            Some(AppCommand::OpenTerminal)
        } else if *id == self.exit {
            Some(AppCommand::Exit)
        } else {
            None
        }
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager in the idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let open_terminal_item = MenuItem::new("Open terminal", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let menu_ids = TrayMenuIds {
            open_terminal: open_terminal_item.id().clone(),
            exit: exit_item.id().clone(),
        };

        menu.append(&open_terminal_item)
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to add terminal menu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        menu.append(&exit_item).map_err(|e| AppError::TrayError {
            reason: format!("Failed to add exit menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let state = TrayIconState::Idle;
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(Self::render_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
        })
    }

    /// Update the tray icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::render_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu item ids for the control loop.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    /// Render the state's icon in memory: a filled dot with a dark rim.
    #[track_caller]
    fn render_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_pixels(state);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Pixels for a state's icon.
pub(crate) fn icon_pixels(state: TrayIconState) -> RgbaImage {
    let fill = Rgba(state.color());
    let rim = Rgba([30, 30, 30, 255]);
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let distance = ((x as f32 - center).powi(2) + (y as f32 - center).powi(2)).sqrt();
        if distance <= radius - 2.0 {
            fill
        } else if distance <= radius {
            rim
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
