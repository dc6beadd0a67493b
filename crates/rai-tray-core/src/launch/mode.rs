//! Operating mode and the one-way Setup to Client handoff.

use crate::PathProbe;

use std::path::PathBuf;

use tracing::{debug, info, instrument};

/// Which worker the supervisor launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// The catalog has not been generated yet; run the setup script.
    Setup,
    /// The catalog exists; run the assistant client.
    Client,
}

impl LaunchMode {
    /// Mode implied by the presence of the catalog file.
    pub fn from_catalog(present: bool) -> Self {
        if present {
            LaunchMode::Client
        } else {
            LaunchMode::Setup
        }
    }

    /// Transition taken once setup has produced the catalog.
    ///
    /// There is no way back: `Client` stays `Client`.
    pub fn complete_setup(self) -> Self {
        LaunchMode::Client
    }
}

/// Tracks the current [`LaunchMode`] against the catalog file on disk.
///
/// The catalog is never polled. It is probed once at construction and once
/// per exit event while still in `Setup`.
#[derive(Debug)]
pub struct ModeController<P> {
    probe: P,
    catalog_file: PathBuf,
    mode: LaunchMode,
}

impl<P: PathProbe> ModeController<P> {
    /// Create a controller, probing the catalog for the initial mode.
    #[instrument(skip(probe))]
    pub fn new(probe: P, catalog_file: PathBuf) -> Self {
        let mode = LaunchMode::from_catalog(probe.exists(&catalog_file));
        info!(?mode, "Initial launch mode probed");

        Self {
            probe,
            catalog_file,
            mode,
        }
    }

    /// Pure predicate over the filesystem: what the catalog says right now.
    pub fn probe(&self) -> LaunchMode {
        LaunchMode::from_catalog(self.probe.exists(&self.catalog_file))
    }

    /// The mode currently in effect.
    pub fn mode(&self) -> LaunchMode {
        self.mode
    }

    /// Path of the catalog file gating the mode.
    pub fn catalog_file(&self) -> &std::path::Path {
        &self.catalog_file
    }

    /// Re-probe after a worker exit.
    ///
    /// Returns `true` when this call moved the mode from `Setup` to `Client`.
    #[instrument(skip(self))]
    pub fn observe_exit(&mut self) -> bool {
        if self.mode != LaunchMode::Setup {
            return false;
        }

        if self.probe() == LaunchMode::Client {
            self.mode = self.mode.complete_setup();
            info!(catalog = ?self.catalog_file, "Catalog found, switching to client mode");
            true
        } else {
            debug!(catalog = ?self.catalog_file, "Catalog still absent, staying in setup mode");
            false
        }
    }
}
