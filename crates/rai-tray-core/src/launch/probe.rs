use std::path::{Path, PathBuf};

/// Filesystem and search-path lookups used by the resolver and mode controller.
///
/// Injected so interpreter discovery can run against a fake file set.
pub trait PathProbe {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a file the OS can execute.
    fn is_executable(&self, path: &Path) -> bool;

    /// Look `name` up on the executable search path.
    fn search(&self, name: &str) -> Option<PathBuf>;
}

/// [`PathProbe`] backed by the real filesystem and `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPaths;

impl PathProbe for HostPaths {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}
