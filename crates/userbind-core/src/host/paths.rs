//! Locators for the container root and the session scratch directory.

use std::path::{Path, PathBuf};

/// Supplies the two directories the workflow operates on.
///
/// Either may be unavailable, which the workflow treats as a broken
/// invocation.
pub trait PathLocator {
    /// Absolute path of the container's mounted root filesystem.
    fn container_root(&self) -> Option<PathBuf>;

    /// Absolute path of the per-invocation scratch directory.
    fn session_dir(&self) -> Option<PathBuf>;
}

/// Paths fixed by the caller, typically from command-line arguments.
///
/// A path that is not set, is relative, or does not name an existing
/// directory is reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct FixedPaths {
    container_root: Option<PathBuf>,
    session_dir: Option<PathBuf>,
}

impl FixedPaths {
    /// Creates a locator from optional paths.
    #[must_use]
    pub const fn new(container_root: Option<PathBuf>, session_dir: Option<PathBuf>) -> Self {
        Self {
            container_root,
            session_dir,
        }
    }
}

impl PathLocator for FixedPaths {
    fn container_root(&self) -> Option<PathBuf> {
        existing_dir(self.container_root.as_deref())
    }

    fn session_dir(&self) -> Option<PathBuf> {
        existing_dir(self.session_dir.as_deref())
    }
}

fn existing_dir(path: Option<&Path>) -> Option<PathBuf> {
    let path = path?;
    if !path.is_absolute() {
        tracing::debug!(path = %path.display(), "not an absolute path");
        return None;
    }
    if path.is_dir() {
        Some(path.to_path_buf())
    } else {
        tracing::debug!(path = %path.display(), "not an existing directory");
        None
    }
}
