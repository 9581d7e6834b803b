//! Resolution of container-internal paths on the host.
//!
//! A container path is joined to the container root one component at a
//! time. Any component that is a symlink would be followed by the host
//! kernel against the host root, so it ends the resolution.

use std::path::{Component, Path, PathBuf};

/// Resolves `inner` beneath `root` without crossing a symlink.
///
/// Every component of `inner` must exist and none may be a symlink; `..`
/// components are refused. Returns the host path on success.
#[must_use]
pub fn contained_path(root: &Path, inner: &Path) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in inner.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(name) => {
                resolved.push(name);
                let meta = std::fs::symlink_metadata(&resolved).ok()?;
                if meta.file_type().is_symlink() {
                    tracing::info!(path = %resolved.display(), "refusing to follow symlink inside container root");
                    return None;
                }
            }
            Component::ParentDir | Component::Prefix(_) => {
                tracing::info!(path = %inner.display(), "refusing path that leaves the container root");
                return None;
            }
        }
    }
    Some(resolved)
}
