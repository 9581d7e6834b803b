//! Staging of the container's template passwd file.

use std::io::Read;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::fcntl::OFlag;
use userbind_common::constants::CONTAINER_PASSWD_PATH;

use crate::error::{MaterializeError, Result};
use crate::filesystem::contained_path;

/// A private copy of the template in the session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Location of the copy.
    pub path: PathBuf,
    /// Whether the copy is non-empty and lacks a trailing newline.
    pub needs_separator: bool,
}

/// Host path of the container's `/etc/passwd`, if it is a regular file.
///
/// No component of the path may be a symlink: its target would be resolved
/// against the host root rather than the container root.
#[must_use]
pub fn locate_template(container_root: &Path) -> Option<PathBuf> {
    let template = contained_path(container_root, Path::new(CONTAINER_PASSWD_PATH))?;
    std::fs::symlink_metadata(&template)
        .is_ok_and(|meta| meta.file_type().is_file())
        .then_some(template)
}

/// Copies `template` to `staged`, replacing any previous contents.
///
/// # Errors
///
/// Returns [`MaterializeError::CopyFailed`] if the template cannot be read or
/// the copy cannot be written.
pub fn stage_template(template: &Path, staged: &Path) -> Result<StagedFile> {
    let copy_failed = |source| MaterializeError::CopyFailed {
        template: template.to_path_buf(),
        staged: staged.to_path_buf(),
        source,
    };

    let mut contents = Vec::new();
    let _ = std::fs::OpenOptions::new()
        .read(true)
        .custom_flags(OFlag::O_NOFOLLOW.bits())
        .open(template)
        .and_then(|mut file| file.read_to_end(&mut contents))
        .map_err(copy_failed)?;
    std::fs::write(staged, &contents).map_err(copy_failed)?;
    tracing::debug!(
        template = %template.display(),
        staged = %staged.display(),
        bytes = contents.len(),
        "staged template passwd file"
    );

    Ok(StagedFile {
        path: staged.to_path_buf(),
        needs_separator: contents.last().is_some_and(|b| *b != b'\n'),
    })
}
