//! Error taxonomy of the passwd materialization workflow.
//!
//! Every variant is fatal. The invoking layer decides how to escalate; the
//! CLI terminates with [`MaterializeError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;
use userbind_common::constants::FATAL_EXIT_CODE;
use userbind_common::error::UserbindError;

/// Fatal conditions that abort a materialization.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The container root filesystem path is unavailable.
    #[error("failed to obtain container directory")]
    MissingContainerDir,

    /// The session scratch directory is unavailable.
    #[error("failed to obtain session directory")]
    MissingSessionDir,

    /// The template could not be copied into the session directory.
    #[error("failed copying template passwd file {template} to {staged}: {source}")]
    CopyFailed {
        /// Template path inside the container root.
        template: PathBuf,
        /// Destination in the session directory.
        staged: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The staged file could not be opened for appending.
    #[error("could not open template passwd file {path}: {source}")]
    OpenFailed {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The synthesized record could not be written.
    #[error("could not append to template passwd file {path}: {source}")]
    WriteFailed {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The caller's identity or home directory could not be resolved into a
    /// usable record.
    #[error("failed to resolve identity for uid {uid}: {reason}")]
    IdentityResolutionFailed {
        /// Real uid of the caller.
        uid: u32,
        /// What went wrong.
        reason: String,
    },

    /// The configuration could not be evaluated.
    #[error(transparent)]
    Config(#[from] UserbindError),
}

impl MaterializeError {
    /// Process exit status the invoking layer should terminate with.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}

/// Convenience alias for materialization results.
pub type Result<T> = std::result::Result<T, MaterializeError>;
