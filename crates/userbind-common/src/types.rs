//! Domain primitive types used across the Userbind workspace.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A user entry as read from the host identity database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Login name.
    pub username: String,
    /// Numeric user ID.
    pub uid: u32,
    /// Primary group ID.
    pub gid: u32,
    /// Comment field, usually the full name.
    pub gecos: String,
    /// Home directory as stored in the database.
    pub home: PathBuf,
    /// Login shell.
    pub shell: PathBuf,
}

/// A request to back a container-internal path with a host-visible file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindRequest {
    /// Host-visible source path.
    pub source: PathBuf,
    /// Absolute destination path inside the container.
    pub destination: PathBuf,
}

impl fmt::Display for BindRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}
