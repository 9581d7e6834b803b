//! Identity lookups against the host user database.

use std::ffi::{CString, OsStr};
use std::path::PathBuf;

use nix::unistd::{Uid, User};
use userbind_common::types::IdentityRecord;

/// Resolves users and their home directories.
pub trait IdentityProvider {
    /// Looks up the record for `uid`, returning `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the user database cannot be queried.
    fn lookup(&self, uid: u32) -> std::io::Result<Option<IdentityRecord>>;

    /// Resolves the home directory to publish for `record`.
    ///
    /// Uses the record's home when it is usable and falls back to `$HOME`.
    fn resolve_home(&self, record: &IdentityRecord) -> Option<PathBuf> {
        resolve_home_with(record, std::env::var_os("HOME").as_deref())
    }
}

/// Host user database, queried through `getpwuid_r(3)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityProvider for SystemIdentity {
    fn lookup(&self, uid: u32) -> std::io::Result<Option<IdentityRecord>> {
        let Some(user) = User::from_uid(Uid::from_raw(uid))? else {
            return Ok(None);
        };
        Ok(Some(IdentityRecord {
            username: user.name,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
            gecos: gecos_to_string(user.gecos)?,
            home: user.dir,
            shell: user.shell,
        }))
    }
}

/// Converts a raw gecos field, refusing bytes that are not UTF-8.
///
/// # Errors
///
/// Returns [`std::io::ErrorKind::InvalidData`] for non-UTF-8 input.
pub fn gecos_to_string(gecos: CString) -> std::io::Result<String> {
    gecos.into_string().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("gecos is not valid UTF-8: {e}"),
        )
    })
}

/// Picks the nominal home when it is a non-empty absolute path, otherwise
/// `fallback` under the same rule.
#[must_use]
pub fn resolve_home_with(record: &IdentityRecord, fallback: Option<&OsStr>) -> Option<PathBuf> {
    if record.home.is_absolute() {
        return Some(record.home.clone());
    }
    let fallback = PathBuf::from(fallback?);
    if fallback.is_absolute() {
        tracing::debug!(
            nominal = %record.home.display(),
            home = %fallback.display(),
            "nominal home unusable, using $HOME"
        );
        Some(fallback)
    } else {
        None
    }
}
