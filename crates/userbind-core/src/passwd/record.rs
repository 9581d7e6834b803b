//! Synthesis of the caller's passwd record.

use std::io::Write;
use std::path::Path;

use userbind_common::constants::PASSWORD_PLACEHOLDER;
use userbind_common::types::IdentityRecord;

use super::stage::StagedFile;
use crate::error::{MaterializeError, Result};
use crate::host::IdentityProvider;

/// Looks up `uid` and formats its passwd line, without a trailing newline.
///
/// # Errors
///
/// Returns [`MaterializeError::IdentityResolutionFailed`] if the user is
/// unknown, has no usable home directory, or has a field that cannot be
/// written in passwd format.
pub fn synthesize_record(identity: &dyn IdentityProvider, uid: u32) -> Result<String> {
    let failed = |reason: String| MaterializeError::IdentityResolutionFailed { uid, reason };

    let record = identity
        .lookup(uid)
        .map_err(|e| failed(format!("user database lookup failed: {e}")))?
        .ok_or_else(|| failed("no such user".into()))?;
    let home = identity
        .resolve_home(&record)
        .ok_or_else(|| failed("failed to get home directory".into()))?;

    format_record(&record, &home).map_err(failed)
}

/// Formats `record` as `name:x:uid:gid:gecos:home:shell`.
///
/// # Errors
///
/// Returns a description of the first field that is not valid UTF-8 or
/// contains a `:` or newline.
pub fn format_record(record: &IdentityRecord, home: &Path) -> std::result::Result<String, String> {
    let username = field("username", Some(record.username.as_str()))?;
    let gecos = field("gecos", Some(record.gecos.as_str()))?;
    let home = field("home", home.to_str())?;
    let shell = field("shell", record.shell.to_str())?;
    if username.is_empty() {
        return Err("empty username".into());
    }

    Ok(format!(
        "{username}:{PASSWORD_PLACEHOLDER}:{}:{}:{gecos}:{home}:{shell}",
        record.uid, record.gid
    ))
}

fn field<'a>(name: &str, value: Option<&'a str>) -> std::result::Result<&'a str, String> {
    let value = value.ok_or_else(|| format!("{name} is not valid UTF-8"))?;
    if value.contains([':', '\n', '\r']) {
        return Err(format!("{name} contains a field or line separator"));
    }
    Ok(value)
}

/// Appends `line` to the staged file with a single write.
///
/// # Errors
///
/// Returns [`MaterializeError::OpenFailed`] or
/// [`MaterializeError::WriteFailed`].
pub fn append_record(staged: &StagedFile, line: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&staged.path)
        .map_err(|source| MaterializeError::OpenFailed {
            path: staged.path.clone(),
            source,
        })?;

    let mut buf = String::with_capacity(line.len() + 2);
    if staged.needs_separator {
        buf.push('\n');
    }
    buf.push_str(line);
    buf.push('\n');

    file.write_all(buf.as_bytes())
        .map_err(|source| MaterializeError::WriteFailed {
            path: staged.path.clone(),
            source,
        })
}
