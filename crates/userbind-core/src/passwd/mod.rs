//! Materialization of the invoking user into a container's `/etc/passwd`.
//!
//! The workflow runs once per container start:
//!
//! 1. skip for root callers,
//! 2. require the container root and session directory,
//! 3. honour the `config passwd` switch,
//! 4. skip containers without a template `/etc/passwd`,
//! 5. copy the template to `<session>/passwd`,
//! 6. append one record for the caller,
//! 7. request a bind of the copy over `/etc/passwd`.
//!
//! Any error aborts before step 7, so a partially staged file is never
//! exposed to the container.

pub mod record;
pub mod stage;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use userbind_common::config::ConfigReader;
use userbind_common::constants::{
    CONFIG_PASSWD_DEFAULT, CONFIG_PASSWD_KEY, CONTAINER_PASSWD_PATH, STAGED_PASSWD_NAME,
};
use userbind_common::types::BindRequest;

use crate::error::{MaterializeError, Result};
use crate::filesystem::BindRequester;
use crate::host::{IdentityProvider, PathLocator, PrivilegeContext};

pub use record::{append_record, format_record, synthesize_record};
pub use stage::{StagedFile, locate_template, stage_template};

/// Why a materialization finished without touching the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The caller is root.
    RootCaller,
    /// `config passwd` is disabled.
    Disabled,
    /// The container has no `/etc/passwd`.
    NoTemplate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootCaller => write!(f, "running as root"),
            Self::Disabled => write!(f, "disabled by configuration"),
            Self::NoTemplate => write!(f, "no passwd file in container"),
        }
    }
}

/// Successful end state of a materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing was staged or bound.
    Skipped {
        /// Which guard ended the workflow.
        reason: SkipReason,
    },
    /// The staged file was handed to the bind requester.
    BindRequested {
        /// The request that was issued.
        request: BindRequest,
    },
}

/// Result of the applicability checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Stop without side effects.
    Skip(SkipReason),
    /// Continue with these paths.
    Proceed {
        /// Template inside the container root.
        template: PathBuf,
        /// Where the copy is staged.
        staged: PathBuf,
    },
}

/// Collaborators a materialization runs against.
pub struct Host<'a> {
    /// Source of the caller's real uid.
    pub privilege: &'a dyn PrivilegeContext,
    /// User database.
    pub identity: &'a dyn IdentityProvider,
    /// Container root and session directory.
    pub paths: &'a dyn PathLocator,
    /// Runtime configuration.
    pub config: &'a mut dyn ConfigReader,
    /// Receiver of the final bind request.
    pub binder: &'a mut dyn BindRequester,
}

/// Decides whether the workflow applies to this invocation.
///
/// # Errors
///
/// Returns [`MaterializeError::MissingContainerDir`],
/// [`MaterializeError::MissingSessionDir`], or a configuration error.
pub fn check_applicability(
    uid: u32,
    paths: &dyn PathLocator,
    config: &mut dyn ConfigReader,
) -> Result<Gate> {
    if uid == 0 {
        tracing::info!("not updating passwd file, running as root");
        return Ok(Gate::Skip(SkipReason::RootCaller));
    }

    let container_root = paths
        .container_root()
        .ok_or(MaterializeError::MissingContainerDir)?;
    let session_dir = paths
        .session_dir()
        .ok_or(MaterializeError::MissingSessionDir)?;

    tracing::trace!(key = CONFIG_PASSWD_KEY, "checking configuration option");
    config.rewind();
    if !config.get_bool(CONFIG_PASSWD_KEY, CONFIG_PASSWD_DEFAULT)? {
        tracing::info!("skipping bind of the host's /etc/passwd");
        return Ok(Gate::Skip(SkipReason::Disabled));
    }

    tracing::debug!(root = %container_root.display(), "checking for template passwd file");
    let Some(template) = locate_template(&container_root) else {
        tracing::info!("passwd file does not exist in container, not updating");
        return Ok(Gate::Skip(SkipReason::NoTemplate));
    };

    Ok(Gate::Proceed {
        template,
        staged: session_dir.join(STAGED_PASSWD_NAME),
    })
}

/// Runs the full workflow against `host`.
///
/// # Errors
///
/// Returns the first fatal condition encountered. No bind request has been
/// issued when this returns an error.
pub fn materialize(host: &mut Host<'_>) -> Result<Outcome> {
    tracing::trace!("materializing passwd file");
    let result = run(host);
    if let Err(e) = &result {
        tracing::error!(error = %e, "passwd materialization aborted");
    }
    result
}

fn run(host: &mut Host<'_>) -> Result<Outcome> {
    let uid = host.privilege.real_uid();
    let (template, staged) = match check_applicability(uid, host.paths, &mut *host.config)? {
        Gate::Skip(reason) => return Ok(Outcome::Skipped { reason }),
        Gate::Proceed { template, staged } => (template, staged),
    };

    tracing::debug!("creating template of /etc/passwd");
    let staged = stage_template(&template, &staged)?;

    tracing::info!(uid, staged = %staged.path.display(), "appending user data to template passwd file");
    let line = synthesize_record(host.identity, uid)?;
    append_record(&staged, &line)?;
    tracing::debug!(record = %line, "appended passwd record");

    let request = BindRequest {
        source: staged.path,
        destination: PathBuf::from(CONTAINER_PASSWD_PATH),
    };
    host.binder.request_bind(request.clone());
    Ok(Outcome::BindRequested { request })
}
