//! Bind-mount requesters.
//!
//! A request is one-way: requesters report their own failures and never hand
//! them back to the caller.

use std::path::{Path, PathBuf};

use userbind_common::types::BindRequest;

use super::resolve::contained_path;

/// Accepts requests to back a container path with a host file.
pub trait BindRequester {
    /// Arranges for `request.destination` inside the container to show
    /// `request.source`.
    fn request_bind(&mut self, request: BindRequest);
}

/// Collects requests in order for a later mount phase.
#[derive(Debug, Clone, Default)]
pub struct BindQueue {
    requests: Vec<BindRequest>,
}

impl BindQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> &[BindRequest] {
        &self.requests
    }

    /// Consumes the queue, yielding the requests.
    #[must_use]
    pub fn into_requests(self) -> Vec<BindRequest> {
        self.requests
    }
}

impl BindRequester for BindQueue {
    fn request_bind(&mut self, request: BindRequest) {
        tracing::debug!(%request, "queued bind request");
        self.requests.push(request);
    }
}

/// Performs bind mounts immediately, relative to a container root.
#[derive(Debug)]
pub struct MountBinder {
    container_root: PathBuf,
    applied: Vec<BindRequest>,
    failed: Vec<(BindRequest, String)>,
}

impl MountBinder {
    /// Creates a binder that mounts beneath `container_root`.
    #[must_use]
    pub fn new(container_root: impl Into<PathBuf>) -> Self {
        Self {
            container_root: container_root.into(),
            applied: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Host path a container-internal `destination` resolves to, if it
    /// exists and no component of it is a symlink.
    #[must_use]
    pub fn target_for(&self, destination: &Path) -> Option<PathBuf> {
        contained_path(&self.container_root, destination)
    }

    /// Requests that were mounted.
    #[must_use]
    pub fn applied(&self) -> &[BindRequest] {
        &self.applied
    }

    /// Requests that failed, with the error text.
    #[must_use]
    pub fn failed(&self) -> &[(BindRequest, String)] {
        &self.failed
    }
}

impl BindRequester for MountBinder {
    fn request_bind(&mut self, request: BindRequest) {
        let Some(target) = self.target_for(&request.destination) else {
            let message = "destination missing or reached through a symlink".to_string();
            tracing::error!(%request, %message, "bind mount refused");
            self.failed.push((request, message));
            return;
        };
        match bind_mount(&request.source, &target) {
            Ok(()) => {
                tracing::info!(%request, target = %target.display(), "bind mounted");
                self.applied.push(request);
            }
            Err(message) => {
                tracing::error!(%request, target = %target.display(), %message, "bind mount failed");
                self.failed.push((request, message));
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn bind_mount(source: &Path, target: &Path) -> Result<(), String> {
    use nix::mount::{MsFlags, mount};

    mount(
        Some(source),
        target,
        None::<&str>,
        MsFlags::MS_BIND,
        None::<&str>,
    )
    .map_err(|e| format!("mount(2) failed: {e}"))
}

#[cfg(not(target_os = "linux"))]
fn bind_mount(_source: &Path, _target: &Path) -> Result<(), String> {
    Err("Linux required for bind mounts".into())
}
