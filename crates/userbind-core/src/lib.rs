//! # userbind-core
//!
//! Makes the invoking user resolvable inside a container.
//!
//! The crate stages a copy of the container's `/etc/passwd` in the
//! per-invocation session directory, appends one record for the real caller,
//! and asks a bind-mount requester to expose the copy at `/etc/passwd` inside
//! the container. It is organised as:
//! - **host**: collaborator traits for privilege, identity, and path lookup,
//!   with implementations backed by the running host.
//! - **filesystem**: bind-mount requesters.
//! - **passwd**: the materialization workflow itself.
//!
//! Nothing here changes privileges or allocates the session directory; both
//! are expected to be done by the caller.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod filesystem;
pub mod host;
pub mod passwd;
