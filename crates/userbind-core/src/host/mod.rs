//! Host collaborators queried by the materializer.
//!
//! Each collaborator is a trait so the workflow can run against fakes in
//! tests; the default implementations read the state of the running process.

pub mod identity;
pub mod paths;
pub mod privilege;

pub use identity::{IdentityProvider, SystemIdentity};
pub use paths::{FixedPaths, PathLocator};
pub use privilege::{PrivilegeContext, ProcessPrivilege};
