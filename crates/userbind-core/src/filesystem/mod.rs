//! Filesystem exposure for container views.
//!
//! The materializer only emits bind requests; the requesters here decide
//! when and how they are carried out.

pub mod mount;
pub mod resolve;

pub use mount::{BindQueue, BindRequester, MountBinder};
pub use resolve::contained_path;
