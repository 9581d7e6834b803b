//! Real-uid lookup for the invoking user.

/// Reports who actually invoked the process.
pub trait PrivilegeContext {
    /// Returns the real (not effective) uid of the caller.
    fn real_uid(&self) -> u32;
}

/// Reads the real uid of the current process.
///
/// For a setuid invocation this is still the unprivileged caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPrivilege;

impl PrivilegeContext for ProcessPrivilege {
    fn real_uid(&self) -> u32 {
        nix::unistd::getuid().as_raw()
    }
}
