//! `userbind materialize`: stage the caller's passwd file and bind it.

use std::path::PathBuf;

use clap::Args;
use userbind_common::config::ConfigFile;
use userbind_core::filesystem::{BindQueue, BindRequester, MountBinder};
use userbind_core::host::{FixedPaths, ProcessPrivilege, SystemIdentity};
use userbind_core::passwd::{Host, materialize};

use crate::output::{self, OutputFormat, Report};

/// Arguments for the `materialize` command.
#[derive(Args, Debug)]
pub struct MaterializeArgs {
    /// Mounted root filesystem of the container.
    #[arg(long, env = "USERBIND_ROOTFS")]
    pub rootfs: Option<PathBuf>,

    /// Per-invocation scratch directory owned by this session.
    #[arg(long, env = "USERBIND_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// Report the bind request instead of mounting.
    #[arg(long)]
    pub dry_run: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Executes the `materialize` command.
///
/// # Errors
///
/// Returns an error if materialization aborts or a bind mount fails.
pub fn execute(args: &MaterializeArgs, config: &ConfigFile) -> anyhow::Result<()> {
    let paths = FixedPaths::new(args.rootfs.clone(), args.session_dir.clone());

    if args.dry_run {
        let mut queue = BindQueue::new();
        let outcome = run(&paths, config, &mut queue)?;
        return output::print(&Report::new(&outcome, true, &[]), args.format);
    }

    // without a rootfs the materializer aborts before any bind is requested
    let mut binder = MountBinder::new(args.rootfs.clone().unwrap_or_default());
    let outcome = run(&paths, config, &mut binder)?;
    output::print(&Report::new(&outcome, false, binder.failed()), args.format)?;

    if binder.failed().is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} bind mount(s) failed, container /etc/passwd not updated",
            binder.failed().len()
        ))
    }
}

fn run(
    paths: &FixedPaths,
    config: &ConfigFile,
    binder: &mut dyn BindRequester,
) -> anyhow::Result<userbind_core::passwd::Outcome> {
    let mut cursor = config.cursor();
    let mut host = Host {
        privilege: &ProcessPrivilege,
        identity: &SystemIdentity,
        paths,
        config: &mut cursor,
        binder,
    };
    Ok(materialize(&mut host)?)
}
