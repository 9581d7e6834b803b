//! `userbind record`: show the passwd record for the caller.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use userbind_core::host::{IdentityProvider, PrivilegeContext, ProcessPrivilege, SystemIdentity};
use userbind_core::passwd::synthesize_record;

use crate::output::OutputFormat;

/// Arguments for the `record` command.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Look up this uid instead of the caller's real uid.
    #[arg(long)]
    pub uid: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct RecordReport {
    uid: u32,
    record: String,
}

/// Executes the `record` command.
///
/// # Errors
///
/// Returns an error if the identity cannot be resolved.
pub fn execute(args: &RecordArgs) -> anyhow::Result<()> {
    let uid = args.uid.unwrap_or_else(|| ProcessPrivilege.real_uid());
    let identity: &dyn IdentityProvider = &SystemIdentity;
    let record = synthesize_record(identity, uid).map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Human => writeln!(stdout, "{record}")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &RecordReport { uid, record })
                .context("serializing record")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
