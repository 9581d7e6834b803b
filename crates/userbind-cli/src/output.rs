//! Report rendering for CLI commands.

use std::io::Write;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use userbind_common::types::BindRequest;
use userbind_core::passwd::Outcome;

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text.
    Human,
    /// Pretty-printed JSON.
    Json,
}

/// Summary of a `materialize` run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    outcome: &'a Outcome,
    dry_run: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed_binds: Vec<FailedBind<'a>>,
}

#[derive(Debug, Serialize)]
struct FailedBind<'a> {
    request: &'a BindRequest,
    error: &'a str,
}

impl<'a> Report<'a> {
    /// Builds a report from an outcome and any bind failures.
    pub fn new(outcome: &'a Outcome, dry_run: bool, failed: &'a [(BindRequest, String)]) -> Self {
        Self {
            outcome,
            dry_run,
            failed_binds: failed
                .iter()
                .map(|(request, error)| FailedBind { request, error })
                .collect(),
        }
    }

    /// Renders the report as plain text lines.
    #[must_use]
    pub fn to_human(&self) -> String {
        let request = match self.outcome {
            Outcome::Skipped { reason } => return format!("passwd: skipped ({reason})\n"),
            Outcome::BindRequested { request } => request,
        };
        let mut out = format!("passwd: staged {}\n", request.source.display());
        if self.dry_run {
            out.push_str(&format!("bind (dry run): {request}\n"));
        } else if !self.failed_binds.iter().any(|f| f.request == request) {
            out.push_str(&format!("bind: {request}\n"));
        }
        for failed in &self.failed_binds {
            out.push_str(&format!("bind failed: {}: {}\n", failed.request, failed.error));
        }
        out
    }
}

/// Writes `report` to stdout in `format`.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print(report: &Report<'_>, format: OutputFormat) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Human => stdout.write_all(report.to_human().as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, report).context("serializing report")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
