//! CLI command definitions and dispatch.

pub mod materialize;
pub mod record;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use userbind_common::config::ConfigFile;
use userbind_common::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

/// Userbind: make the invoking user resolvable inside a container.
#[derive(Parser, Debug)]
#[command(name = "userbind", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the runtime configuration file.
    #[arg(long, global = true, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage the container's passwd file with the caller appended and bind it.
    Materialize(materialize::MaterializeArgs),
    /// Print the passwd record that would be appended for the caller.
    Record(record::RecordArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Materialize(args) => {
            let config = ConfigFile::load(&cli.config)
                .with_context(|| format!("loading {}", cli.config.display()))?;
            materialize::execute(&args, &config)
        }
        Command::Record(args) => record::execute(&args),
    }
}
