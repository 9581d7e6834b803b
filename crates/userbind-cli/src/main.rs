//! # userbind
//!
//! Publishes the invoking user into a container's `/etc/passwd`.
//! Any fatal error terminates the process with status 255.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use userbind_common::constants::FATAL_EXIT_CODE;
use userbind_core::error::MaterializeError;

use crate::commands::{Cli, LogFormat};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    if let Err(err) = commands::execute(cli) {
        // the materializer has already logged its own failures
        if err.downcast_ref::<MaterializeError>().is_none() {
            tracing::error!("{err:#}");
        }
        std::process::exit(FATAL_EXIT_CODE);
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
