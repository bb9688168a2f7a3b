//! # Facetview
//!
//! Terminal host for `facetview-query`: loads a dataset and a browser config,
//! then prints pages of the table for one query or for a stream of commands.

mod cli;
mod data;
mod render;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, LogFormat};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "FACETVIEW_LOG";

const DEFAULT_LOG_FILTER: &str = "facetview=warn,facetview_query=warn";

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "facetview failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the subscriber. Logs go to stderr so stdout only carries frames.
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
