//! aroha-cli library root.
//!
//! The `aroha` binary is a thin shell over these modules; keeping them in a
//! library lets integration tests exercise config loading and migration
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod state;

use clap::Parser;

use crate::cli::Cli;
use crate::state::AppContext;

pub async fn run() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let mut ctx = AppContext::open(config_path, cli.store)?;
    commands::run(&mut ctx, cli.command).await
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over
/// the quiet default.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
