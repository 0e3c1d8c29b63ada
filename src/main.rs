use clap::Parser;
use std::process::ExitCode;

use qatrack::cli::{Cli, OutputOptions};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `QATRACK_LOG=debug`.
const LOG_ENV_VAR: &str = "QATRACK_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let output = OutputOptions { json: cli.json };

    match cli.command.run(cli.user.as_deref(), output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
