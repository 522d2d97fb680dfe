use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck::cli::{self, Cli};

/// Log filter env var, e.g. `TASKDECK_LOG=taskdeck=debug`
const LOG_ENV: &str = "TASKDECK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    // Parse command-line arguments
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let info = e.info();
            eprintln!("Error: {}", info.message);
            if let Some(details) = info.details {
                eprintln!("  {}", details);
            }
            ExitCode::FAILURE
        }
    }
}
