//! CLI entry point for lexro.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use lexro::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

/// Log filter: `--trace`/`--debug` raise this crate's level, otherwise
/// `RUST_LOG` is honoured with WARN as the default.
fn env_filter(debug: bool, trace: bool) -> EnvFilter {
    if trace {
        EnvFilter::new("warn,lexro=trace")
    } else if debug {
        EnvFilter::new("warn,lexro=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn init_tracing(debug: bool, trace: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug, trace))
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.debug, cli.trace, cli.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {e}");
        std::process::exit(1);
    }
    tracing::debug!("Debug logging enabled");

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
