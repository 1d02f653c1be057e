mod error;
mod operations;
mod prompt;

use std::io::{self, Write};

use fsc_core::{CommandRegistry, parse};
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::operations::{Context, dispatch};

/// Environment variable holding the log filter (e.g. `FSC_LOG=debug`).
const LOG_ENV: &str = "FSC_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    init_logging();

    let registry = CommandRegistry::builtin();
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());

    if let Err(err) = run(args, &registry) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: impl Iterator<Item = String>, registry: &CommandRegistry) -> Result<()> {
    let invocation = parse(args, registry)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let mut ctx = Context {
        registry,
        input: &mut input,
        output: &mut output,
    };
    dispatch(invocation.kind(), &invocation, &mut ctx)?;
    output.flush()?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
