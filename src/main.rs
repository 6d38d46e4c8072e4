//! `simplex-vcgen` - replay a directive file into a verifier script.
//!
//! ```text
//! simplex-vcgen [INPUT] [OUTPUT]      defaults: input.txt input.wl
//! ```
//!
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use simplex_vcgen::{DEFAULT_INPUT, DEFAULT_OUTPUT, RunConfig};

#[derive(Parser)]
#[command(name = "simplex-vcgen")]
#[command(about = "Generate verification conditions from a box-splitting directive file")]
struct Cli {
    /// Directive stream, one split or verify directive per line
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Verifier script to write
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = RunConfig::new(cli.input, cli.output);

    let stats = config.run().with_context(|| {
        format!(
            "generating {} from {}",
            config.output.display(),
            config.input.display()
        )
    })?;

    tracing::info!(
        verifies = stats.verifies,
        path = %config.output.display(),
        "Wrote verification conditions"
    );
    Ok(())
}
