//! STL Scale - apply a Z scaling function to a binary STL model
//!
//! Usage:
//!   stl-scale model.stl -m 1 -d 2 --trim-base
//!
//! Writes `model_scaled.stl` next to the input and never overwrites an
//! existing file.

use anyhow::{Context, Result};
use clap::Parser;
use stlscale_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_target(false)
        .init();

    // Reject a bad method code before touching any file.
    let config = cli.config()?;

    let output = stlscale_core::process_file(&cli.input, &config)
        .with_context(|| format!("failed to scale {}", cli.input.display()))?;

    tracing::info!("Done: {}", output.display());
    Ok(())
}
