//! Command line surface for the STL Z-scaling tool
use std::path::PathBuf;

use clap::Parser;
use stlscale_core::{Result, ScaleMethod, TransformConfig};

/// Scale the Z axis of a binary STL model
#[derive(Debug, Parser)]
#[command(name = "stl-scale")]
#[command(version)]
pub struct Cli {
    /// Input STL file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Scaling method (0: None | 1: Sqrt)
    #[arg(short = 'm', long = "method", allow_negative_numbers = true)]
    pub method: i64,

    /// Number of times to run the scaling method on the model
    #[arg(short = 'd', long = "iterations", default_value_t = 1)]
    pub iterations: u32,

    /// Remove all triangles touching the lowest Z plane and move that plane to Z = 0
    #[arg(long)]
    pub trim_base: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build the transform settings, rejecting unknown method codes
    pub fn config(&self) -> Result<TransformConfig> {
        let method = ScaleMethod::try_from(self.method)?;
        Ok(TransformConfig::new(method, self.iterations, self.trim_base))
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
