//! Example: print triangle count and Z range of a binary STL file
//!
//! Usage: cargo run --example inspect_stl -- path/to/file.stl
use std::env;
use std::path::Path;
use std::process::ExitCode;

use stlscale_core::{load_mesh, scaled_output_path};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <stl-file>", args[0]);
        return ExitCode::FAILURE;
    }

    let path = Path::new(&args[1]);
    let mesh = match load_mesh(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("Failed to load STL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Header: {}", String::from_utf8_lossy(&mesh.header).trim_end_matches('\0'));
    println!("Triangles: {}", mesh.triangle_count());
    match mesh.z_range() {
        Some((min, max)) => println!("Z range: {} .. {}", min, max),
        None => println!("Z range: (empty mesh)"),
    }
    println!("Scaled output would be written to {}", scaled_output_path(path).display());

    ExitCode::SUCCESS
}
