//! STLScale Core Library - binary STL loading, Z transforms and saving
//!
//! A run loads one binary STL file, optionally trims its base layer, applies a
//! Z scaling function a number of times and writes the result next to the
//! input as `<stem>_scaled.<ext>`.

pub mod error;
pub mod geometry;
pub mod io;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use error::{Result, StlError};
pub use geometry::{Mesh, Triangle};
pub use io::{load_mesh, process_file, save_mesh, scaled_output_path};
pub use transform::{apply_transforms, ScaleMethod, TransformConfig, TrimOutcome};
