//! File boundary: loading the input mesh and writing the scaled copy
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, StlError};
use crate::geometry::Mesh;
use crate::stl::{encoded_len, read_binary_stl, write_binary_stl};
use crate::transform::{apply_transforms, TransformConfig};

/// Suffix inserted between the input file stem and its extension.
pub const OUTPUT_SUFFIX: &str = "_scaled";

/// Derive `<dir>/<stem>_scaled<.ext>` from the input path
pub fn scaled_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = input.file_stem() {
        name.push(stem);
    }
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// Load a binary STL file
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    if !path.is_file() {
        return Err(StlError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StlError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StlError::Io(e)
        }
    })?;
    let mesh = read_binary_stl(BufReader::new(file))?;
    info!("Triangles: {}", mesh.triangle_count());
    Ok(mesh)
}

/// Write `mesh` to a new file at `path`
///
/// Never overwrites: an existing file at `path` is left untouched and
/// reported as [`StlError::DestinationExists`].
pub fn save_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                StlError::DestinationExists {
                    path: path.to_path_buf(),
                }
            } else {
                StlError::Io(e)
            }
        })?;

    info!("Writing to: {} ({} bytes)", path.display(), encoded_len(mesh));
    write_binary_stl(mesh, BufWriter::new(file))
}

/// Load `input`, run the configured transforms and save next to it
///
/// Returns the path of the written file.
pub fn process_file(input: &Path, config: &TransformConfig) -> Result<PathBuf> {
    let output = scaled_output_path(input);

    let mut mesh = load_mesh(input)?;
    // Fail before doing any transform work; save_mesh still refuses to
    // overwrite if the file appears in the meantime.
    if output.exists() {
        return Err(StlError::DestinationExists { path: output });
    }

    apply_transforms(&mut mesh, config);
    save_mesh(&mesh, &output)?;
    Ok(output)
}
