//! Mesh transforms: base trimming and repeated Z scaling
use tracing::{info, warn};

use crate::error::StlError;
use crate::geometry::Mesh;

/// Per-vertex Z scaling function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Leave vertices untouched
    #[default]
    None,
    /// Replace Z with its square root; negative Z becomes NaN
    SquareRoot,
}

impl ScaleMethod {
    /// Numeric code used on the command line
    pub fn code(self) -> i64 {
        match self {
            ScaleMethod::None => 0,
            ScaleMethod::SquareRoot => 1,
        }
    }

    pub fn apply(self, z: f32) -> f32 {
        match self {
            ScaleMethod::None => z,
            ScaleMethod::SquareRoot => z.sqrt(),
        }
    }
}

impl TryFrom<i64> for ScaleMethod {
    type Error = StlError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ScaleMethod::None),
            1 => Ok(ScaleMethod::SquareRoot),
            other => Err(StlError::InvalidMethod(other)),
        }
    }
}

/// Settings for one run of the pipeline, fixed before any file is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    pub method: ScaleMethod,
    pub iterations: u32,
    pub trim_base: bool,
}

impl TransformConfig {
    pub fn new(method: ScaleMethod, iterations: u32, trim_base: bool) -> Self {
        Self {
            method,
            iterations,
            trim_base,
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::new(ScaleMethod::None, 1, false)
    }
}

/// What a base trim did to the mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimOutcome {
    /// Z plane that was trimmed away; survivors are shifted down by this much
    pub min_z: f32,
    pub removed: usize,
}

/// Remove every triangle touching the lowest Z plane, then shift the
/// survivors by minus that plane's Z
///
/// The offset comes from the untrimmed mesh, so the trimmed plane lands on
/// Z = 0 and the survivors sit above it. Equality against the minimum is
/// exact. Returns `None` for an empty mesh.
pub fn trim_base(mesh: &mut Mesh) -> Option<TrimOutcome> {
    let min_z = mesh.min_z()?;

    info!("Trimming base layer at z = {}", min_z);
    let (discarded, kept): (Vec<_>, Vec<_>) = mesh
        .triangles
        .drain(..)
        .partition(|t| t.touches_z(min_z));
    mesh.triangles = kept;

    info!("Realigning bottom to zero");
    for triangle in &mut mesh.triangles {
        triangle.offset_z(-min_z);
    }

    Some(TrimOutcome {
        min_z,
        removed: discarded.len(),
    })
}

/// Apply `method` to every vertex Z, `iterations` times
///
/// X, Y and the normals are never modified.
pub fn scale(mesh: &mut Mesh, method: ScaleMethod, iterations: u32) {
    if method == ScaleMethod::None {
        info!("Skipping scale op");
    } else {
        info!("Scaling with method {} ({:?})", method.code(), method);
    }

    for i in 0..iterations {
        info!("Running scale iteration {}", i + 1);
        if method == ScaleMethod::None {
            continue;
        }
        for triangle in &mut mesh.triangles {
            triangle.map_z(|z| method.apply(z));
        }
    }

    let nan_vertices = mesh
        .triangles
        .iter()
        .flat_map(|t| t.vertices.iter())
        .filter(|v| v.z.is_nan())
        .count();
    if nan_vertices > 0 {
        warn!("{} vertices have NaN Z after scaling", nan_vertices);
    }
}

/// Run the configured trim and scale stages, in that order
pub fn apply_transforms(mesh: &mut Mesh, config: &TransformConfig) -> Option<TrimOutcome> {
    let outcome = if config.trim_base {
        let outcome = trim_base(mesh);
        if let Some(outcome) = outcome {
            info!(
                "Removed {} base triangles, {} remain",
                outcome.removed,
                mesh.triangle_count()
            );
        }
        outcome
    } else {
        None
    };

    scale(mesh, config.method, config.iterations);
    outcome
}
