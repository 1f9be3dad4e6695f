//! Geometry primitives for binary STL meshes
use nalgebra::{Point3, Vector3};

/// Size of the opaque binary STL header.
pub const HEADER_SIZE: usize = 80;

/// A single STL facet: normal, three vertices and the attribute byte count
///
/// The normal is carried through as read and is never recomputed, so it can
/// disagree with the vertices once they have been transformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub normal: Vector3<f32>,
    pub vertices: [Point3<f32>; 3],
    pub attribute_byte_count: u16,
}

impl Triangle {
    pub fn new(normal: Vector3<f32>, v1: Point3<f32>, v2: Point3<f32>, v3: Point3<f32>) -> Self {
        Self {
            normal,
            vertices: [v1, v2, v3],
            attribute_byte_count: 0,
        }
    }

    pub fn with_attribute(mut self, attribute_byte_count: u16) -> Self {
        self.attribute_byte_count = attribute_byte_count;
        self
    }

    /// Lowest Z of the three vertices
    pub fn min_z(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.z)
            .fold(f32::INFINITY, f32::min)
    }

    pub fn max_z(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.z)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// True if any vertex lies exactly on the given Z plane
    pub fn touches_z(&self, z: f32) -> bool {
        self.vertices.iter().any(|v| v.z == z)
    }

    pub fn offset_z(&mut self, dz: f32) {
        for vertex in &mut self.vertices {
            vertex.z += dz;
        }
    }

    pub fn map_z(&mut self, f: impl Fn(f32) -> f32) {
        for vertex in &mut self.vertices {
            vertex.z = f(vertex.z);
        }
    }
}

/// A binary STL mesh: the raw header plus the ordered triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub header: [u8; HEADER_SIZE],
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(header: [u8; HEADER_SIZE]) -> Self {
        Self {
            header,
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(header: [u8; HEADER_SIZE], capacity: usize) -> Self {
        Self {
            header,
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Number of triangles, as written to the count field on save
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Global minimum vertex Z, or `None` for an empty mesh
    ///
    /// NaN coordinates are skipped so a single bad vertex cannot poison the result.
    pub fn min_z(&self) -> Option<f32> {
        self.z_range().map(|(min, _)| min)
    }

    /// Minimum and maximum vertex Z across the mesh, ignoring NaN
    pub fn z_range(&self) -> Option<(f32, f32)> {
        let (min, max) = self.triangles.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), t| (min.min(t.min_z()), max.max(t.max_z())),
        );
        // Empty, or every Z is NaN.
        if min > max {
            return None;
        }
        Some((min, max))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new([0u8; HEADER_SIZE])
    }
}
