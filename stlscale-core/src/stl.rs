//! Binary STL codec: triangle records and whole-mesh load/save
//!
//! ```text
//! UINT8[80]    header (opaque, copied through)
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count
//! ```
//!
//! Everything is little-endian.
use std::io::{self, Read, Write};

use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::take,
    number::complete::{le_f32, le_u16, le_u32},
    sequence::tuple,
    IResult,
};
use tracing::debug;

use crate::error::{Result, StlError};
use crate::geometry::{Mesh, Triangle, HEADER_SIZE};

/// Size of one encoded triangle record.
pub const TRIANGLE_SIZE: usize = 50;

/// Header plus the 32-bit triangle count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

fn parse_vector3(input: &[u8]) -> IResult<&[u8], (f32, f32, f32)> {
    tuple((le_f32, le_f32, le_f32))(input)
}

fn parse_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, (nx, ny, nz)) = parse_vector3(input)?;
    let (input, (x1, y1, z1)) = parse_vector3(input)?;
    let (input, (x2, y2, z2)) = parse_vector3(input)?;
    let (input, (x3, y3, z3)) = parse_vector3(input)?;
    let (input, attribute_byte_count) = le_u16(input)?;

    let triangle = Triangle::new(
        Vector3::new(nx, ny, nz),
        Point3::new(x1, y1, z1),
        Point3::new(x2, y2, z2),
        Point3::new(x3, y3, z3),
    )
    .with_attribute(attribute_byte_count);

    Ok((input, triangle))
}

fn parse_preamble(input: &[u8]) -> IResult<&[u8], (&[u8], u32)> {
    tuple((take(HEADER_SIZE), le_u32))(input)
}

/// Decode one 50-byte triangle record
///
/// Float values are not range checked; NaN and infinities pass through bit for bit.
pub fn decode_triangle(record: &[u8]) -> Result<Triangle> {
    if record.len() != TRIANGLE_SIZE {
        return Err(StlError::MalformedRecord { len: record.len() });
    }
    let (_, triangle) = parse_facet(record).map_err(|_| StlError::MalformedRecord {
        len: record.len(),
    })?;
    Ok(triangle)
}

/// Encode a triangle into its 50-byte record
pub fn encode_triangle(triangle: &Triangle) -> [u8; TRIANGLE_SIZE] {
    let mut record = [0u8; TRIANGLE_SIZE];
    let floats = [
        triangle.normal.x,
        triangle.normal.y,
        triangle.normal.z,
        triangle.vertices[0].x,
        triangle.vertices[0].y,
        triangle.vertices[0].z,
        triangle.vertices[1].x,
        triangle.vertices[1].y,
        triangle.vertices[1].z,
        triangle.vertices[2].x,
        triangle.vertices[2].y,
        triangle.vertices[2].z,
    ];
    for (chunk, value) in record.chunks_exact_mut(4).zip(floats) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    record[48..].copy_from_slice(&triangle.attribute_byte_count.to_le_bytes());
    record
}

/// Parse a complete binary STL file held in memory
///
/// Bytes beyond the declared triangle count are ignored.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    let (body, (header_bytes, count)) =
        parse_preamble(data).map_err(|_| StlError::TruncatedHeader { len: data.len() })?;

    let expected = u64::from(count) * TRIANGLE_SIZE as u64;
    let available = body.len() as u64;
    if available < expected {
        return Err(StlError::TruncatedBody {
            expected,
            available,
        });
    }
    if available > expected {
        debug!("Ignoring {} trailing bytes after triangle data", available - expected);
    }

    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(header_bytes);

    // The length check above bounds this allocation by the input size.
    let count = count as usize;
    let mut mesh = Mesh::with_capacity(header, count);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(count) {
        mesh.add_triangle(decode_triangle(record)?);
    }

    Ok(mesh)
}

/// Read a whole binary STL stream into a mesh
pub fn read_binary_stl<R: Read>(mut reader: R) -> Result<Mesh> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_binary_stl(&data)
}

/// Write a mesh as binary STL
///
/// The count field is taken from the current triangle list, not from whatever
/// count the mesh was loaded with.
pub fn write_binary_stl<W: Write>(mesh: &Mesh, mut writer: W) -> Result<()> {
    let count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} triangles exceed the binary STL count field",
                mesh.triangle_count()
            ),
        )
    })?;

    writer.write_all(&mesh.header)?;
    writer.write_all(&count.to_le_bytes())?;
    for triangle in &mesh.triangles {
        writer.write_all(&encode_triangle(triangle))?;
    }
    writer.flush()?;
    Ok(())
}

/// Size in bytes of the encoded form of `mesh`
pub fn encoded_len(mesh: &Mesh) -> usize {
    PREAMBLE_SIZE + mesh.triangle_count() * TRIANGLE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Vec<u8> {
        let mut record = Vec::with_capacity(TRIANGLE_SIZE);
        for i in 0..12 {
            record.extend_from_slice(&(i as f32 * 0.5 - 1.0).to_le_bytes());
        }
        record.extend_from_slice(&0xBEEFu16.to_le_bytes());
        record
    }

    fn stl_bytes(count: u32, records: &[Vec<u8>]) -> Vec<u8> {
        let mut data = vec![b'h'; HEADER_SIZE];
        data.extend_from_slice(&count.to_le_bytes());
        for record in records {
            data.extend_from_slice(record);
        }
        data
    }

    #[test]
    fn test_empty_mesh_keeps_header() {
        let mut data = stl_bytes(0, &[]);
        data[..5].copy_from_slice(b"solid");

        let mesh = parse_binary_stl(&data).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(&mesh.header[..], &data[..80]);

        let mut out = Vec::new();
        write_binary_stl(&mesh, &mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(encoded_len(&mesh), 84);
    }

    #[test]
    fn test_decode_field_order() {
        let triangle = decode_triangle(&sample_record()).unwrap();

        assert_eq!(triangle.normal, Vector3::new(-1.0, -0.5, 0.0));
        assert_eq!(triangle.vertices[0], Point3::new(0.5, 1.0, 1.5));
        assert_eq!(triangle.vertices[1], Point3::new(2.0, 2.5, 3.0));
        assert_eq!(triangle.vertices[2], Point3::new(3.5, 4.0, 4.5));
        assert_eq!(triangle.attribute_byte_count, 0xBEEF);
    }

    #[test]
    fn test_record_roundtrip_is_bit_exact() {
        let mut record = sample_record();
        // NaN with a payload, negative zero and infinity.
        record[0..4].copy_from_slice(&0x7FC0_1234u32.to_le_bytes());
        record[4..8].copy_from_slice(&(-0.0f32).to_le_bytes());
        record[8..12].copy_from_slice(&f32::INFINITY.to_le_bytes());

        let triangle = decode_triangle(&record).unwrap();
        assert_eq!(encode_triangle(&triangle).as_slice(), record.as_slice());
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let record = sample_record();
        assert!(matches!(
            decode_triangle(&record[..49]),
            Err(StlError::MalformedRecord { len: 49 })
        ));

        let mut long = record.clone();
        long.push(0);
        assert!(matches!(
            decode_triangle(&long),
            Err(StlError::MalformedRecord { len: 51 })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = vec![0u8; 79];
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::TruncatedHeader { len: 79 })
        ));

        // Header present but the count field is cut short.
        let data = vec![0u8; 82];
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::TruncatedHeader { len: 82 })
        ));
    }

    #[test]
    fn test_truncated_body() {
        let mut data = stl_bytes(2, &[sample_record()]);
        data.extend_from_slice(&[0u8; 10]);

        match parse_binary_stl(&data) {
            Err(StlError::TruncatedBody {
                expected,
                available,
            }) => {
                assert_eq!(expected, 100);
                assert_eq!(available, 60);
            }
            other => panic!("expected TruncatedBody, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_count_fails_before_allocating() {
        let data = stl_bytes(u32::MAX, &[sample_record()]);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::TruncatedBody { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut data = stl_bytes(1, &[sample_record()]);
        data.extend_from_slice(b"trailing garbage");

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_file_roundtrip_preserves_header_and_order() {
        let mut second = sample_record();
        second[48..].copy_from_slice(&1u16.to_le_bytes());
        let data = stl_bytes(2, &[sample_record(), second]);

        let mesh = read_binary_stl(data.as_slice()).unwrap();
        assert_eq!(mesh.header, [b'h'; HEADER_SIZE]);
        assert_eq!(mesh.triangles[0].attribute_byte_count, 0xBEEF);
        assert_eq!(mesh.triangles[1].attribute_byte_count, 1);

        let mut out = Vec::new();
        write_binary_stl(&mesh, &mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(out.len(), encoded_len(&mesh));
    }

    #[test]
    fn test_write_uses_current_triangle_count() {
        let data = stl_bytes(2, &[sample_record(), sample_record()]);
        let mut mesh = parse_binary_stl(&data).unwrap();
        mesh.triangles.pop();

        let mut out = Vec::new();
        write_binary_stl(&mesh, &mut out).unwrap();
        assert_eq!(&out[80..84], &1u32.to_le_bytes());
        assert_eq!(out.len(), 84 + TRIANGLE_SIZE);
    }
}
