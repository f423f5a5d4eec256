//! Synthetic NRRD containers and raw geometry buffers for tests.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use mesh_common::Vec3;

/// Gzip a payload the way NRRD producers do.
pub fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload)
        .expect("writing to an in-memory encoder cannot fail");
    encoder.finish().expect("gzip encoding cannot fail")
}

/// Assemble a complete NRRD byte buffer: header text, blank-line
/// terminator, gzipped body.
pub fn build_nrrd(header: &str, body: &[u8]) -> Vec<u8> {
    let mut buffer = header.as_bytes().to_vec();
    buffer.extend_from_slice(b"\n\n");
    buffer.extend_from_slice(&gzip(body));
    buffer
}

/// A well-formed header for a little-endian float vector field of the
/// given grid extent, with `components` values per voxel.
pub fn nrrd_header(components: usize, sx: usize, sy: usize, sz: usize) -> String {
    format!(
        "NRRD0004\n\
         # synthetic test volume\n\
         type: float\n\
         dimension: 4\n\
         space dimension: 3\n\
         sizes: {components} {sx} {sy} {sz}\n\
         endian: little\n\
         encoding: gzip\n\
         space origin: (0, 0, 0)\n\
         space directions: none (1, 0, 0) (0, 1, 0) (0, 0, 1)"
    )
}

/// A float payload where voxel (x, y, z) stores the vector (x, y, z).
///
/// Verifiable by construction: sampling at a voxel center must return the
/// voxel's own coordinates.
pub fn coordinate_volume_payload(sx: usize, sy: usize, sz: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(sx * sy * sz * 3 * 4);
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                for component in [x as f32, y as f32, z as f32] {
                    data.extend_from_slice(&component.to_le_bytes());
                }
            }
        }
    }
    data
}

/// Encode triangle indices as the little-endian u32 buffer an external
/// loader would deliver.
pub fn index_buffer(indices: &[u32]) -> Vec<u8> {
    indices.iter().flat_map(|i| i.to_le_bytes()).collect()
}

/// Encode vertex positions as a flat little-endian f32 buffer
/// (3 floats per vertex).
pub fn vertex_buffer(positions: &[Vec3]) -> Vec<u8> {
    positions
        .iter()
        .flat_map(|p| p.iter().flat_map(|c| c.to_le_bytes()))
        .collect()
}
