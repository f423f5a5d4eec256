//! Triangle mesh model and raw-buffer decoding.

use mesh_common::Vec3;

use crate::GeometryError;

/// Interpretation of a raw vertex buffer from the external loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// 3 floats per vertex: position only.
    Positions,
    /// 9 floats per vertex: position + normal + auxiliary coordinates.
    Interleaved,
}

impl VertexFormat {
    fn floats_per_vertex(self) -> usize {
        match self {
            VertexFormat::Positions => 3,
            VertexFormat::Interleaved => 9,
        }
    }
}

/// An indexed triangle mesh.
///
/// Construction validates the topology, so a `Mesh` value always satisfies
/// the index invariants: index count is a multiple of 3 and every index is
/// below the vertex count.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

/// Attribute arrays recovered from a pre-interleaved vertex buffer.
#[derive(Debug, Clone)]
pub struct SplitVertexData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub aux: Vec<Vec3>,
}

impl Mesh {
    /// Build a mesh from decoded arrays, validating the topology before
    /// anything can index into the vertex array.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles(indices.len()));
        }
        let vertex_count = positions.len();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index: bad,
                vertex_count,
            });
        }
        Ok(Self { positions, indices })
    }

    /// Decode a mesh from the loader's raw byte buffers: a little-endian
    /// u32 triangle list and a flat little-endian f32 position buffer.
    pub fn from_raw_buffers(
        index_bytes: &[u8],
        vertex_bytes: &[u8],
    ) -> Result<Self, GeometryError> {
        let indices = decode_u32_buffer(index_bytes)?;
        let floats = decode_f32_buffer(vertex_bytes, VertexFormat::Positions)?;
        let positions = floats.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(positions, indices)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Consume the mesh, returning its arrays.
    pub fn into_parts(self) -> (Vec<Vec3>, Vec<u32>) {
        (self.positions, self.indices)
    }
}

/// Decode a little-endian u32 index buffer.
pub fn decode_u32_buffer(bytes: &[u8]) -> Result<Vec<u32>, GeometryError> {
    if bytes.len() % 4 != 0 {
        return Err(GeometryError::MalformedIndexBuffer(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Decode a little-endian f32 vertex buffer, checking that it divides into
/// whole records for the declared format.
pub fn decode_f32_buffer(
    bytes: &[u8],
    format: VertexFormat,
) -> Result<Vec<f32>, GeometryError> {
    let floats_per_vertex = format.floats_per_vertex();
    if bytes.len() % (4 * floats_per_vertex) != 0 {
        return Err(GeometryError::MalformedVertexBuffer {
            length: bytes.len(),
            floats_per_vertex,
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Split a pre-interleaved 9-float vertex buffer into its attribute
/// arrays (position, normal, auxiliary coordinates).
pub fn split_interleaved(vertex_bytes: &[u8]) -> Result<SplitVertexData, GeometryError> {
    let floats = decode_f32_buffer(vertex_bytes, VertexFormat::Interleaved)?;
    let vertex_count = floats.len() / 9;
    let mut split = SplitVertexData {
        positions: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        aux: Vec::with_capacity(vertex_count),
    };
    for record in floats.chunks_exact(9) {
        split.positions.push([record[0], record[1], record[2]]);
        split.normals.push([record[3], record[4], record[5]]);
        split.aux.push([record[6], record[7], record[8]]);
    }
    Ok(split)
}
