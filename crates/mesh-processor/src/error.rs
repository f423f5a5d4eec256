//! Error types for geometry processing.

use thiserror::Error;

/// Errors raised while building renderable geometry.
///
/// Topology errors are raised up front, before any indexed access is
/// attempted. Degenerate normals are deliberately not an error; they are
/// counted as a diagnostic on the computed field instead.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The index array length is not a multiple of 3.
    #[error("triangle index array length {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),

    /// An index references a vertex beyond the vertex array.
    #[error("triangle index {index} is out of range: the mesh has {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A raw index buffer whose byte length is not a whole number of u32s.
    #[error("index buffer length {0} is not a multiple of 4 bytes")]
    MalformedIndexBuffer(usize),

    /// A raw vertex buffer whose byte length does not divide into whole
    /// vertex records for the declared format.
    #[error("vertex buffer length {length} does not divide into {floats_per_vertex}-float vertices")]
    MalformedVertexBuffer {
        length: usize,
        floats_per_vertex: usize,
    },

    /// Parallel attribute arrays disagree on the vertex count.
    #[error("attribute \"{name}\" has {actual} vertices, expected {expected}")]
    AttributeCountMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An attribute's flat value array is not a multiple of its width.
    #[error("attribute \"{name}\" has {values} values, not divisible by width {width}")]
    RaggedAttribute {
        name: &'static str,
        values: usize,
        width: usize,
    },
}
