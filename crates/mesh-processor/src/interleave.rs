//! Attribute interleaving.
//!
//! Packs parallel per-vertex attribute arrays into one flat buffer with a
//! fixed stride, so a renderer reads each vertex's attributes from one
//! contiguous record. This is purely a memory-layout transform: values are
//! copied, never recomputed, so extraction recovers the sources
//! bit-identically.

use rayon::prelude::*;

use crate::GeometryError;

/// Vertex counts at or above this run the fill in parallel.
const PARALLEL_THRESHOLD: usize = 4096;

/// One attribute source: a flat value array holding `width` floats per
/// vertex.
#[derive(Debug, Clone, Copy)]
pub struct Attribute<'a> {
    pub name: &'static str,
    pub width: usize,
    pub values: &'a [f32],
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'static str, width: usize, values: &'a [f32]) -> Self {
        Self { name, width, values }
    }
}

/// Placement of one field inside the per-vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

/// Declared layout of the interleaved buffer: the record stride plus the
/// offset and width of every field within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub fields: Vec<Field>,
}

impl VertexLayout {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A flat per-vertex record table plus its layout.
#[derive(Debug, Clone)]
pub struct InterleavedBuffer {
    data: Vec<f32>,
    layout: VertexLayout,
    vertex_count: usize,
}

impl InterleavedBuffer {
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Extract one field of one vertex by its declared offset and width.
    pub fn field(&self, vertex: usize, field: &Field) -> &[f32] {
        let start = vertex * self.layout.stride + field.offset;
        &self.data[start..start + field.width]
    }
}

/// Pack attribute sources into a single interleaved buffer.
///
/// Offsets are assigned in declaration order; the stride is the sum of the
/// widths. All sources must agree on the vertex count.
pub fn interleave(attributes: &[Attribute<'_>]) -> Result<InterleavedBuffer, GeometryError> {
    let mut fields = Vec::with_capacity(attributes.len());
    let mut stride = 0;
    for attribute in attributes {
        if attribute.width == 0 || attribute.values.len() % attribute.width != 0 {
            return Err(GeometryError::RaggedAttribute {
                name: attribute.name,
                values: attribute.values.len(),
                width: attribute.width.max(1),
            });
        }
        fields.push(Field {
            name: attribute.name,
            offset: stride,
            width: attribute.width,
        });
        stride += attribute.width;
    }

    let vertex_count = attributes
        .first()
        .map(|a| a.values.len() / a.width)
        .unwrap_or(0);
    for attribute in attributes {
        let actual = attribute.values.len() / attribute.width;
        if actual != vertex_count {
            return Err(GeometryError::AttributeCountMismatch {
                name: attribute.name,
                expected: vertex_count,
                actual,
            });
        }
    }

    let mut data = vec![0.0f32; vertex_count * stride];
    let fill = |(vertex, record): (usize, &mut [f32])| {
        for (attribute, field) in attributes.iter().zip(&fields) {
            let source = &attribute.values[vertex * field.width..(vertex + 1) * field.width];
            record[field.offset..field.offset + field.width].copy_from_slice(source);
        }
    };
    if vertex_count >= PARALLEL_THRESHOLD {
        data.par_chunks_mut(stride).enumerate().for_each(fill);
    } else {
        data.chunks_mut(stride).enumerate().for_each(fill);
    }

    Ok(InterleavedBuffer {
        data,
        layout: VertexLayout { stride, fields },
        vertex_count,
    })
}
