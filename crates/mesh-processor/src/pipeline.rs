//! Pipeline assembly: mesh + normals + optional volume sampling down to a
//! renderer-ready geometry bundle.

use mesh_common::vec3::{add, scale, sub};
use mesh_common::{BoundingBox3, Vec3};
use nrrd_parser::Volume;

use crate::interleave::{interleave, Attribute, InterleavedBuffer};
use crate::normals::NormalField;
use crate::{GeometryError, Mesh};

/// How far along the vertex normal each volume probe step moves.
const PROBE_STEP: f32 = 0.2;

/// Upper bound on probe steps per vertex, so a probe that never finds a
/// sample cannot loop forever.
const MAX_PROBE_STEPS: usize = 32;

/// Sample value marking "no volume data found for this vertex".
const SENTINEL: Vec3 = [-1.0, -1.0, -1.0];

/// Quality counters reported alongside the geometry.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDiagnostics {
    pub invalid_normal_count: usize,
    pub invalid_normal_percent: f32,
    /// Percentage of vertices whose volume probe found a sample; `None`
    /// when no volume was supplied.
    pub volume_hit_percent: Option<f32>,
}

/// Geometry ready for a renderer: one interleaved vertex buffer, the
/// triangle index list, the declared field layout, and diagnostics.
#[derive(Debug, Clone)]
pub struct GeometryBundle {
    pub buffer: InterleavedBuffer,
    pub indices: Vec<u32>,
    pub diagnostics: SurfaceDiagnostics,
}

/// Assemble the renderer-facing geometry.
///
/// Vertices are re-centered on the bounding-box center; the external
/// bounds descriptor wins when provided, otherwise the box is computed
/// from the positions. When a volume is supplied, each vertex probes it
/// along its normal for an auxiliary coordinate triple; vertices whose
/// probe finds nothing keep the `[-1, -1, -1]` sentinel.
pub fn build_surface(
    mesh: &Mesh,
    normals: &NormalField,
    volume: Option<&Volume>,
    bounds_override: Option<BoundingBox3>,
) -> Result<GeometryBundle, GeometryError> {
    let positions = mesh.positions();
    if normals.len() != positions.len() {
        return Err(GeometryError::AttributeCountMismatch {
            name: "normal",
            expected: positions.len(),
            actual: normals.len(),
        });
    }

    let bounds = match bounds_override {
        Some(bounds) => bounds,
        // A validated mesh can still be empty; an empty mesh needs no
        // centering.
        None => BoundingBox3::from_points(positions)
            .unwrap_or_else(|_| BoundingBox3::new([0.0; 3], [0.0; 3])),
    };
    let center = bounds.center();

    let centered: Vec<f32> = positions
        .iter()
        .flat_map(|p| sub(*p, center))
        .collect();
    let normal_values = flatten(normals.normals());

    let mut attributes = vec![
        Attribute::new("position", 3, &centered),
        Attribute::new("normal", 3, &normal_values),
    ];

    let mut volume_hit_percent = None;
    let aux_values;
    if let Some(volume) = volume {
        let (aux, hits) = probe_volume(volume, positions, normals.normals());
        tracing::debug!(
            hits,
            vertices = positions.len(),
            "volume probe finished"
        );
        volume_hit_percent = Some(if positions.is_empty() {
            0.0
        } else {
            100.0 * hits as f32 / positions.len() as f32
        });
        aux_values = aux;
        attributes.push(Attribute::new("aux", 3, &aux_values));
    }

    let buffer = interleave(&attributes)?;
    Ok(GeometryBundle {
        buffer,
        indices: mesh.indices().to_vec(),
        diagnostics: SurfaceDiagnostics {
            invalid_normal_count: normals.invalid_count(),
            invalid_normal_percent: normals.invalid_percent(),
            volume_hit_percent,
        },
    })
}

/// Probe the volume at every vertex, walking along the vertex normal
/// until a non-missing sample turns up or the step budget runs out.
fn probe_volume(volume: &Volume, positions: &[Vec3], normals: &[Vec3]) -> (Vec<f32>, usize) {
    let mut aux = Vec::with_capacity(positions.len() * 3);
    let mut hits = 0;
    for (position, normal) in positions.iter().zip(normals) {
        let shift = scale(*normal, PROBE_STEP);
        let mut probe = add(*position, shift);
        let mut sample = SENTINEL;
        for _ in 0..MAX_PROBE_STEPS {
            match volume.sample(probe) {
                Ok(value) if value[0] < -0.9 => probe = add(probe, shift),
                Ok(value) => {
                    sample = value;
                    break;
                }
                // Left the volume: keep the sentinel.
                Err(_) => break,
            }
        }
        if sample != SENTINEL {
            hits += 1;
        }
        aux.extend_from_slice(&sample);
    }
    (aux, hits)
}

fn flatten(vectors: &[Vec3]) -> Vec<f32> {
    vectors.iter().flat_map(|v| *v).collect()
}
