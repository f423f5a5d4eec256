//! Per-vertex normal computation with degeneracy diagnostics.

use mesh_common::vec3::{add, cross, normalize, square_length, sub};
use mesh_common::Vec3;

use crate::Mesh;

/// Accumulators start at this tiny non-zero vector instead of zero.
/// Its squared length sits below the normalize guard, so an accumulator
/// that never receives a face contribution passes through normalization
/// unchanged and is then flagged as degenerate.
const SEED: Vec3 = [1e-7, 0.0, 0.0];

/// Squared length below which a finished normal counts as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// A unit normal per vertex, index-aligned with the mesh's vertex array,
/// plus a count of entries that failed validation.
///
/// Invalid entries are kept in place rather than dropped: partial,
/// mostly-correct output is more useful to a visualization pipeline than
/// a hard failure.
#[derive(Debug, Clone)]
pub struct NormalField {
    normals: Vec<Vec3>,
    invalid: usize,
}

impl NormalField {
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Number of entries that are NaN or degenerate.
    pub fn invalid_count(&self) -> usize {
        self.invalid
    }

    /// Fraction of invalid entries, in percent.
    pub fn invalid_percent(&self) -> f32 {
        if self.normals.is_empty() {
            return 0.0;
        }
        100.0 * self.invalid as f32 / self.normals.len() as f32
    }

    pub fn into_vec(self) -> Vec<Vec3> {
        self.normals
    }
}

/// Compute a unit normal per vertex by averaging the face normals of all
/// incident triangles.
///
/// Face normals are normalized before accumulation, so every triangle
/// contributes equal weight to each of its vertices regardless of area or
/// corner angle. Changing that weighting would change the rendered
/// shading, so it stays exactly as is.
pub fn compute_normals(mesh: &Mesh) -> NormalField {
    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "computing normals"
    );
    let positions = mesh.positions();
    let mut normals = vec![SEED; positions.len()];

    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let ab = normalize(sub(positions[b], positions[a]));
        let ac = normalize(sub(positions[c], positions[a]));
        let face_normal = normalize(cross(ab, ac));
        normals[a] = add(normals[a], face_normal);
        normals[b] = add(normals[b], face_normal);
        normals[c] = add(normals[c], face_normal);
    }

    for normal in &mut normals {
        *normal = normalize(*normal);
    }

    // Validation flags entries instead of failing the computation: real
    // meshes routinely contain a few degenerate faces.
    let mut invalid = 0;
    for (index, normal) in normals.iter().enumerate() {
        if normal.iter().any(|c| c.is_nan()) || square_length(*normal) < DEGENERATE_EPSILON {
            tracing::trace!(index, ?normal, "invalid normal");
            invalid += 1;
        }
    }

    let field = NormalField { normals, invalid };
    if invalid > 0 {
        tracing::warn!(
            invalid,
            percent = format!("{:.2}", field.invalid_percent()),
            "normal field contains invalid entries"
        );
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mesh;

    #[test]
    fn test_seed_stays_below_both_thresholds() {
        // The seed must survive normalization unchanged (below the
        // normalize guard) and still register as degenerate afterwards.
        assert!(square_length(SEED) > 0.0);
        assert!(square_length(SEED) < mesh_common::vec3::EPSILON);
        assert_eq!(normalize(SEED), SEED);
        assert!(square_length(SEED) < DEGENERATE_EPSILON);
    }

    #[test]
    fn test_isolated_vertex_counts_as_invalid() {
        // One triangle, one extra vertex referenced by nothing.
        let mesh = Mesh::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]],
            vec![0, 1, 2],
        )
        .unwrap();
        let field = compute_normals(&mesh);
        assert_eq!(field.len(), 4);
        assert_eq!(field.invalid_count(), 1);
        assert_eq!(field.invalid_percent(), 25.0);
    }
}
