//! Canonical mesh fixtures used across the test suite.

use mesh_common::Vec3;

/// A single counter-clockwise triangle in the z = 0 plane.
///
/// Its face normal is `(0, 0, 1)`, which makes normal-computation results
/// easy to verify exactly.
pub fn unit_triangle() -> (Vec<Vec3>, Vec<u32>) {
    (
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2],
    )
}

/// Two triangles forming a unit quad in the z = 0 plane.
///
/// Every vertex normal averages to `(0, 0, 1)`.
pub fn unit_quad() -> (Vec<Vec3>, Vec<u32>) {
    (
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// A healthy triangle plus one degenerate triangle with two coincident
/// vertices.
///
/// Vertex 3 only appears in the degenerate triangle, so its accumulated
/// normal stays at the seed value and fails validation.
pub fn mesh_with_degenerate_triangle() -> (Vec<Vec3>, Vec<u32>) {
    (
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [2.0, 2.0, 0.0],
        ],
        // Second triangle repeats vertex 3: its edges are parallel and the
        // face normal collapses.
        vec![0, 1, 2, 3, 3, 0],
    )
}
