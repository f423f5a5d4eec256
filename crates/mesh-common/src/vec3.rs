//! Pure 3-vector operations used throughout the geometry pipeline.
//!
//! All functions are side-effect free and allocate nothing beyond the
//! returned value, so they are safe to call from parallel contexts.

/// A 3-component vector. Plain array so it maps directly onto packed
/// vertex buffers without conversion.
pub type Vec3 = [f32; 3];

/// Guard threshold for near-zero squared lengths.
pub const EPSILON: f32 = 1e-12;

/// Check whether a scalar is close enough to zero to be treated as zero.
#[inline]
pub fn is_zero(x: f32) -> bool {
    x.abs() < EPSILON
}

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(v: Vec3, factor: f32) -> Vec3 {
    [factor * v[0], factor * v[1], factor * v[2]]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - b[1] * a[2],
        b[0] * a[2] - a[0] * b[2],
        a[0] * b[1] - b[0] * a[1],
    ]
}

#[inline]
pub fn square_length(v: Vec3) -> f32 {
    dot(v, v)
}

#[inline]
pub fn length(v: Vec3) -> f32 {
    square_length(v).sqrt()
}

/// Normalize a vector to unit length.
///
/// Returns the input unchanged when its squared length is below
/// [`EPSILON`], to avoid dividing by a near-zero magnitude. Callers that
/// care about degenerate input must check the result's length themselves.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let sq = square_length(v);
    if sq < EPSILON {
        return v;
    }
    scale(v, 1.0 / sq.sqrt())
}

/// Projection coefficient of `vector` onto `base`: `(v · base) / |base|²`.
///
/// A zero-length `base` yields an infinite or NaN coefficient rather than
/// an error; callers must guard when the base is not known to be non-zero.
#[inline]
pub fn project(vector: Vec3, base: Vec3) -> f32 {
    dot(vector, base) / square_length(base)
}
