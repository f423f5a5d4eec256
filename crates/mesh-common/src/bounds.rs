//! Axis-aligned bounding boxes and the external bounds descriptor.

use serde::{Deserialize, Serialize};

use crate::vec3::Vec3;

/// An axis-aligned bounding box in model space.
///
/// Also the shape of the external bounds/info descriptor delivered next to
/// raw geometry buffers: a JSON record `{ "min": [x,y,z], "max": [x,y,z] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox3 {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Reduce a point sequence to its per-axis min/max.
    ///
    /// An empty sequence has no defined bounding box and is an explicit
    /// error rather than an arbitrary default.
    pub fn from_points(points: &[Vec3]) -> Result<Self, BoundsParseError> {
        let (first, rest) = points.split_first().ok_or(BoundsParseError::EmptyPointSet)?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Ok(Self { min, max })
    }

    /// Parse and validate an external bounds descriptor.
    ///
    /// Wrong arity or non-numeric entries are rejected here, at the
    /// boundary, instead of propagating into the pipeline.
    pub fn from_json(text: &str) -> Result<Self, BoundsParseError> {
        let bounds: BoundingBox3 = serde_json::from_str(text)
            .map_err(|e| BoundsParseError::InvalidFormat(e.to_string()))?;
        for (axis, (&lo, &hi)) in bounds.min.iter().zip(bounds.max.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(BoundsParseError::NonFiniteValue { axis });
            }
            if lo > hi {
                return Err(BoundsParseError::InvertedAxis { axis, min: lo, max: hi });
            }
        }
        Ok(bounds)
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Per-axis extent of the box.
    pub fn size(&self) -> Vec3 {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Grow the box to include a point.
    pub fn expand(&mut self, point: Vec3) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    /// Check whether a point lies inside the box (inclusive).
    pub fn contains(&self, point: Vec3) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsParseError {
    #[error("cannot compute a bounding box over an empty point set")]
    EmptyPointSet,

    #[error("invalid bounds descriptor: {0}")]
    InvalidFormat(String),

    #[error("bounds descriptor has a non-finite value on axis {axis}")]
    NonFiniteValue { axis: usize },

    #[error("bounds descriptor min > max on axis {axis}: {min} > {max}")]
    InvertedAxis { axis: usize, min: f32, max: f32 },
}
