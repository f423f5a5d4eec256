//! Common math types and utilities shared across the volume-pipeline crates.

pub mod bounds;
pub mod vec3;

pub use bounds::{BoundingBox3, BoundsParseError};
pub use vec3::Vec3;
