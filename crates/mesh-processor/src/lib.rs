//! Surface-geometry preparation.
//!
//! Turns raw vertex/index buffers into renderer-ready geometry: topology
//! validation, per-vertex normal computation with degeneracy diagnostics,
//! attribute interleaving, and the pipeline assembly that combines a mesh
//! with an optional sampled volume.

pub mod error;
pub mod interleave;
pub mod mesh;
pub mod normals;
pub mod pipeline;

pub use error::GeometryError;
pub use interleave::{Attribute, Field, InterleavedBuffer, VertexLayout};
pub use mesh::{split_interleaved, Mesh, SplitVertexData, VertexFormat};
pub use normals::{compute_normals, NormalField};
pub use pipeline::{build_surface, GeometryBundle, SurfaceDiagnostics};
