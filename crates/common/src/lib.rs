//! Shared types for the sceneview renderer.
//!
//! # Invariants
//! - A [`Transform`]'s matrices are derived from its raw vectors on demand and
//!   are never stored as the source of truth.
//! - [`Vertex`] layout is fixed: it is read positionally by the vertex stage.

pub mod transform;
pub mod vertex;

pub use transform::Transform;
pub use vertex::{Vertex, colors};
