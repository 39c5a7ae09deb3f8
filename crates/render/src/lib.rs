//! Rendering core: the context interface, meshes, entities and cameras.
//!
//! # Invariants
//! - The core never touches GPU objects directly; it holds [`BufferId`]s and
//!   calls through a [`RenderContext`].
//! - Mesh buffers are immutable after creation.
//! - A per-object constant write is always followed by its draw before the
//!   next write to the same buffer.

mod camera;
mod constants;
mod context;
mod entity;
mod error;
mod mesh;
mod recording;

pub use camera::{Camera, CameraSettings, FAST_MULTIPLIER, MAX_PITCH, Projection};
pub use constants::ObjectConstants;
pub use context::{BufferDesc, BufferId, BufferKind, BufferUsage, RenderContext, discard_image};
pub use entity::{DEFAULT_TINT, GameEntity};
pub use error::RenderError;
pub use mesh::{Mesh, validate_geometry};
pub use recording::{Command, RecordingContext};

pub fn crate_info() -> &'static str {
    "sceneview-render v0.1.0"
}
