//! wgpu rendering context for SceneView.
//!
//! [`WgpuContext`] implements the scene core's `RenderContext` over a wgpu
//! device and window surface: one pipeline, one uniform bind group for the
//! per-object record, and a render pass per draw.
//!
//! # Invariants
//! - Buffers are addressed only through `BufferId`s handed out here.
//! - A frame is acquired by `clear` and released by `present`.

mod context;
mod pipeline;
mod shaders;

pub use context::{WgpuContext, buffer_usages, padded_size, to_wgpu_color};
pub use pipeline::{DEPTH_FORMAT, vertex_layout};
pub use shaders::SCENE_SHADER;
