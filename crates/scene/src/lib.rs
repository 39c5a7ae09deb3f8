//! Scene orchestration for SceneView.
//!
//! A [`Scene`] owns the mesh, entity and camera collections and drives one
//! frame at a time: [`Scene::update`] advances the active camera and any
//! scripted [`Motion`], then [`Scene::draw`] clears, draws every entity in
//! insertion order through a single per-object constant buffer, and presents.

mod config;
mod error;
mod motion;
mod scene;
mod starter;

pub use config::ViewerConfig;
pub use error::SceneError;
pub use motion::Motion;
pub use scene::{FrameInput, Scene};
pub use starter::{
    POLYGON_INDICES, RECTANGLE_INDICES, TRIANGLE_INDICES, build_starter_scene, polygon_vertices,
    rectangle_vertices, triangle_vertices,
};

pub fn crate_info() -> &'static str {
    "sceneview-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
