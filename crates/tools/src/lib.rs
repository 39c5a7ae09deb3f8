//! Developer tooling: scene inspector, debug-overlay state, frame statistics.
//!
//! # Invariants
//! - Tools only read the scene, except [`UiState::apply`], which pushes
//!   overlay edits back into it.

mod inspector;
mod stats;
mod ui_state;

pub use inspector::{CameraInfo, EntityInfo, SceneInspector, SceneSummary};
pub use stats::FrameStats;
pub use ui_state::UiState;

pub fn crate_info() -> &'static str {
    "sceneview-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
