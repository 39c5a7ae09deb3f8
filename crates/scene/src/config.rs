use crate::error::SceneError;
use glam::{Vec3, Vec4};
use sceneview_render::{CameraSettings, Projection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewer start-up configuration, loadable from JSON.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub clear_color: Vec4,
    pub camera_position: Vec3,
    pub perspective: CameraSettings,
    pub orthographic: CameraSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "SceneView".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: Vec4::new(0.4, 0.6, 0.75, 0.0),
            camera_position: Vec3::new(0.0, 0.0, -5.0),
            perspective: CameraSettings::default(),
            orthographic: CameraSettings {
                projection: Projection::Orthographic,
                orthographic_width: 4.0,
                ..CameraSettings::default()
            },
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        tracing::info!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "saved viewer config");
        Ok(())
    }

    /// Width over height, with a zero height treated as one.
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}
