use sceneview_render::RenderError;

/// Errors from scene orchestration and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no active camera: mark a camera active before drawing")]
    NoActiveCamera,
    #[error("entity index {0} is out of range")]
    EntityOutOfRange(usize),
    #[error("camera index {0} is out of range")]
    CameraOutOfRange(usize),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
