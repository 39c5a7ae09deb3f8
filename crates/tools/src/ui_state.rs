use glam::Vec4;
use sceneview_scene::Scene;

/// State edited by the debug overlay between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub background_color: Vec4,
    pub show_entity_list: bool,
    pub show_inspector: bool,
    /// Free-form slider value, kept in `0..=100`.
    pub number: i32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            background_color: Scene::DEFAULT_CLEAR_COLOR,
            show_entity_list: true,
            show_inspector: true,
            number: 0,
        }
    }
}

impl UiState {
    pub const NUMBER_RANGE: std::ops::RangeInclusive<i32> = 0..=100;

    /// Seed the overlay from a scene's current settings.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            background_color: scene.clear_color(),
            ..Self::default()
        }
    }

    pub fn set_number(&mut self, number: i32) {
        self.number = number.clamp(*Self::NUMBER_RANGE.start(), *Self::NUMBER_RANGE.end());
    }

    pub fn toggle_entity_list(&mut self) {
        self.show_entity_list = !self.show_entity_list;
    }

    pub fn toggle_inspector(&mut self) {
        self.show_inspector = !self.show_inspector;
    }

    /// Push overlay edits into the scene.
    pub fn apply(&self, scene: &mut Scene) {
        if scene.clear_color() != self.background_color {
            tracing::debug!(color = ?self.background_color, "clear color changed");
            scene.set_clear_color(self.background_color);
        }
    }
}
