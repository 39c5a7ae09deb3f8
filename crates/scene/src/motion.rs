use glam::Vec3;
use sceneview_common::Transform;
use serde::{Deserialize, Serialize};

/// Scripted per-entity animation, advanced once per frame by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// Add `rate * dt` to pitch/yaw/roll every frame.
    Spin { rate: Vec3 },
    /// Sit at `anchor + axis * amplitude * sin(total * frequency)`.
    Oscillate {
        axis: Vec3,
        amplitude: f32,
        frequency: f32,
    },
    /// Scale the anchor scale by `1 + amplitude * sin(total * frequency)`.
    Pulse { amplitude: f32, frequency: f32 },
}

impl Motion {
    /// Apply one frame. `anchor` is the pose the entity had when the motion
    /// was attached.
    pub fn apply(&self, transform: &mut Transform, anchor: &Transform, dt: f32, total_time: f32) {
        match *self {
            Motion::Spin { rate } => transform.rotate(rate * dt),
            Motion::Oscillate {
                axis,
                amplitude,
                frequency,
            } => {
                let offset = axis * amplitude * (total_time * frequency).sin();
                transform.set_position(anchor.position() + offset);
            }
            Motion::Pulse {
                amplitude,
                frequency,
            } => {
                let factor = 1.0 + amplitude * (total_time * frequency).sin();
                transform.set_scale(anchor.scale() * factor);
            }
        }
    }
}
