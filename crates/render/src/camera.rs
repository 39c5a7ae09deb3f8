use glam::{Mat4, Vec3};
use sceneview_common::Transform;
use sceneview_input::{InputState, Key};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Largest pitch magnitude the interactive camera allows. Just short of a
/// quarter turn so forward never becomes parallel to world up.
pub const MAX_PITCH: f32 = FRAC_PI_2 - 0.001;

/// Movement multiplier while Shift is held.
pub const FAST_MULTIPLIER: f32 = 3.0;

/// Projection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Lens and controller parameters for a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in radians (perspective only).
    pub field_of_view: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Width of the view volume in world units (orthographic only).
    pub orthographic_width: f32,
    pub projection: Projection,
    /// World units per second.
    pub movement_speed: f32,
    /// Radians per unit of pointer delta.
    pub look_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            field_of_view: FRAC_PI_4,
            near_clip: 0.01,
            far_clip: 100.0,
            orthographic_width: 10.0,
            projection: Projection::Perspective,
            movement_speed: 5.0,
            look_sensitivity: 0.005,
        }
    }
}

/// A left-handed camera with its own [`Transform`].
///
/// The view and projection matrices are cached, so every setter that affects
/// the lens recomputes the projection before returning. Pose changes made
/// through [`transform_mut`](Self::transform_mut) become visible after
/// [`update_view_matrix`](Self::update_view_matrix).
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    view: Mat4,
    projection: Mat4,
    field_of_view: f32,
    aspect_ratio: f32,
    near_clip: f32,
    far_clip: f32,
    orthographic_width: f32,
    mode: Projection,
    active: bool,
    movement_speed: f32,
    look_sensitivity: f32,
}

impl Camera {
    /// Create an inactive camera at `position` looking down +Z.
    pub fn new(position: Vec3, aspect_ratio: f32, settings: CameraSettings) -> Self {
        let mut camera = Self {
            transform: Transform::from_position(position),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            field_of_view: settings.field_of_view,
            aspect_ratio,
            near_clip: settings.near_clip,
            far_clip: settings.far_clip,
            orthographic_width: settings.orthographic_width,
            mode: settings.projection,
            active: false,
            movement_speed: settings.movement_speed,
            look_sensitivity: settings.look_sensitivity,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix(aspect_ratio);
        camera
    }

    /// Recompute the view matrix from the current position and forward
    /// vector, with world up fixed at +Y.
    pub fn update_view_matrix(&mut self) {
        self.view = Mat4::look_to_lh(
            self.transform.position(),
            self.transform.forward(),
            Vec3::Y,
        );
    }

    /// Store `aspect_ratio` and recompute the projection matrix.
    pub fn update_projection_matrix(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection = match self.mode {
            Projection::Perspective => Mat4::perspective_lh(
                self.field_of_view,
                aspect_ratio,
                self.near_clip,
                self.far_clip,
            ),
            Projection::Orthographic => {
                let half_width = self.orthographic_width / 2.0;
                let half_height = half_width / aspect_ratio;
                Mat4::orthographic_lh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near_clip,
                    self.far_clip,
                )
            }
        };
    }

    /// Advance the pose from sampled input.
    ///
    /// W/S, D/A and Space/X move along the camera's own forward, right and up
    /// axes. While the look button is held, horizontal pointer motion turns
    /// yaw and vertical motion turns pitch. Pitch is clamped to
    /// [`MAX_PITCH`]; yaw is wrapped into `[-PI, PI]`.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let mut speed = self.movement_speed * dt;
        if input.key_down(Key::Shift) {
            speed *= FAST_MULTIPLIER;
        }

        let mut offset = Vec3::ZERO;
        if input.key_down(Key::W) {
            offset.z += speed;
        }
        if input.key_down(Key::S) {
            offset.z -= speed;
        }
        if input.key_down(Key::D) {
            offset.x += speed;
        }
        if input.key_down(Key::A) {
            offset.x -= speed;
        }
        if input.key_down(Key::Space) {
            offset.y += speed;
        }
        if input.key_down(Key::X) {
            offset.y -= speed;
        }
        if offset != Vec3::ZERO {
            self.transform.move_relative(offset);
        }

        if input.look_held() {
            let delta = input.pointer_delta() * self.look_sensitivity;
            self.transform.rotate(Vec3::new(delta.y, delta.x, 0.0));
        }

        let rotation = self.transform.rotation();
        let mut yaw = rotation.y;
        if yaw.abs() > PI {
            yaw = (yaw + PI).rem_euclid(TAU) - PI;
        }
        self.transform.set_rotation(Vec3::new(
            rotation.x.clamp(-MAX_PITCH, MAX_PITCH),
            yaw,
            rotation.z,
        ));

        self.update_view_matrix();
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable pose. Call [`update_view_matrix`](Self::update_view_matrix)
    /// afterwards.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark this camera as feeding the frame's draws. Nothing here stops
    /// several cameras from being active at once.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
        self.update_projection_matrix(self.aspect_ratio);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near_clip = near;
        self.far_clip = far;
        self.update_projection_matrix(self.aspect_ratio);
    }

    pub fn orthographic_width(&self) -> f32 {
        self.orthographic_width
    }

    pub fn set_orthographic_width(&mut self, width: f32) {
        self.orthographic_width = width;
        self.update_projection_matrix(self.aspect_ratio);
    }

    pub fn projection_mode(&self) -> Projection {
        self.mode
    }

    pub fn set_projection_mode(&mut self, mode: Projection) {
        self.mode = mode;
        self.update_projection_matrix(self.aspect_ratio);
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    pub fn look_sensitivity(&self) -> f32 {
        self.look_sensitivity
    }

    pub fn set_look_sensitivity(&mut self, sensitivity: f32) {
        self.look_sensitivity = sensitivity;
    }
}
