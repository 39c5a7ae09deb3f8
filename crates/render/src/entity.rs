use crate::camera::Camera;
use crate::constants::ObjectConstants;
use crate::context::{BufferId, RenderContext};
use crate::error::RenderError;
use crate::mesh::Mesh;
use glam::{Mat4, Vec4};
use sceneview_common::Transform;
use std::rc::Rc;

/// Tint applied to entities that never had one set.
pub const DEFAULT_TINT: Vec4 = Vec4::new(1.0, 0.5, 0.5, 1.0);

/// A drawable instance: its own [`Transform`] plus a shared [`Mesh`].
///
/// Entities that share a mesh never share a transform; each one starts at
/// the identity pose.
#[derive(Debug, Clone)]
pub struct GameEntity {
    transform: Transform,
    mesh: Rc<Mesh>,
    color_tint: Vec4,
}

impl GameEntity {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        Self {
            transform: Transform::new(),
            mesh,
            color_tint: DEFAULT_TINT,
        }
    }

    pub fn mesh(&self) -> &Rc<Mesh> {
        &self.mesh
    }

    pub fn set_mesh(&mut self, mesh: Rc<Mesh>) {
        self.mesh = mesh;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn color_tint(&self) -> Vec4 {
        self.color_tint
    }

    pub fn set_color_tint(&mut self, tint: Vec4) {
        self.color_tint = tint;
    }

    /// Upload this entity's constants into `constants` and draw its mesh.
    ///
    /// The buffer holds a single record, so the write and the draw have to
    /// reach the context back to back. Without a camera, view and projection
    /// are identity.
    pub fn draw<C: RenderContext + ?Sized>(
        &self,
        ctx: &mut C,
        constants: BufferId,
        camera: Option<&Camera>,
    ) -> Result<(), RenderError> {
        let (view, projection) =
            camera.map_or((Mat4::IDENTITY, Mat4::IDENTITY), |c| (c.view(), c.projection()));
        let record = ObjectConstants::new(
            self.color_tint,
            self.transform.world_matrix(),
            view,
            projection,
        );
        ctx.write_discard(constants, bytemuck::bytes_of(&record))?;
        self.mesh.draw(ctx);
        Ok(())
    }
}
