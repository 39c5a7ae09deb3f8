use crate::error::SceneError;
use crate::motion::Motion;
use glam::Vec4;
use sceneview_common::Transform;
use sceneview_input::InputState;
use sceneview_render::{
    BufferDesc, BufferId, Camera, GameEntity, Mesh, ObjectConstants, RenderContext, RenderError,
};
use std::rc::Rc;

/// Per-frame inputs handed to [`Scene::update`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since start-up.
    pub total_time: f32,
    pub input: &'a InputState,
}

#[derive(Debug, Clone)]
struct ScriptedMotion {
    entity: usize,
    motion: Motion,
    anchor: Transform,
}

/// Meshes, entities and cameras, plus the per-object constant buffer they
/// draw through.
///
/// Entities render in insertion order. The active camera is re-resolved on
/// every call by scanning all cameras; when several are active the last one
/// wins.
#[derive(Debug)]
pub struct Scene {
    meshes: Vec<Rc<Mesh>>,
    entities: Vec<GameEntity>,
    cameras: Vec<Camera>,
    motions: Vec<ScriptedMotion>,
    constants: BufferId,
    clear_color: Vec4,
}

impl Scene {
    /// Constant-buffer slot the per-object record is bound to.
    pub const CONSTANT_SLOT: u32 = 0;

    pub const DEFAULT_CLEAR_COLOR: Vec4 = Vec4::new(0.4, 0.6, 0.75, 0.0);

    /// Create an empty scene, allocating and binding its constant buffer.
    pub fn new<C: RenderContext + ?Sized>(ctx: &mut C) -> Result<Self, SceneError> {
        let constants = ctx.create_buffer(
            &BufferDesc::dynamic_constant("object constants", ObjectConstants::BUFFER_SIZE),
            None,
        )?;
        ctx.bind_constant_buffer(Self::CONSTANT_SLOT, constants)?;
        tracing::debug!(
            size = ObjectConstants::BUFFER_SIZE,
            "object constant buffer bound"
        );

        Ok(Self {
            meshes: Vec::new(),
            entities: Vec::new(),
            cameras: Vec::new(),
            motions: Vec::new(),
            constants,
            clear_color: Self::DEFAULT_CLEAR_COLOR,
        })
    }

    /// Take ownership of a mesh and return the shared handle entities use.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Rc<Mesh> {
        let mesh = Rc::new(mesh);
        self.meshes.push(Rc::clone(&mesh));
        mesh
    }

    /// Append an entity. Returns its index, which is also its draw position.
    pub fn add_entity(&mut self, entity: GameEntity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn meshes(&self) -> &[Rc<Mesh>] {
        &self.meshes
    }

    pub fn entities(&self) -> &[GameEntity] {
        &self.entities
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut GameEntity> {
        self.entities.get_mut(index)
    }

    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    pub fn constant_buffer(&self) -> BufferId {
        self.constants
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    /// Index of the camera that feeds this frame: the last one marked active.
    pub fn active_camera_index(&self) -> Option<usize> {
        let mut resolved = None;
        let mut active = 0usize;
        for (index, camera) in self.cameras.iter().enumerate() {
            if camera.is_active() {
                resolved = Some(index);
                active += 1;
            }
        }
        if active > 1 {
            tracing::trace!(active, ?resolved, "several cameras active, last one wins");
        }
        resolved
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera_index().map(|i| &self.cameras[i])
    }

    /// Make `index` the only active camera.
    pub fn activate_camera(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.cameras.len() {
            return Err(SceneError::CameraOutOfRange(index));
        }
        for (i, camera) in self.cameras.iter_mut().enumerate() {
            camera.set_active(i == index);
        }
        tracing::debug!(camera = index, "camera activated");
        Ok(())
    }

    /// Attach scripted motion to an entity, replacing any it already had.
    /// The entity's current pose becomes the motion's anchor.
    pub fn set_motion(&mut self, entity: usize, motion: Motion) -> Result<(), SceneError> {
        let anchor = *self
            .entities
            .get(entity)
            .ok_or(SceneError::EntityOutOfRange(entity))?
            .transform();
        self.motions.retain(|m| m.entity != entity);
        self.motions.push(ScriptedMotion {
            entity,
            motion,
            anchor,
        });
        Ok(())
    }

    pub fn clear_motion(&mut self, entity: usize) {
        self.motions.retain(|m| m.entity != entity);
    }

    pub fn motion(&self, entity: usize) -> Option<Motion> {
        self.motions
            .iter()
            .find(|m| m.entity == entity)
            .map(|m| m.motion)
    }

    /// Advance the active camera from input, then every scripted motion.
    pub fn update(&mut self, frame: &FrameInput<'_>) {
        if let Some(index) = self.active_camera_index() {
            self.cameras[index].update(frame.input, frame.dt);
        }
        for scripted in &self.motions {
            if let Some(entity) = self.entities.get_mut(scripted.entity) {
                scripted.motion.apply(
                    entity.transform_mut(),
                    &scripted.anchor,
                    frame.dt,
                    frame.total_time,
                );
            }
        }
    }

    /// React to a window resize: every camera gets the new aspect ratio.
    /// View matrices are left alone.
    pub fn resize(&mut self, width: u32, height: u32) {
        let aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
        for camera in &mut self.cameras {
            camera.update_projection_matrix(aspect_ratio);
        }
        tracing::info!(width, height, aspect_ratio, "scene resized");
    }

    /// Render one frame: clear, draw every entity in order, present.
    pub fn draw<C: RenderContext + ?Sized>(&self, ctx: &mut C) -> Result<(), SceneError> {
        self.draw_with_overlay(ctx, |_| Ok(()))
    }

    /// Like [`draw`](Self::draw), running `overlay` after the last entity and
    /// before present.
    ///
    /// Fails with [`SceneError::NoActiveCamera`] before touching the context
    /// if no camera is active.
    pub fn draw_with_overlay<C, F>(&self, ctx: &mut C, overlay: F) -> Result<(), SceneError>
    where
        C: RenderContext + ?Sized,
        F: FnOnce(&mut C) -> Result<(), RenderError>,
    {
        let camera = self.active_camera().ok_or(SceneError::NoActiveCamera)?;

        ctx.clear(self.clear_color)?;
        for entity in &self.entities {
            entity.draw(ctx, self.constants, Some(camera))?;
        }
        overlay(ctx)?;
        ctx.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use sceneview_common::{Vertex, colors};
    use sceneview_input::Key;
    use sceneview_render::{CameraSettings, Command, RecordingContext};

    fn triangle(ctx: &mut RecordingContext) -> Mesh {
        let vertices = [
            Vertex::new(Vec3::new(0.0, 0.5, 0.0), colors::RED),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), colors::BLUE),
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), colors::GREEN),
        ];
        Mesh::with_name(ctx, "triangle", &vertices, &[0, 1, 2]).unwrap()
    }

    fn camera(active: bool) -> Camera {
        let mut c = Camera::new(Vec3::new(0.0, 0.0, -5.0), 16.0 / 9.0, CameraSettings::default());
        c.set_active(active);
        c
    }

    fn frame(input: &InputState, dt: f32, total_time: f32) -> FrameInput<'_> {
        FrameInput {
            dt,
            total_time,
            input,
        }
    }

    #[test]
    fn new_binds_constant_buffer() {
        let mut ctx = RecordingContext::new();
        let scene = Scene::new(&mut ctx).unwrap();
        assert_eq!(
            ctx.commands().last(),
            Some(&Command::BindConstantBuffer {
                slot: 0,
                buffer: scene.constant_buffer(),
            })
        );
        assert_eq!(
            ctx.buffer_desc(scene.constant_buffer()).unwrap().size,
            ObjectConstants::BUFFER_SIZE
        );
    }

    #[test]
    fn last_active_camera_wins() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        scene.add_camera(camera(true));
        let b = scene.add_camera(camera(true));
        scene.add_camera(camera(false));
        assert_eq!(scene.active_camera_index(), Some(b));
    }

    #[test]
    fn activate_camera_is_exclusive() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let a = scene.add_camera(camera(true));
        scene.add_camera(camera(true));

        scene.activate_camera(a).unwrap();
        assert_eq!(scene.active_camera_index(), Some(a));
        assert!(!scene.cameras()[1].is_active());
        assert!(matches!(
            scene.activate_camera(5),
            Err(SceneError::CameraOutOfRange(5))
        ));
    }

    #[test]
    fn draw_without_active_camera_fails_fast() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        scene.add_entity(GameEntity::new(mesh));
        scene.add_camera(camera(false));
        ctx.take_commands();

        assert!(matches!(
            scene.draw(&mut ctx),
            Err(SceneError::NoActiveCamera)
        ));
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn draw_order_is_clear_entities_present() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        for x in [-1.0, 0.0, 1.0] {
            let mut entity = GameEntity::new(Rc::clone(&mesh));
            entity.transform_mut().set_position(Vec3::new(x, 0.0, 0.0));
            scene.add_entity(entity);
        }
        scene.add_camera(camera(true));
        ctx.take_commands();

        scene.draw(&mut ctx).unwrap();

        let commands = ctx.commands();
        assert!(matches!(commands.first(), Some(Command::Clear { .. })));
        assert_eq!(commands.last(), Some(&Command::Present));

        // Every write is consumed by a draw before the next write.
        let mut pending_write = false;
        for command in commands {
            match command {
                Command::WriteDiscard { .. } => {
                    assert!(!pending_write, "two writes without a draw between");
                    pending_write = true;
                }
                Command::DrawIndexed { .. } => {
                    assert!(pending_write, "draw without a fresh write");
                    pending_write = false;
                }
                _ => {}
            }
        }

        let xs: Vec<f32> = ctx
            .object_writes()
            .iter()
            .map(|w| w.world().w_axis.x)
            .collect();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        assert_eq!(ctx.frames_presented(), 1);
    }

    #[test]
    fn draw_feeds_active_camera_matrices() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        scene.add_entity(GameEntity::new(mesh));
        scene.add_camera(camera(true));
        let mut second = Camera::new(Vec3::new(3.0, 1.0, 0.0), 1.0, CameraSettings::default());
        second.set_active(true);
        let second_view = second.view();
        scene.add_camera(second);

        scene.draw(&mut ctx).unwrap();

        assert_eq!(ctx.object_writes()[0].view(), second_view);
    }

    #[test]
    fn overlay_runs_before_present() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        scene.add_camera(camera(true));
        ctx.take_commands();

        scene
            .draw_with_overlay(&mut ctx, |ctx| {
                ctx.draw_indexed(6, 0, 0);
                Ok(())
            })
            .unwrap();

        let commands = ctx.commands();
        let n = commands.len();
        assert!(matches!(commands[n - 2], Command::DrawIndexed { index_count: 6, .. }));
        assert_eq!(commands[n - 1], Command::Present);
    }

    #[test]
    fn triangle_scenario() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        scene.add_entity(GameEntity::new(mesh));
        let mut cam = Camera::new(Vec3::ZERO, 1.0, CameraSettings::default());
        cam.set_active(true);
        scene.add_camera(cam);
        ctx.take_commands();

        scene.draw(&mut ctx).unwrap();

        let writes = ctx.object_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].color_tint(), Vec4::new(1.0, 0.5, 0.5, 1.0));
        assert_eq!(writes[0].world(), Mat4::IDENTITY);
        assert!(writes[0].view().abs_diff_eq(Mat4::IDENTITY, 1e-5));

        let draws: Vec<&Command> = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::DrawIndexed { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![&Command::DrawIndexed {
                index_count: 3,
                start_index: 0,
                base_vertex: 0,
            }]
        );
    }

    #[test]
    fn resize_updates_every_projection_only() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        scene.add_camera(camera(true));
        scene.add_camera(camera(false));
        let before: Vec<(Mat4, Mat4)> = scene
            .cameras()
            .iter()
            .map(|c| (c.view(), c.projection()))
            .collect();

        scene.resize(800, 600);

        for (camera, (view, projection)) in scene.cameras().iter().zip(before) {
            assert_eq!(camera.aspect_ratio(), 4.0 / 3.0);
            assert_ne!(camera.projection(), projection);
            assert_eq!(camera.view(), view);
        }
    }

    #[test]
    fn resize_to_zero_height_stays_finite() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        scene.add_camera(camera(true));
        scene.resize(640, 0);
        assert!(!scene.cameras()[0].projection().is_nan());
    }

    #[test]
    fn update_moves_only_active_camera() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        scene.add_camera(camera(false));
        scene.add_camera(camera(true));
        let mut input = InputState::new();
        input.press(Key::W);
        input.set_look_held(true);
        input.add_pointer_delta(Vec2::new(10.0, 0.0));

        scene.update(&frame(&input, 1.0, 1.0));

        assert_eq!(
            scene.cameras()[0].transform().position(),
            Vec3::new(0.0, 0.0, -5.0)
        );
        assert_ne!(
            scene.cameras()[1].transform().position(),
            Vec3::new(0.0, 0.0, -5.0)
        );
        assert!(scene.cameras()[1].transform().rotation().y > 0.0);
    }

    #[test]
    fn update_runs_scripted_motion() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        let spinning = scene.add_entity(GameEntity::new(Rc::clone(&mesh)));
        let still = scene.add_entity(GameEntity::new(mesh));
        scene
            .set_motion(
                spinning,
                Motion::Spin {
                    rate: Vec3::new(0.0, 0.0, 1.0),
                },
            )
            .unwrap();
        let input = InputState::new();

        scene.update(&frame(&input, 0.5, 0.5));
        scene.update(&frame(&input, 0.5, 1.0));

        assert!((scene.entities()[spinning].transform().rotation().z - 1.0).abs() < 1e-6);
        assert_eq!(scene.entities()[still].transform().rotation(), Vec3::ZERO);
    }

    #[test]
    fn set_motion_replaces_and_validates() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        let e = scene.add_entity(GameEntity::new(mesh));

        let pulse = Motion::Pulse {
            amplitude: 0.1,
            frequency: 2.0,
        };
        scene.set_motion(e, Motion::Spin { rate: Vec3::ONE }).unwrap();
        scene.set_motion(e, pulse).unwrap();
        assert_eq!(scene.motion(e), Some(pulse));

        scene.clear_motion(e);
        assert_eq!(scene.motion(e), None);

        assert!(matches!(
            scene.set_motion(9, pulse),
            Err(SceneError::EntityOutOfRange(9))
        ));
    }

    #[test]
    fn meshes_are_shared_not_copied() {
        let mut ctx = RecordingContext::new();
        let mut scene = Scene::new(&mut ctx).unwrap();
        let mesh = scene.add_mesh(triangle(&mut ctx));
        scene.add_entity(GameEntity::new(Rc::clone(&mesh)));
        scene.add_entity(GameEntity::new(Rc::clone(&mesh)));

        assert_eq!(scene.meshes().len(), 1);
        assert!(Rc::ptr_eq(scene.entities()[0].mesh(), scene.entities()[1].mesh()));
        assert!(Rc::ptr_eq(&scene.meshes()[0], &mesh));
    }
}
