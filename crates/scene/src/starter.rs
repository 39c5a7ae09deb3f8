use crate::config::ViewerConfig;
use crate::error::SceneError;
use crate::motion::Motion;
use crate::scene::Scene;
use glam::{Vec3, Vec4};
use sceneview_common::{Vertex, colors};
use sceneview_render::{Camera, GameEntity, Mesh, RenderContext};
use std::rc::Rc;

fn v(x: f32, y: f32, color: Vec4) -> Vertex {
    Vertex::new(Vec3::new(x, y, 0.0), color)
}

pub fn triangle_vertices() -> [Vertex; 3] {
    [
        v(0.0, 0.5, colors::RED),
        v(0.5, -0.5, colors::BLUE),
        v(-0.5, -0.5, colors::GREEN),
    ]
}

pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

pub fn rectangle_vertices() -> [Vertex; 4] {
    [
        v(-0.7, 0.7, colors::RED),
        v(-0.3, 0.7, colors::BLUE),
        v(-0.3, 0.3, colors::BLUE),
        v(-0.7, 0.3, colors::RED),
    ]
}

pub const RECTANGLE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub fn polygon_vertices() -> [Vertex; 6] {
    [
        v(0.3, 0.5, colors::WHITE),
        v(0.4, 0.7, colors::BLACK),
        v(0.6, 0.6, colors::BLACK),
        v(0.5, 0.5, colors::WHITE),
        v(0.6, 0.4, colors::BLACK),
        v(0.4, 0.3, colors::BLACK),
    ]
}

pub const POLYGON_INDICES: [u32; 12] = [0, 1, 2, 2, 3, 0, 3, 4, 5, 5, 0, 3];

/// Build the demo scene: three meshes, five entities sharing them, an active
/// perspective camera and an inactive orthographic one.
pub fn build_starter_scene<C: RenderContext + ?Sized>(
    ctx: &mut C,
    config: &ViewerConfig,
) -> Result<Scene, SceneError> {
    let mut scene = Scene::new(ctx)?;
    scene.set_clear_color(config.clear_color);

    let triangle = scene.add_mesh(Mesh::with_name(
        ctx,
        "triangle",
        &triangle_vertices(),
        &TRIANGLE_INDICES,
    )?);
    let rectangle = scene.add_mesh(Mesh::with_name(
        ctx,
        "rectangle",
        &rectangle_vertices(),
        &RECTANGLE_INDICES,
    )?);
    let polygon = scene.add_mesh(Mesh::with_name(
        ctx,
        "polygon",
        &polygon_vertices(),
        &POLYGON_INDICES,
    )?);

    let placements: [(&Rc<Mesh>, Vec3, Option<Vec4>, Option<Motion>); 5] = [
        (
            &triangle,
            Vec3::ZERO,
            None,
            Some(Motion::Spin {
                rate: Vec3::new(0.0, 0.0, 1.0),
            }),
        ),
        (
            &triangle,
            Vec3::new(1.5, 0.0, 1.0),
            Some(Vec4::new(0.5, 1.0, 0.5, 1.0)),
            Some(Motion::Oscillate {
                axis: Vec3::Y,
                amplitude: 0.5,
                frequency: 2.0,
            }),
        ),
        (
            &rectangle,
            Vec3::new(-1.0, -0.5, 0.0),
            Some(Vec4::ONE),
            Some(Motion::Pulse {
                amplitude: 0.25,
                frequency: 3.0,
            }),
        ),
        (
            &polygon,
            Vec3::new(-0.5, -1.0, 0.5),
            Some(Vec4::new(0.5, 0.5, 1.0, 1.0)),
            Some(Motion::Spin {
                rate: Vec3::new(0.0, 1.0, 0.0),
            }),
        ),
        (&rectangle, Vec3::new(1.0, 1.0, 2.0), None, None),
    ];

    for (mesh, position, tint, motion) in placements {
        let mut entity = GameEntity::new(Rc::clone(mesh));
        entity.transform_mut().set_position(position);
        if let Some(tint) = tint {
            entity.set_color_tint(tint);
        }
        let index = scene.add_entity(entity);
        if let Some(motion) = motion {
            scene.set_motion(index, motion)?;
        }
    }

    let aspect_ratio = config.aspect_ratio();
    let mut perspective = Camera::new(config.camera_position, aspect_ratio, config.perspective);
    perspective.set_active(true);
    scene.add_camera(perspective);
    scene.add_camera(Camera::new(
        config.camera_position,
        aspect_ratio,
        config.orthographic,
    ));

    tracing::info!(
        meshes = scene.meshes().len(),
        entities = scene.entities().len(),
        cameras = scene.cameras().len(),
        "starter scene built"
    );
    Ok(scene)
}
