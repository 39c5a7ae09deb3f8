use glam::{Vec3, Vec4};
use sceneview_render::Projection;
use sceneview_scene::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a [`Scene`] for the debug overlay and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        SceneSummary {
            mesh_count: scene.meshes().len(),
            entity_count: scene.entities().len(),
            camera_count: scene.cameras().len(),
            active_camera: scene.active_camera_index(),
            triangle_count: scene
                .entities()
                .iter()
                .map(|e| e.mesh().index_count() as usize / 3)
                .sum(),
        }
    }

    pub fn inspect_entity(scene: &Scene, index: usize) -> Option<EntityInfo> {
        scene.entities().get(index).map(|entity| {
            let t = entity.transform();
            EntityInfo {
                index,
                mesh: entity.mesh().name().map(str::to_owned),
                position: t.position(),
                rotation: t.rotation(),
                scale: t.scale(),
                color_tint: entity.color_tint(),
                animated: scene.motion(index).is_some(),
            }
        })
    }

    pub fn inspect_camera(scene: &Scene, index: usize) -> Option<CameraInfo> {
        scene.cameras().get(index).map(|camera| CameraInfo {
            index,
            position: camera.transform().position(),
            pitch: camera.transform().rotation().x,
            yaw: camera.transform().rotation().y,
            projection: camera.projection_mode(),
            aspect_ratio: camera.aspect_ratio(),
            active: camera.is_active(),
        })
    }

    pub fn list_entities(scene: &Scene) -> Vec<EntityInfo> {
        (0..scene.entities().len())
            .filter_map(|i| Self::inspect_entity(scene, i))
            .collect()
    }
}

/// Counts and active-camera resolution for one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub mesh_count: usize,
    pub entity_count: usize,
    pub camera_count: usize,
    pub active_camera: Option<usize>,
    pub triangle_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: meshes={} entities={} cameras={} active_camera={} triangles={}",
            self.mesh_count,
            self.entity_count,
            self.camera_count,
            self.active_camera
                .map_or_else(|| "none".to_string(), |i| i.to_string()),
            self.triangle_count,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub index: usize,
    pub mesh: Option<String>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color_tint: Vec4,
    pub animated: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.index,
            self.mesh.as_deref().unwrap_or("<unnamed>"),
            self.position.x,
            self.position.y,
            self.position.z,
            self.scale.x,
            self.scale.y,
            self.scale.z,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub index: usize,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub projection: Projection,
    pub aspect_ratio: f32,
    pub active: bool,
}

impl std::fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera [{}] {:?}{} pos=({:.2}, {:.2}, {:.2}) pitch={:.3} yaw={:.3} aspect={:.3}",
            self.index,
            self.projection,
            if self.active { " (active)" } else { "" },
            self.position.x,
            self.position.y,
            self.position.z,
            self.pitch,
            self.yaw,
            self.aspect_ratio,
        )
    }
}
