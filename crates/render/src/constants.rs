use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-object record read positionally by the vertex stage.
///
/// Field order is part of the shader contract: tint, world, view, projection.
/// Matrices are stored as glam column arrays, which is the row-major layout
/// of the equivalent row-vector matrix. The size is a multiple of 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub color_tint: [f32; 4],
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl ObjectConstants {
    /// Size of the GPU buffer holding one record, rounded up to 16 bytes.
    pub const BUFFER_SIZE: u64 = (std::mem::size_of::<Self>() as u64).div_ceil(16) * 16;

    pub fn new(color_tint: Vec4, world: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            color_tint: color_tint.to_array(),
            world: world.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }

    pub fn color_tint(&self) -> Vec4 {
        Vec4::from_array(self.color_tint)
    }

    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }
}
