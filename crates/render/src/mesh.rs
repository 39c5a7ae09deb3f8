use crate::context::{BufferDesc, BufferId, BufferKind, RenderContext};
use crate::error::RenderError;
use sceneview_common::Vertex;

/// Write-once geometry: an immutable vertex buffer and an immutable 32-bit
/// index buffer, drawn as a triangle list.
///
/// A mesh knows nothing about who draws it. Share one between entities with
/// `Rc<Mesh>`; there is no operation that changes its buffers after
/// construction.
#[derive(Debug)]
pub struct Mesh {
    name: Option<String>,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    /// Upload geometry. Fails without leaving any buffer behind if the
    /// geometry is malformed or the context rejects either buffer.
    pub fn new<C: RenderContext + ?Sized>(
        ctx: &mut C,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, RenderError> {
        Self::build(ctx, None, vertices, indices)
    }

    /// Like [`Mesh::new`], with a display name that also labels the buffers.
    pub fn with_name<C: RenderContext + ?Sized>(
        ctx: &mut C,
        name: impl Into<String>,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, RenderError> {
        Self::build(ctx, Some(name.into()), vertices, indices)
    }

    fn build<C: RenderContext + ?Sized>(
        ctx: &mut C,
        name: Option<String>,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, RenderError> {
        validate_geometry(vertices, indices)?;

        let label = name.as_deref().unwrap_or("mesh");
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let vertex_buffer = ctx.create_buffer(
            &BufferDesc::immutable(
                format!("{label} vertices"),
                BufferKind::Vertex,
                vertex_bytes.len() as u64,
            ),
            Some(vertex_bytes),
        )?;
        let index_buffer = match ctx.create_buffer(
            &BufferDesc::immutable(
                format!("{label} indices"),
                BufferKind::Index,
                index_bytes.len() as u64,
            ),
            Some(index_bytes),
        ) {
            Ok(id) => id,
            Err(e) => {
                ctx.destroy_buffer(vertex_buffer);
                return Err(e);
            }
        };

        tracing::debug!(
            mesh = label,
            vertices = vertices.len(),
            indices = indices.len(),
            "mesh created"
        );

        Ok(Self {
            name,
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }

    /// Bind both buffers and draw every index, starting at index 0.
    pub fn draw<C: RenderContext + ?Sized>(&self, ctx: &mut C) {
        ctx.bind_vertex_buffer(self.vertex_buffer, Vertex::STRIDE);
        ctx.bind_index_buffer(self.index_buffer);
        ctx.draw_indexed(self.index_count, 0, 0);
    }
}

/// Reject geometry a triangle-list draw could not consume safely.
pub fn validate_geometry(vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError> {
    if vertices.is_empty() {
        return Err(RenderError::EmptyGeometry("vertices"));
    }
    if indices.is_empty() {
        return Err(RenderError::EmptyGeometry("indices"));
    }
    for len in [vertices.len(), indices.len()] {
        if u32::try_from(len).is_err() {
            return Err(RenderError::GeometryTooLarge(len));
        }
    }
    if indices.len() % 3 != 0 {
        return Err(RenderError::IncompleteTriangle(indices.len()));
    }
    if let Some((position, &value)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertices.len())
    {
        return Err(RenderError::IndexOutOfRange {
            position,
            value,
            vertex_count: vertices.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingContext};
    use glam::{Vec3, Vec4};
    use sceneview_common::colors;

    /// Recording context that rejects buffer creation after `allow` successes.
    struct ExhaustedContext {
        inner: RecordingContext,
        allow: usize,
    }

    impl RenderContext for ExhaustedContext {
        fn create_buffer(
            &mut self,
            desc: &BufferDesc,
            contents: Option<&[u8]>,
        ) -> Result<BufferId, RenderError> {
            if self.allow == 0 {
                return Err(RenderError::Surface("out of memory".into()));
            }
            self.allow -= 1;
            self.inner.create_buffer(desc, contents)
        }

        fn destroy_buffer(&mut self, buffer: BufferId) {
            self.inner.destroy_buffer(buffer);
        }

        fn write_discard(&mut self, buffer: BufferId, bytes: &[u8]) -> Result<(), RenderError> {
            self.inner.write_discard(buffer, bytes)
        }

        fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32) {
            self.inner.bind_vertex_buffer(buffer, stride);
        }

        fn bind_index_buffer(&mut self, buffer: BufferId) {
            self.inner.bind_index_buffer(buffer);
        }

        fn bind_constant_buffer(&mut self, slot: u32, buffer: BufferId) -> Result<(), RenderError> {
            self.inner.bind_constant_buffer(slot, buffer)
        }

        fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
            self.inner.draw_indexed(index_count, start_index, base_vertex);
        }

        fn clear(&mut self, color: Vec4) -> Result<(), RenderError> {
            self.inner.clear(color)
        }

        fn present(&mut self) -> Result<(), RenderError> {
            self.inner.present()
        }
    }

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::new(Vec3::new(0.0, 0.5, 0.0), colors::RED),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), colors::BLUE),
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), colors::GREEN),
        ]
    }

    #[test]
    fn creates_two_immutable_buffers() {
        let mut ctx = RecordingContext::new();
        let mesh = Mesh::with_name(&mut ctx, "triangle", &triangle(), &[0, 1, 2]).unwrap();

        assert_eq!(mesh.name(), Some("triangle"));
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(ctx.buffer_count(), 2);

        let vb = ctx.buffer_desc(mesh.vertex_buffer()).unwrap();
        assert_eq!(vb.kind, BufferKind::Vertex);
        assert_eq!(vb.size, 3 * 28);
        assert_eq!(vb.label, "triangle vertices");

        let ib = ctx.buffer_contents(mesh.index_buffer()).unwrap();
        let indices: Vec<u32> = ib
            .chunks_exact(4)
            .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn unnamed_mesh() {
        let mut ctx = RecordingContext::new();
        let mesh = Mesh::new(&mut ctx, &triangle(), &[0, 1, 2]).unwrap();
        assert_eq!(mesh.name(), None);
    }

    #[test]
    fn draw_binds_then_draws_all_indices() {
        let mut ctx = RecordingContext::new();
        let vertices = [triangle(), triangle()].concat();
        let mesh = Mesh::new(&mut ctx, &vertices, &[0, 1, 2, 3, 4, 5]).unwrap();
        ctx.take_commands();

        mesh.draw(&mut ctx);

        assert_eq!(
            ctx.commands(),
            &[
                Command::BindVertexBuffer {
                    buffer: mesh.vertex_buffer(),
                    stride: 28,
                },
                Command::BindIndexBuffer {
                    buffer: mesh.index_buffer(),
                },
                Command::DrawIndexed {
                    index_count: 6,
                    start_index: 0,
                    base_vertex: 0,
                },
            ]
        );
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let mut ctx = RecordingContext::new();
        assert_eq!(
            Mesh::new(&mut ctx, &[], &[0, 1, 2]).unwrap_err(),
            RenderError::EmptyGeometry("vertices")
        );
        assert_eq!(
            Mesh::new(&mut ctx, &triangle(), &[]).unwrap_err(),
            RenderError::EmptyGeometry("indices")
        );
        assert_eq!(ctx.buffer_count(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut ctx = RecordingContext::new();
        let err = Mesh::new(&mut ctx, &triangle(), &[0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            RenderError::IndexOutOfRange {
                position: 2,
                value: 3,
                vertex_count: 3,
            }
        );
        assert_eq!(ctx.buffer_count(), 0);
    }

    #[test]
    fn failed_index_buffer_releases_vertex_buffer() {
        let mut ctx = ExhaustedContext {
            inner: RecordingContext::new(),
            allow: 1,
        };
        let err = Mesh::new(&mut ctx, &triangle(), &[0, 1, 2]).unwrap_err();

        assert_eq!(err, RenderError::Surface("out of memory".into()));
        assert_eq!(ctx.inner.buffer_count(), 0);
        assert!(matches!(
            ctx.inner.commands().last(),
            Some(Command::DestroyBuffer { buffer: BufferId(0) })
        ));
    }

    #[test]
    fn failed_vertex_buffer_creates_nothing() {
        let mut ctx = ExhaustedContext {
            inner: RecordingContext::new(),
            allow: 0,
        };
        assert!(Mesh::new(&mut ctx, &triangle(), &[0, 1, 2]).is_err());
        assert_eq!(ctx.inner.buffer_count(), 0);
        assert!(ctx.inner.commands().is_empty());
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut ctx = RecordingContext::new();
        let err = Mesh::new(&mut ctx, &triangle(), &[0, 1, 2, 0]).unwrap_err();
        assert_eq!(err, RenderError::IncompleteTriangle(4));
    }
}
