use crate::pipeline::{ScenePipeline, create_depth_texture};
use glam::Vec4;
use sceneview_common::Vertex;
use sceneview_render::{
    BufferDesc, BufferId, BufferKind, BufferUsage, RenderContext, RenderError, discard_image,
};
use wgpu::util::DeviceExt;

/// The only constant slot the scene pipeline exposes.
const CONSTANT_SLOT: u32 = 0;

struct GpuBuffer {
    desc: BufferDesc,
    buffer: wgpu::Buffer,
    /// Allocated size, `desc.size` padded to the copy alignment.
    padded_size: u64,
}

struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// `size` rounded up to a whole number of copy units.
pub fn padded_size(size: u64) -> u64 {
    wgpu::util::align_to(size, wgpu::COPY_BUFFER_ALIGNMENT)
}

pub fn to_wgpu_color(color: Vec4) -> wgpu::Color {
    wgpu::Color {
        r: color.x as f64,
        g: color.y as f64,
        b: color.z as f64,
        a: color.w as f64,
    }
}

/// First binding a draw would need but does not have, if any.
pub fn missing_binding(
    frame: bool,
    constants: bool,
    vertices: bool,
    indices: bool,
) -> Option<&'static str> {
    [
        (frame, "frame"),
        (constants, "constant buffer"),
        (vertices, "vertex buffer"),
        (indices, "index buffer"),
    ]
    .into_iter()
    .find_map(|(bound, name)| (!bound).then_some(name))
}

/// Usage flags for a buffer of the given kind.
pub fn buffer_usages(desc: &BufferDesc) -> wgpu::BufferUsages {
    let binding = match desc.kind {
        BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
        BufferKind::Index => wgpu::BufferUsages::INDEX,
        BufferKind::Constant => wgpu::BufferUsages::UNIFORM,
    };
    match desc.usage {
        BufferUsage::Immutable => binding,
        BufferUsage::Dynamic => binding | wgpu::BufferUsages::COPY_DST,
    }
}

/// A [`RenderContext`] backed by a wgpu device and window surface.
///
/// Every `draw_indexed` records its own render pass and submits it at once.
/// Queue writes land before the next submission, so the constant buffer
/// write for one entity is never folded into the draw of another.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: ScenePipeline,
    depth: wgpu::TextureView,
    /// Indexed by `BufferId`; destroyed buffers leave a `None` slot.
    buffers: Vec<Option<GpuBuffer>>,
    constants: Option<wgpu::BindGroup>,
    vertex_buffer: Option<(BufferId, u32)>,
    index_buffer: Option<BufferId>,
    frame: Option<Frame>,
}

impl WgpuContext {
    /// Configure `surface` and build the scene pipeline for its format.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        surface.configure(&device, &config);
        let pipeline = ScenePipeline::new(&device, config.format);
        let depth = create_depth_texture(&device, config.width, config.height);
        tracing::info!(
            format = ?config.format,
            width = config.width,
            height = config.height,
            "wgpu context ready"
        );

        Self {
            device,
            queue,
            surface,
            config,
            pipeline,
            depth,
            buffers: Vec::new(),
            constants: None,
            vertex_buffer: None,
            index_buffer: None,
            frame: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// View of the frame currently being drawn, between `clear` and
    /// `present`.
    pub fn frame_view(&self) -> Option<&wgpu::TextureView> {
        self.frame.as_ref().map(|f| &f.view)
    }

    /// Reconfigure the surface and depth target. Zero sizes are clamped.
    ///
    /// A frame still held from an unfinished draw is discarded first.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.frame.take().is_some() {
            tracing::debug!("discarding unpresented frame before resize");
        }
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth = create_depth_texture(&self.device, self.config.width, self.config.height);
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            "surface reconfigured"
        );
    }

    fn buffer(&self, id: BufferId) -> Result<&GpuBuffer, RenderError> {
        self.buffers
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(RenderError::UnknownBuffer(id))
    }

    fn acquire_frame(&mut self) -> Result<(), RenderError> {
        if self.frame.is_some() {
            return Ok(());
        }
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::warn!("surface lost, reconfiguring: {e}");
                self.surface.configure(&self.device, &self.config);
                return Err(RenderError::Surface(e.to_string()));
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(Frame { texture, view });
        Ok(())
    }
}

impl RenderContext for WgpuContext {
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        contents: Option<&[u8]>,
    ) -> Result<BufferId, RenderError> {
        desc.validate(contents)?;
        let padded_size = padded_size(desc.size);
        let buffer = match (desc.usage, contents) {
            (BufferUsage::Immutable, Some(data)) => {
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(desc.label.as_str()),
                        contents: data,
                        usage: buffer_usages(desc),
                    })
            }
            (_, data) => {
                let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(desc.label.as_str()),
                    size: padded_size,
                    usage: buffer_usages(desc),
                    mapped_at_creation: false,
                });
                if let Some(data) = data {
                    self.queue
                        .write_buffer(&buffer, 0, &discard_image(data, padded_size));
                }
                buffer
            }
        };

        let id = BufferId(self.buffers.len() as u32);
        tracing::debug!(id = id.0, label = %desc.label, size = desc.size, "gpu buffer created");
        self.buffers.push(Some(GpuBuffer {
            desc: desc.clone(),
            buffer,
            padded_size,
        }));
        Ok(id)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        let Some(released) = self
            .buffers
            .get_mut(buffer.0 as usize)
            .and_then(Option::take)
        else {
            return;
        };
        released.buffer.destroy();
        if self.vertex_buffer.is_some_and(|(id, _)| id == buffer) {
            self.vertex_buffer = None;
        }
        if self.index_buffer == Some(buffer) {
            self.index_buffer = None;
        }
        tracing::debug!(id = buffer.0, label = %released.desc.label, "gpu buffer destroyed");
    }

    fn write_discard(&mut self, buffer: BufferId, bytes: &[u8]) -> Result<(), RenderError> {
        let target = self.buffer(buffer)?;
        target.desc.validate_write(buffer, bytes.len())?;
        self.queue.write_buffer(
            &target.buffer,
            0,
            &discard_image(bytes, target.padded_size),
        );
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32) {
        if stride != Vertex::STRIDE {
            tracing::warn!(stride, expected = Vertex::STRIDE, "unexpected vertex stride");
        }
        self.vertex_buffer = Some((buffer, stride));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.index_buffer = Some(buffer);
    }

    fn bind_constant_buffer(&mut self, slot: u32, buffer: BufferId) -> Result<(), RenderError> {
        if slot != CONSTANT_SLOT {
            return Err(RenderError::UnsupportedSlot(slot));
        }
        let target = self.buffer(buffer)?;
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_constants"),
            layout: &self.pipeline.constants_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: target.buffer.as_entire_binding(),
            }],
        });
        self.constants = Some(bind_group);
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        let missing = missing_binding(
            self.frame.is_some(),
            self.constants.is_some(),
            self.vertex_buffer.is_some(),
            self.index_buffer.is_some(),
        );
        debug_assert!(
            missing.is_none(),
            "draw_indexed without a {}",
            missing.unwrap_or_default()
        );
        let (Some(frame), Some(constants), Some((vb, _)), Some(ib)) = (
            &self.frame,
            &self.constants,
            self.vertex_buffer,
            self.index_buffer,
        ) else {
            tracing::warn!("draw skipped: no frame or missing bindings");
            return;
        };
        let (Some(vertices), Some(indices)) =
            (self.buffer(vb).ok(), self.buffer(ib).ok())
        else {
            tracing::warn!(vertex = vb.0, index = ib.0, "draw skipped: unknown buffer");
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("draw_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("draw_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, constants, &[]);
            pass.set_vertex_buffer(0, vertices.buffer.slice(..));
            pass.set_index_buffer(indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(start_index..start_index + index_count, base_vertex, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn clear(&mut self, color: Vec4) -> Result<(), RenderError> {
        self.acquire_frame()?;
        let Some(frame) = &self.frame else {
            return Err(RenderError::Surface("no frame acquired".into()));
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(to_wgpu_color(color)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| RenderError::Surface("present without a cleared frame".into()))?;
        frame.texture.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pad_to_copy_alignment() {
        assert_eq!(padded_size(208), 208);
        assert_eq!(padded_size(6), 8);
        assert_eq!(padded_size(84), 84);
    }

    #[test]
    fn dynamic_buffers_are_copy_targets() {
        let cb = BufferDesc::dynamic_constant("cb", 208);
        assert_eq!(
            buffer_usages(&cb),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST
        );
        let ib = BufferDesc::immutable("ib", BufferKind::Index, 12);
        assert_eq!(buffer_usages(&ib), wgpu::BufferUsages::INDEX);
    }

    #[test]
    fn missing_binding_names_the_first_gap() {
        assert_eq!(missing_binding(true, true, true, true), None);
        assert_eq!(missing_binding(false, true, true, true), Some("frame"));
        assert_eq!(
            missing_binding(true, true, false, false),
            Some("vertex buffer")
        );
        assert_eq!(
            missing_binding(true, true, true, false),
            Some("index buffer")
        );
    }

    #[test]
    fn clear_color_converts_componentwise() {
        let c = to_wgpu_color(Vec4::new(0.5, 0.25, 1.0, 0.0));
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 1.0, 0.0));
    }
}
