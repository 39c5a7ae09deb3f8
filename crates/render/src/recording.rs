use crate::constants::ObjectConstants;
use crate::context::{BufferDesc, BufferId, RenderContext, discard_image};
use crate::error::RenderError;
use glam::Vec4;
use std::fmt::Write as _;

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer { id: BufferId, desc: BufferDesc },
    DestroyBuffer { buffer: BufferId },
    WriteDiscard { buffer: BufferId, bytes: Vec<u8> },
    BindVertexBuffer { buffer: BufferId, stride: u32 },
    BindIndexBuffer { buffer: BufferId },
    BindConstantBuffer { slot: u32, buffer: BufferId },
    DrawIndexed {
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    },
    Clear { color: [f32; 4] },
    Present,
}

#[derive(Debug)]
struct RecordedBuffer {
    desc: BufferDesc,
    contents: Vec<u8>,
}

/// A rendering context that keeps buffers in CPU memory and logs every call.
///
/// Applies the same validation as a GPU context, so it doubles as the test
/// backend and as the headless backend for the CLI.
#[derive(Debug, Default)]
pub struct RecordingContext {
    /// Indexed by `BufferId`; destroyed buffers leave a `None` slot.
    buffers: Vec<Option<RecordedBuffer>>,
    commands: Vec<Command>,
    frames_presented: u64,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the command log.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drain and return the command log.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.iter().flatten().count()
    }

    pub fn buffer_desc(&self, id: BufferId) -> Option<&BufferDesc> {
        self.live(id).map(|b| &b.desc)
    }

    /// Current contents of a buffer, padded to its full size.
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.live(id).map(|b| b.contents.as_slice())
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of `DrawIndexed` commands in the log.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::DrawIndexed { .. }))
            .count()
    }

    /// Every per-object record written through `write_discard`, in order.
    pub fn object_writes(&self) -> Vec<ObjectConstants> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::WriteDiscard { bytes, .. }
                    if bytes.len() == std::mem::size_of::<ObjectConstants>() =>
                {
                    Some(bytemuck::pod_read_unaligned(bytes))
                }
                _ => None,
            })
            .collect()
    }

    /// Human-readable dump of the command log.
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Render log (buffers={}, commands={}, frames={}) ===",
            self.buffer_count(),
            self.commands.len(),
            self.frames_presented
        );
        for command in &self.commands {
            let _ = match command {
                Command::CreateBuffer { id, desc } => writeln!(
                    out,
                    "  create  #{} '{}' {:?}/{:?} {}B",
                    id.0, desc.label, desc.kind, desc.usage, desc.size
                ),
                Command::DestroyBuffer { buffer } => writeln!(out, "  destroy #{}", buffer.0),
                Command::WriteDiscard { buffer, bytes } => {
                    writeln!(out, "  write   #{} {}B", buffer.0, bytes.len())
                }
                Command::BindVertexBuffer { buffer, stride } => {
                    writeln!(out, "  bind vb #{} stride={stride}", buffer.0)
                }
                Command::BindIndexBuffer { buffer } => writeln!(out, "  bind ib #{}", buffer.0),
                Command::BindConstantBuffer { slot, buffer } => {
                    writeln!(out, "  bind cb #{} slot={slot}", buffer.0)
                }
                Command::DrawIndexed {
                    index_count,
                    start_index,
                    base_vertex,
                } => writeln!(
                    out,
                    "  draw    count={index_count} start={start_index} base={base_vertex}"
                ),
                Command::Clear { color } => writeln!(
                    out,
                    "  clear   ({:.2}, {:.2}, {:.2}, {:.2})",
                    color[0], color[1], color[2], color[3]
                ),
                Command::Present => writeln!(out, "  present"),
            };
        }
        out
    }

    fn live(&self, id: BufferId) -> Option<&RecordedBuffer> {
        self.buffers.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn buffer_mut(&mut self, id: BufferId) -> Result<&mut RecordedBuffer, RenderError> {
        self.buffers
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(RenderError::UnknownBuffer(id))
    }
}

impl RenderContext for RecordingContext {
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        contents: Option<&[u8]>,
    ) -> Result<BufferId, RenderError> {
        desc.validate(contents)?;
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(Some(RecordedBuffer {
            desc: desc.clone(),
            contents: discard_image(contents.unwrap_or_default(), desc.size),
        }));
        self.commands.push(Command::CreateBuffer {
            id,
            desc: desc.clone(),
        });
        Ok(id)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        let released = self
            .buffers
            .get_mut(buffer.0 as usize)
            .and_then(Option::take);
        if released.is_some() {
            self.commands.push(Command::DestroyBuffer { buffer });
        }
    }

    fn write_discard(&mut self, buffer: BufferId, bytes: &[u8]) -> Result<(), RenderError> {
        let target = self.buffer_mut(buffer)?;
        target.desc.validate_write(buffer, bytes.len())?;
        target.contents = discard_image(bytes, target.desc.size);
        self.commands.push(Command::WriteDiscard {
            buffer,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32) {
        self.commands
            .push(Command::BindVertexBuffer { buffer, stride });
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.commands.push(Command::BindIndexBuffer { buffer });
    }

    fn bind_constant_buffer(&mut self, slot: u32, buffer: BufferId) -> Result<(), RenderError> {
        self.buffer_mut(buffer)?;
        self.commands
            .push(Command::BindConstantBuffer { slot, buffer });
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.commands.push(Command::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        });
    }

    fn clear(&mut self, color: Vec4) -> Result<(), RenderError> {
        self.commands.push(Command::Clear {
            color: color.to_array(),
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.frames_presented += 1;
        self.commands.push(Command::Present);
        Ok(())
    }
}
