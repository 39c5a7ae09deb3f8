use crate::error::RenderError;
use glam::Vec4;

/// Opaque handle to a buffer owned by a [`RenderContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
    Constant,
}

/// How a buffer may be updated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Contents are supplied at creation and never change.
    Immutable,
    /// CPU-writable with write-discard semantics.
    Dynamic,
}

/// Buffer creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDesc {
    pub label: String,
    pub kind: BufferKind,
    pub usage: BufferUsage,
    pub size: u64,
}

impl BufferDesc {
    pub fn immutable(label: impl Into<String>, kind: BufferKind, size: u64) -> Self {
        Self {
            label: label.into(),
            kind,
            usage: BufferUsage::Immutable,
            size,
        }
    }

    pub fn dynamic_constant(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: label.into(),
            kind: BufferKind::Constant,
            usage: BufferUsage::Dynamic,
            size,
        }
    }

    /// Check a creation request. Every context runs this before allocating.
    pub fn validate(&self, contents: Option<&[u8]>) -> Result<(), RenderError> {
        if self.size == 0 {
            return Err(RenderError::ZeroSizedBuffer(self.label.clone()));
        }
        match (self.usage, contents) {
            (BufferUsage::Immutable, Some(data)) if data.len() as u64 == self.size => Ok(()),
            (BufferUsage::Immutable, data) => Err(RenderError::InitialDataMismatch {
                label: self.label.clone(),
                expected: self.size,
                actual: data.map_or(0, <[u8]>::len),
            }),
            (BufferUsage::Dynamic, Some(data)) if data.len() as u64 > self.size => {
                Err(RenderError::WriteTooLarge {
                    len: data.len(),
                    size: self.size,
                })
            }
            (BufferUsage::Dynamic, _) => Ok(()),
        }
    }

    /// Check a write-discard request against this buffer.
    pub fn validate_write(&self, id: BufferId, len: usize) -> Result<(), RenderError> {
        if self.usage == BufferUsage::Immutable {
            return Err(RenderError::ImmutableBuffer(id));
        }
        if len as u64 > self.size {
            return Err(RenderError::WriteTooLarge {
                len,
                size: self.size,
            });
        }
        Ok(())
    }
}

/// `bytes` zero-extended to `size`, the full image a write-discard leaves
/// behind.
pub fn discard_image(bytes: &[u8], size: u64) -> Vec<u8> {
    let mut image = bytes.to_vec();
    image.resize(size as usize, 0);
    image
}

/// The rendering context the scene core draws through.
///
/// Implementations own the actual GPU objects; the core only ever holds
/// [`BufferId`]s. Commands take effect in call order, so a write-discard
/// followed by a draw is consumed by that draw before any later write lands.
pub trait RenderContext {
    /// Create a buffer. Immutable buffers must be given contents of exactly
    /// `desc.size` bytes.
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        contents: Option<&[u8]>,
    ) -> Result<BufferId, RenderError>;

    /// Release a buffer. Its id is not handed out again. Unknown ids are
    /// ignored.
    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Replace the whole contents of a dynamic buffer. Bytes past
    /// `bytes.len()` become zero.
    fn write_discard(&mut self, buffer: BufferId, bytes: &[u8]) -> Result<(), RenderError>;

    fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: u32);

    /// Bind a buffer of 32-bit indices.
    fn bind_index_buffer(&mut self, buffer: BufferId);

    fn bind_constant_buffer(&mut self, slot: u32, buffer: BufferId) -> Result<(), RenderError>;

    /// Draw `index_count` indices from the bound buffers, triangle-list.
    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32);

    /// Clear color and depth targets.
    fn clear(&mut self, color: Vec4) -> Result<(), RenderError>;

    fn present(&mut self) -> Result<(), RenderError>;
}
