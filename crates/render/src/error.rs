use crate::context::BufferId;

/// Errors from GPU resource creation and updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("mesh has no {0}")]
    EmptyGeometry(&'static str),
    #[error("index {value} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        value: u32,
        vertex_count: usize,
    },
    #[error("index count {0} is not a whole number of triangles")]
    IncompleteTriangle(usize),
    #[error("geometry has {0} elements, more than a 32-bit count can address")]
    GeometryTooLarge(usize),
    #[error("buffer '{0}' has zero size")]
    ZeroSizedBuffer(String),
    #[error("immutable buffer '{label}' needs {expected} bytes of initial data, got {actual}")]
    InitialDataMismatch {
        label: String,
        expected: u64,
        actual: usize,
    },
    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferId),
    #[error("buffer {0:?} is immutable")]
    ImmutableBuffer(BufferId),
    #[error("write of {len} bytes exceeds buffer size {size}")]
    WriteTooLarge { len: usize, size: u64 },
    #[error("constant slot {0} is not available in this context")]
    UnsupportedSlot(u32),
    #[error("surface error: {0}")]
    Surface(String),
}
