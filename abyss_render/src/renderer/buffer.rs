/// GPU buffers and shader variable groups

use std::fmt;
use std::sync::Arc;
use bitflags::bitflags;
use crate::renderer::ResourceManager;

bitflags! {
    /// Buffer usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Index buffer
        const INDEX = 1 << 0;
        /// Vertex buffer
        const VERTEX = 1 << 1;
        /// Indirect draw arguments
        const INDIRECT_DRAW = 1 << 2;
        /// Uniform block (std140 constant buffer)
        const UNIFORM_BLOCK = 1 << 3;
        /// Uniform buffer (read/write storage buffer)
        const UNIFORM_BUFFER = 1 << 4;
        /// Read-only texture buffer
        const TEXTURE = 1 << 5;
        /// Read/write image buffer
        const IMAGE = 1 << 6;
        /// Source of copy operations
        const COPY_FROM = 1 << 7;
        /// Destination of copy operations
        const COPY_TO = 1 << 8;
    }
}

// ===== GFX BUFFER =====

/// GPU buffer handle
///
/// Keeps its owning resource manager so capability checks can be made against the
/// backend that created it.
pub struct GfxBuffer {
    /// Debug name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Usage flags
    pub usage: BufferUsage,
    resource_manager: Arc<dyn ResourceManager>,
}

impl GfxBuffer {
    pub fn new(
        resource_manager: Arc<dyn ResourceManager>,
        name: impl Into<String>,
        size: u64,
        usage: BufferUsage,
    ) -> Self {
        Self { name: name.into(), size, usage, resource_manager }
    }

    /// Resource manager that created this buffer
    pub fn resource_manager(&self) -> &Arc<dyn ResourceManager> {
        &self.resource_manager
    }
}

impl fmt::Debug for GfxBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GfxBuffer")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("usage", &self.usage)
            .finish()
    }
}

// ===== SHADER VARIABLE GROUP =====

/// Group of shader variables packed by the backend
///
/// When the backend stores the group in a GPU buffer, `buffer` exposes it so the
/// group can be bound like a plain uniform block.
#[derive(Debug)]
pub struct ShaderVariableGroup {
    /// Debug name
    pub name: String,
    /// Backing buffer, if the backend uses one
    pub buffer: Option<Arc<GfxBuffer>>,
}

impl ShaderVariableGroup {
    pub fn new(name: impl Into<String>, buffer: Option<Arc<GfxBuffer>>) -> Self {
        Self { name: name.into(), buffer }
    }
}
