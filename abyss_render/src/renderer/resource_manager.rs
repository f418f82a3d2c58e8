/// ResourceManager trait - backend capability queries consulted by the validators

use crate::renderer::GfxFormat;

// ============================================================================
// Capabilities
// ============================================================================

/// Backend capabilities and limits
///
/// Plain data snapshot returned by [`ResourceManager::caps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCaps {
    /// Every render subpass must write at least one color attachment
    pub requires_color_buffer: bool,
    /// Every render subpass must write at least one color or depth/stencil attachment
    pub requires_any_surface: bool,
    /// The main render surface can share a subpass with offscreens/renderbuffers
    pub can_mix_with_render_surface: bool,
    /// Texture buffers may view a sub-range of their buffer
    pub has_texture_buffer_subrange: bool,
    /// Minimum offset alignment for texture buffer views (bytes)
    pub min_texture_buffer_alignment: u64,
    /// Maximum number of elements in a texture buffer view
    pub max_texture_buffer_elements: u64,
    /// Minimum offset alignment for uniform blocks (bytes)
    pub min_uniform_block_alignment: u64,
    /// Minimum offset alignment for uniform buffers (bytes)
    pub min_uniform_buffer_alignment: u64,
    /// Maximum size of a uniform block (bytes)
    pub max_uniform_block_size: u64,
    /// Maximum number of layers in a framebuffer
    pub max_framebuffer_layers: u32,
}

impl Default for ResourceCaps {
    fn default() -> Self {
        Self {
            requires_color_buffer: false,
            requires_any_surface: false,
            can_mix_with_render_surface: true,
            has_texture_buffer_subrange: true,
            min_texture_buffer_alignment: 16,
            max_texture_buffer_elements: 16 * 1024 * 1024,
            min_uniform_block_alignment: 16,
            min_uniform_buffer_alignment: 16,
            max_uniform_block_size: 1024 * 1024 * 1024,
            max_framebuffer_layers: 1024,
        }
    }
}

// ============================================================================
// ResourceManager trait
// ============================================================================

/// Resource manager trait
///
/// Implemented by backend-specific resource managers (e.g., MockResourceManager).
/// Only the queries needed for validation are exposed here; resource creation stays
/// in the backend.
pub trait ResourceManager: Send + Sync {
    /// Current capabilities and limits
    fn caps(&self) -> ResourceCaps;

    /// Whether `format` can be rendered to as an offscreen or renderbuffer
    fn offscreen_supported(&self, format: GfxFormat) -> bool;

    /// Whether `format` can be sampled through a texture buffer
    fn texture_buffer_supported(&self, format: GfxFormat) -> bool;
}
