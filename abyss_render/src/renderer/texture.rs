/// Texture-class surfaces: textures, offscreens, renderbuffers and window render surfaces
///
/// These are collaborator handles: they carry the properties the validators need
/// (format, dimensions, samples, usage) and nothing backend-specific.

use bitflags::bitflags;
use crate::renderer::GfxFormat;

// ===== USAGE FLAGS =====

bitflags! {
    /// How an offscreen may be used beyond being rendered to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OffscreenUsage: u32 {
        /// Can be sampled in shaders
        const TEXTURE = 1 << 0;
        /// Can be bound as a storage image
        const IMAGE = 1 << 1;
        /// Contents may be continued across render passes
        const CONTINUE = 1 << 2;
        /// Can be the source of a blit
        const BLIT_FROM = 1 << 3;
        /// Can be the destination of a blit
        const BLIT_TO = 1 << 4;
    }
}

bitflags! {
    /// How a renderbuffer may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderbufferUsage: u32 {
        /// Contents may be continued across render passes
        const CONTINUE = 1 << 0;
        /// Can be the source of a blit
        const BLIT_FROM = 1 << 1;
        /// Can be the destination of a blit
        const BLIT_TO = 1 << 2;
    }
}

bitflags! {
    /// How a window render surface may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderSurfaceUsage: u32 {
        /// Depth/stencil contents may be continued across render passes
        const CONTINUE_DEPTH_STENCIL = 1 << 0;
        /// Color contents can be the source of a blit
        const BLIT_COLOR_FROM = 1 << 1;
        /// Depth/stencil contents can be the source of a blit
        const BLIT_DEPTH_STENCIL_FROM = 1 << 2;
    }
}

// ===== TEXTURE =====

/// Sampled texture
#[derive(Debug, Clone)]
pub struct Texture {
    /// Debug name
    pub name: String,
    /// Pixel format
    pub format: GfxFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture {
    pub fn new(name: impl Into<String>, format: GfxFormat, width: u32, height: u32) -> Self {
        Self { name: name.into(), format, width, height }
    }
}

// ===== OFFSCREEN =====

/// Texture that can be rendered to
#[derive(Debug, Clone)]
pub struct Offscreen {
    /// Debug name
    pub name: String,
    /// Pixel format
    pub format: GfxFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Multisample count
    pub samples: u32,
    /// Multisampled contents are resolved into this offscreen at the end of the subpass
    pub resolve: bool,
    /// Usage flags
    pub usage: OffscreenUsage,
}

impl Offscreen {
    /// Create a single-sampled offscreen that can be sampled as a texture
    pub fn new(name: impl Into<String>, format: GfxFormat, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
            samples: 1,
            resolve: false,
            usage: OffscreenUsage::TEXTURE,
        }
    }

    /// Set the multisample count and resolve flag
    pub fn with_samples(mut self, samples: u32, resolve: bool) -> Self {
        self.samples = samples;
        self.resolve = resolve;
        self
    }

    /// Replace the usage flags
    pub fn with_usage(mut self, usage: OffscreenUsage) -> Self {
        self.usage = usage;
        self
    }
}

// ===== RENDERBUFFER =====

/// Render target that can't be sampled
#[derive(Debug, Clone)]
pub struct Renderbuffer {
    /// Debug name
    pub name: String,
    /// Pixel format
    pub format: GfxFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Multisample count
    pub samples: u32,
    /// Usage flags
    pub usage: RenderbufferUsage,
}

impl Renderbuffer {
    pub fn new(
        name: impl Into<String>,
        format: GfxFormat,
        width: u32,
        height: u32,
        samples: u32,
        usage: RenderbufferUsage,
    ) -> Self {
        Self { name: name.into(), format, width, height, samples, usage }
    }
}

// ===== RENDER SURFACE =====

/// Window render surface
///
/// Its color and depth/stencil formats and sample count come from the renderer.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    /// Debug name
    pub name: String,
    /// Width in pixels (before any pre-rotation)
    pub width: u32,
    /// Height in pixels (before any pre-rotation)
    pub height: u32,
    /// Usage flags
    pub usage: RenderSurfaceUsage,
}

impl RenderSurface {
    pub fn new(name: impl Into<String>, width: u32, height: u32, usage: RenderSurfaceUsage) -> Self {
        Self { name: name.into(), width, height, usage }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
