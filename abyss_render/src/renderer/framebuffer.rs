/// Framebuffer - ordered surfaces bound to a render pass's attachment slots

use std::sync::Arc;
use crate::error::Result;
use crate::engine_bail;
use crate::renderer::{
    GfxFormat, Offscreen, RenderSurface, RenderSurfaceUsage, Renderbuffer, RenderbufferUsage,
    Renderer,
};

// ===== SURFACES =====

/// Which view of a window render surface is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceEye {
    /// Non-stereoscopic surface
    Mono,
    /// Left eye of a stereoscopic surface
    Left,
    /// Right eye of a stereoscopic surface
    Right,
}

/// Origin category used when the backend can't mix surfaces in a subpass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceCategory {
    /// Main window surface (mono or left eye)
    Primary,
    /// Right eye window surface
    RightEye,
    /// Offscreen or renderbuffer
    Other,
}

/// One surface bound into a framebuffer
#[derive(Debug, Clone)]
pub enum FramebufferSurface {
    /// Color buffer of the window render surface
    ColorRenderSurface { surface: Arc<RenderSurface>, eye: SurfaceEye },
    /// Depth/stencil buffer of the window render surface
    DepthRenderSurface { surface: Arc<RenderSurface>, eye: SurfaceEye },
    /// Offscreen texture
    Offscreen(Arc<Offscreen>),
    /// Renderbuffer
    Renderbuffer(Arc<Renderbuffer>),
}

impl FramebufferSurface {
    /// Format as seen by a render pass
    ///
    /// Window surfaces use the renderer's formats, other surfaces their own.
    pub fn format(&self, renderer: &Renderer) -> GfxFormat {
        match self {
            FramebufferSurface::ColorRenderSurface { .. } => renderer.surface_color_format(),
            FramebufferSurface::DepthRenderSurface { .. } => renderer.surface_depth_stencil_format(),
            FramebufferSurface::Offscreen(offscreen) => offscreen.format,
            FramebufferSurface::Renderbuffer(renderbuffer) => renderbuffer.format,
        }
    }

    /// Sample count as seen by a render pass
    pub fn samples(&self, renderer: &Renderer) -> u32 {
        match self {
            FramebufferSurface::ColorRenderSurface { .. }
            | FramebufferSurface::DepthRenderSurface { .. } => renderer.surface_samples(),
            FramebufferSurface::Offscreen(offscreen) => offscreen.samples,
            FramebufferSurface::Renderbuffer(renderbuffer) => renderbuffer.samples,
        }
    }

    /// Width and height in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            FramebufferSurface::ColorRenderSurface { surface, .. }
            | FramebufferSurface::DepthRenderSurface { surface, .. } => (surface.width, surface.height),
            FramebufferSurface::Offscreen(offscreen) => (offscreen.width, offscreen.height),
            FramebufferSurface::Renderbuffer(renderbuffer) => (renderbuffer.width, renderbuffer.height),
        }
    }

    /// Eye of a window render surface, `None` for other surfaces
    pub fn eye(&self) -> Option<SurfaceEye> {
        match self {
            FramebufferSurface::ColorRenderSurface { eye, .. }
            | FramebufferSurface::DepthRenderSurface { eye, .. } => Some(*eye),
            _ => None,
        }
    }

    pub fn is_offscreen(&self) -> bool {
        matches!(self, FramebufferSurface::Offscreen(_))
    }

    /// Origin category for surface-mixing checks
    pub fn category(&self) -> SurfaceCategory {
        match self.eye() {
            Some(SurfaceEye::Mono) | Some(SurfaceEye::Left) => SurfaceCategory::Primary,
            Some(SurfaceEye::Right) => SurfaceCategory::RightEye,
            None => SurfaceCategory::Other,
        }
    }

    /// Whether multisampled output can be resolved into this surface
    pub fn can_resolve(&self) -> bool {
        match self {
            FramebufferSurface::ColorRenderSurface { .. } => true,
            FramebufferSurface::DepthRenderSurface { .. } => false,
            FramebufferSurface::Offscreen(offscreen) => offscreen.resolve,
            FramebufferSurface::Renderbuffer(_) => false,
        }
    }

    /// Whether contents can be kept after the render pass
    pub fn can_keep(&self) -> bool {
        match self {
            FramebufferSurface::ColorRenderSurface { .. } => true,
            FramebufferSurface::DepthRenderSurface { surface, .. } => surface.usage.intersects(
                RenderSurfaceUsage::CONTINUE_DEPTH_STENCIL | RenderSurfaceUsage::BLIT_DEPTH_STENCIL_FROM,
            ),
            FramebufferSurface::Offscreen(_) => true,
            FramebufferSurface::Renderbuffer(renderbuffer) => renderbuffer
                .usage
                .intersects(RenderbufferUsage::CONTINUE | RenderbufferUsage::BLIT_FROM),
        }
    }

    /// Window render surface backing this surface, if any
    fn render_surface(&self) -> Option<&Arc<RenderSurface>> {
        match self {
            FramebufferSurface::ColorRenderSurface { surface, .. }
            | FramebufferSurface::DepthRenderSurface { surface, .. } => Some(surface),
            _ => None,
        }
    }
}

// ===== FRAMEBUFFER =====

/// Framebuffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    name: String,
    surfaces: Vec<FramebufferSurface>,
    width: u32,
    height: u32,
    layers: u32,
}

impl Framebuffer {
    /// Create a framebuffer
    ///
    /// `layers` of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// - InvalidArgument: too many layers, invalid surface format, surface dimensions
    ///   that don't match the framebuffer
    /// - NotPermitted: stereoscopic surface on a mono renderer, more than one window
    ///   render surface, no color surface when the backend requires one
    pub fn new(
        renderer: &Renderer,
        name: impl Into<String>,
        surfaces: Vec<FramebufferSurface>,
        width: u32,
        height: u32,
        layers: u32,
    ) -> Result<Self> {
        let name = name.into();
        let caps = renderer.resource_manager().caps();

        // ========== VALIDATION 1: Layer count ==========
        let layers = layers.max(1);
        if layers > caps.max_framebuffer_layers {
            engine_bail!(InvalidArgument, "abyss::Framebuffer",
                "Framebuffer '{}' layers {} exceed the supported maximum {}",
                name, layers, caps.max_framebuffer_layers);
        }

        // ========== VALIDATION 2: Per-surface checks ==========
        let mut render_surface: Option<&Arc<RenderSurface>> = None;
        let mut has_color_surface = false;
        for (i, surface) in surfaces.iter().enumerate() {
            if let Some(eye) = surface.eye() {
                if eye != SurfaceEye::Mono && !renderer.is_stereoscopic() {
                    engine_bail!(NotPermitted, "abyss::Framebuffer",
                        "Framebuffer '{}' surface {} uses a stereoscopic render surface without stereoscopic rendering",
                        name, i);
                }
            }

            if let Some(current) = surface.render_surface() {
                if let Some(previous) = render_surface {
                    if !Arc::ptr_eq(previous, current) {
                        engine_bail!(NotPermitted, "abyss::Framebuffer",
                            "Framebuffer '{}' can't use multiple render surfaces", name);
                    }
                }
                render_surface = Some(current);
            }

            let (surface_width, surface_height) = surface.dimensions();
            if surface_width != width || surface_height != height {
                engine_bail!(InvalidArgument, "abyss::Framebuffer",
                    "Framebuffer '{}' surface {} is {}x{}, expected {}x{}",
                    name, i, surface_width, surface_height, width, height);
            }

            let format = surface.format(renderer);
            if !format.is_valid() {
                engine_bail!(InvalidArgument, "abyss::Framebuffer",
                    "Framebuffer '{}' surface {} has an invalid format", name, i);
            }

            if !format.is_depth_stencil() {
                has_color_surface = true;
            }
        }

        // ========== VALIDATION 3: Color surface requirement ==========
        if !has_color_surface && caps.requires_color_buffer {
            engine_bail!(NotPermitted, "abyss::Framebuffer",
                "Framebuffer '{}' needs at least one color surface on the current backend", name);
        }

        crate::engine_trace!("abyss::Framebuffer",
            "Framebuffer '{}' created ({} surfaces, {}x{}x{})", name, surfaces.len(), width, height, layers);

        Ok(Self { name, surfaces, width, height, layers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surfaces(&self) -> &[FramebufferSurface] {
        &self.surfaces
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
