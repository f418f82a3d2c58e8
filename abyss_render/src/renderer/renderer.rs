/// Renderer - configuration, main-thread identity and backend hooks

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::error::Result;
use crate::renderer::{
    CommandBuffer, Framebuffer, GfxFormat, RenderPass, RenderPassDesc, ResourceManager,
    SurfaceClearValue, Viewport, DEFAULT_ANTIALIAS_SAMPLES,
};

// ============================================================================
// Configuration
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Color format of the window render surface
    pub surface_color_format: GfxFormat,
    /// Depth/stencil format of the window render surface
    pub surface_depth_stencil_format: GfxFormat,
    /// Anti-alias sample count used for the render surface and [`DEFAULT_ANTIALIAS_SAMPLES`]
    pub surface_samples: u32,
    /// Maximum number of color attachments in one subpass
    pub max_color_attachments: u32,
    /// Left/right eye render surfaces are available
    pub stereoscopic: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_color_format: GfxFormat::B8G8R8A8_UNORM,
            surface_depth_stencil_format: GfxFormat::D24S8,
            surface_samples: 1,
            max_color_attachments: 4,
            stereoscopic: false,
        }
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// Render pass hooks implemented by each backend
///
/// Called only after the render pass validator has accepted the inputs. Errors are
/// returned to the caller unchanged.
pub trait RenderBackend: Send + Sync {
    /// Create the backend render pass object
    ///
    /// The backend copies the descriptor arrays into the returned [`RenderPass`]
    /// (see [`RenderPass::new`]). For
    /// [`SubpassDependencies::Default`](crate::renderer::SubpassDependencies::Default) it
    /// chooses the dependencies itself.
    fn create_render_pass(
        &self,
        renderer: &Arc<Renderer>,
        desc: &RenderPassDesc<'_>,
    ) -> Result<RenderPass>;

    /// Destroy the backend render pass object
    fn destroy_render_pass(&self, render_pass: &RenderPass) -> Result<()>;

    /// Begin the render pass on a command buffer
    fn begin_render_pass(
        &self,
        command_buffer: &mut CommandBuffer,
        render_pass: &RenderPass,
        framebuffer: &Framebuffer,
        viewport: Option<&Viewport>,
        clear_values: &[SurfaceClearValue],
        indirect_commands: bool,
    ) -> Result<()>;

    /// Advance to `subpass_index`
    fn next_render_subpass(
        &self,
        command_buffer: &mut CommandBuffer,
        render_pass: &RenderPass,
        subpass_index: u32,
        indirect_commands: bool,
    ) -> Result<()>;

    /// End the render pass
    fn end_render_pass(
        &self,
        command_buffer: &mut CommandBuffer,
        render_pass: &RenderPass,
    ) -> Result<()>;
}

// ============================================================================
// Renderer
// ============================================================================

/// Renderer
///
/// Owns the configuration and the backend handles. The thread that builds the
/// renderer becomes its main thread: render passes are created and destroyed there.
pub struct Renderer {
    config: RendererConfig,
    resource_manager: Arc<dyn ResourceManager>,
    backend: Arc<dyn RenderBackend>,
    main_thread: ThreadId,
}

impl Renderer {
    /// Create a renderer whose main thread is the calling thread
    pub fn new(
        config: RendererConfig,
        resource_manager: Arc<dyn ResourceManager>,
        backend: Arc<dyn RenderBackend>,
    ) -> Arc<Self> {
        crate::engine_debug!("abyss::Renderer",
            "Renderer created (color {:?}, depth/stencil {:?}, {} samples)",
            config.surface_color_format, config.surface_depth_stencil_format, config.surface_samples);

        Arc::new(Self {
            config,
            resource_manager,
            backend,
            main_thread: thread::current().id(),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn surface_color_format(&self) -> GfxFormat {
        self.config.surface_color_format
    }

    pub fn surface_depth_stencil_format(&self) -> GfxFormat {
        self.config.surface_depth_stencil_format
    }

    pub fn surface_samples(&self) -> u32 {
        self.config.surface_samples
    }

    pub fn max_color_attachments(&self) -> u32 {
        self.config.max_color_attachments
    }

    pub fn is_stereoscopic(&self) -> bool {
        self.config.stereoscopic
    }

    pub fn resource_manager(&self) -> &Arc<dyn ResourceManager> {
        &self.resource_manager
    }

    pub fn backend(&self) -> &Arc<dyn RenderBackend> {
        &self.backend
    }

    pub fn main_thread(&self) -> ThreadId {
        self.main_thread
    }

    /// Returns true when called from the renderer's main thread
    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }

    /// Replace [`DEFAULT_ANTIALIAS_SAMPLES`] with the configured sample count
    pub fn resolve_samples(&self, samples: u32) -> u32 {
        if samples == DEFAULT_ANTIALIAS_SAMPLES {
            self.config.surface_samples
        } else {
            samples
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("main_thread", &self.main_thread)
            .finish()
    }
}
