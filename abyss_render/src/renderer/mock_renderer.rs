/// Mock Renderer for unit tests (no GPU required)
///
/// This mock backend allows testing render pass validation, framebuffers and the
/// shared material values without requiring a real GPU or graphics backend. Every
/// hook records its call and can be told to fail once.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::Result;
use crate::engine_bail;
use crate::renderer::{
    default_dependencies, CommandBuffer, Framebuffer, GfxFormat, RenderBackend, RenderPass,
    RenderPassDesc, Renderer, RendererConfig, ResourceCaps, ResourceManager, SubpassDependencies,
    SurfaceClearValue, Viewport,
};

// ============================================================================
// Mock ResourceManager
// ============================================================================

/// Resource manager with adjustable capabilities
#[derive(Debug)]
pub struct MockResourceManager {
    caps: RwLock<ResourceCaps>,
}

impl MockResourceManager {
    pub fn new() -> Self {
        Self { caps: RwLock::new(ResourceCaps::default()) }
    }

    /// Replace the capabilities
    pub fn set_caps(&self, caps: ResourceCaps) {
        if let Ok(mut current) = self.caps.write() {
            *current = caps;
        }
    }

    /// Modify the capabilities in place
    pub fn update_caps(&self, update: impl FnOnce(&mut ResourceCaps)) {
        if let Ok(mut current) = self.caps.write() {
            update(&mut current);
        }
    }
}

impl Default for MockResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager for MockResourceManager {
    fn caps(&self) -> ResourceCaps {
        self.caps.read().map(|caps| *caps).unwrap_or_default()
    }

    fn offscreen_supported(&self, format: GfxFormat) -> bool {
        format.is_valid() && !format.is_compressed()
    }

    fn texture_buffer_supported(&self, format: GfxFormat) -> bool {
        format.is_valid() && !format.is_compressed() && !format.is_depth_stencil()
    }
}

// ============================================================================
// Mock RenderBackend
// ============================================================================

/// Backend-specific data stored in mock render passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRenderPassData {
    /// Value of the backend's create counter when the pass was created
    pub serial: u32,
}

/// Render backend that records hook calls
#[derive(Debug, Default)]
pub struct MockRenderBackend {
    pub create_count: AtomicU32,
    pub destroy_count: AtomicU32,
    pub begin_count: AtomicU32,
    pub next_subpass_count: AtomicU32,
    pub end_count: AtomicU32,
    fail_next_create: AtomicBool,
    fail_next_destroy: AtomicBool,
    fail_next_begin: AtomicBool,
    fail_next_subpass: AtomicBool,
    fail_next_end: AtomicBool,
    commands: Mutex<Vec<String>>,
}

impl MockRenderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_render_pass` call fail with a backend error
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Make the next `destroy_render_pass` call fail with a backend error
    pub fn fail_next_destroy(&self) {
        self.fail_next_destroy.store(true, Ordering::SeqCst);
    }

    /// Make the next `begin_render_pass` call fail with a backend error
    pub fn fail_next_begin(&self) {
        self.fail_next_begin.store(true, Ordering::SeqCst);
    }

    /// Make the next `next_render_subpass` call fail with a backend error
    pub fn fail_next_subpass(&self) {
        self.fail_next_subpass.store(true, Ordering::SeqCst);
    }

    /// Make the next `end_render_pass` call fail with a backend error
    pub fn fail_next_end(&self) {
        self.fail_next_end.store(true, Ordering::SeqCst);
    }

    /// Recorded hook calls, oldest first
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().map(|commands| commands.clone()).unwrap_or_default()
    }

    pub fn creates(&self) -> u32 {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn destroys(&self) -> u32 {
        self.destroy_count.load(Ordering::SeqCst)
    }

    pub fn begins(&self) -> u32 {
        self.begin_count.load(Ordering::SeqCst)
    }

    pub fn next_subpasses(&self) -> u32 {
        self.next_subpass_count.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> u32 {
        self.end_count.load(Ordering::SeqCst)
    }

    fn record(&self, command: String) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

impl RenderBackend for MockRenderBackend {
    fn create_render_pass(
        &self,
        renderer: &Arc<Renderer>,
        desc: &RenderPassDesc<'_>,
    ) -> Result<RenderPass> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            engine_bail!(BackendError, "abyss::MockRenderBackend", "Mock render pass creation failed");
        }

        let dependencies = match desc.dependencies {
            SubpassDependencies::Default => default_dependencies(desc.subpasses),
            SubpassDependencies::Explicit(dependencies) => dependencies.to_vec(),
        };

        let serial = self.create_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.record("create_render_pass".to_string());
        Ok(RenderPass::new(
            Arc::clone(renderer),
            desc,
            dependencies,
            Box::new(MockRenderPassData { serial }),
        ))
    }

    fn destroy_render_pass(&self, _render_pass: &RenderPass) -> Result<()> {
        if self.fail_next_destroy.swap(false, Ordering::SeqCst) {
            engine_bail!(BackendError, "abyss::MockRenderBackend", "Mock render pass destruction failed");
        }

        self.destroy_count.fetch_add(1, Ordering::SeqCst);
        self.record("destroy_render_pass".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &self,
        _command_buffer: &mut CommandBuffer,
        _render_pass: &RenderPass,
        framebuffer: &Framebuffer,
        _viewport: Option<&Viewport>,
        _clear_values: &[SurfaceClearValue],
        _indirect_commands: bool,
    ) -> Result<()> {
        if self.fail_next_begin.swap(false, Ordering::SeqCst) {
            engine_bail!(BackendError, "abyss::MockRenderBackend", "Mock render pass begin failed");
        }

        self.begin_count.fetch_add(1, Ordering::SeqCst);
        self.record(format!("begin_render_pass:{}", framebuffer.name()));
        Ok(())
    }

    fn next_render_subpass(
        &self,
        _command_buffer: &mut CommandBuffer,
        _render_pass: &RenderPass,
        subpass_index: u32,
        _indirect_commands: bool,
    ) -> Result<()> {
        if self.fail_next_subpass.swap(false, Ordering::SeqCst) {
            engine_bail!(BackendError, "abyss::MockRenderBackend", "Mock next subpass failed");
        }

        self.next_subpass_count.fetch_add(1, Ordering::SeqCst);
        self.record(format!("next_render_subpass:{}", subpass_index));
        Ok(())
    }

    fn end_render_pass(
        &self,
        _command_buffer: &mut CommandBuffer,
        _render_pass: &RenderPass,
    ) -> Result<()> {
        if self.fail_next_end.swap(false, Ordering::SeqCst) {
            engine_bail!(BackendError, "abyss::MockRenderBackend", "Mock render pass end failed");
        }

        self.end_count.fetch_add(1, Ordering::SeqCst);
        self.record("end_render_pass".to_string());
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Factory for renderers wired to the mock backend
pub struct MockRenderer;

impl MockRenderer {
    /// Mock configuration: RGB8 color, D24S8 depth/stencil, 4 samples, 4 color attachments
    pub fn config() -> RendererConfig {
        RendererConfig {
            surface_color_format: GfxFormat::R8G8B8_UNORM,
            surface_depth_stencil_format: GfxFormat::D24S8,
            surface_samples: 4,
            max_color_attachments: 4,
            stereoscopic: false,
        }
    }

    /// Create a renderer with [`MockRenderer::config`]
    ///
    /// The calling thread becomes the renderer's main thread.
    pub fn create() -> (Arc<Renderer>, Arc<MockRenderBackend>, Arc<MockResourceManager>) {
        Self::create_with_config(Self::config())
    }

    /// Create a renderer with a custom configuration
    pub fn create_with_config(
        config: RendererConfig,
    ) -> (Arc<Renderer>, Arc<MockRenderBackend>, Arc<MockResourceManager>) {
        let backend = Arc::new(MockRenderBackend::new());
        let resource_manager = Arc::new(MockResourceManager::new());
        let renderer = Renderer::new(
            config,
            Arc::clone(&resource_manager) as Arc<dyn ResourceManager>,
            Arc::clone(&backend) as Arc<dyn RenderBackend>,
        );
        (renderer, backend, resource_manager)
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
