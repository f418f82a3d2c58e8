/// RenderPass - validated render pass lifecycle
///
/// Creation validates attachments, subpasses and dependencies. `begin` validates the
/// framebuffer against the attachments. Every check runs before the backend hook is
/// called and before the command buffer scope changes.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::engine_bail;
use crate::renderer::{
    AttachmentInfo, AttachmentUsage, CommandBuffer, Framebuffer, FramebufferSurface,
    OffscreenUsage, RenderPassDesc, RenderSubpassInfo, Renderer, SubpassDependencies,
    SubpassDependency, SurfaceCategory, SurfaceClearValue, Viewport, EXTERNAL_SUBPASS,
    NO_ATTACHMENT,
};

// ===== IDENTITY =====

static NEXT_RENDER_PASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique render pass identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderPassId(u64);

impl RenderPassId {
    fn next() -> Self {
        Self(NEXT_RENDER_PASS_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ===== RENDER PASS =====

/// Render pass
///
/// Owns copies of its attachment, subpass and dependency arrays. Created and
/// destroyed on the renderer's main thread; `begin`/`next_subpass`/`end` may be
/// called from any thread that owns the command buffer.
pub struct RenderPass {
    id: RenderPassId,
    renderer: Arc<Renderer>,
    attachments: Vec<AttachmentInfo>,
    subpasses: Vec<RenderSubpassInfo>,
    dependencies: Vec<SubpassDependency>,
    backend_data: Box<dyn Any + Send + Sync>,
    destroyed: bool,
}

impl RenderPass {
    /// Build the render pass object (backend use)
    ///
    /// Copies the descriptor arrays. `dependencies` holds the explicit dependencies
    /// or, for [`SubpassDependencies::Default`], the ones the backend synthesized.
    pub fn new(
        renderer: Arc<Renderer>,
        desc: &RenderPassDesc<'_>,
        dependencies: Vec<SubpassDependency>,
        backend_data: Box<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            id: RenderPassId::next(),
            renderer,
            attachments: desc.attachments.to_vec(),
            subpasses: desc.subpasses.to_vec(),
            dependencies,
            backend_data,
            destroyed: false,
        }
    }

    /// Validate `desc` and create the render pass through the renderer's backend
    ///
    /// # Errors
    ///
    /// - InvalidArgument: no subpasses, unrenderable format, zero samples, sample
    ///   mismatch inside a subpass, malformed dependency
    /// - IndexOutOfRange: attachment or subpass reference out of range
    /// - NotPermitted: depth/color format misuse, backend limits, not on the main thread
    /// - Any error returned by the backend
    pub fn create(renderer: &Arc<Renderer>, desc: &RenderPassDesc<'_>) -> Result<RenderPass> {
        let attachments = desc.attachments;
        let subpasses = desc.subpasses;
        let attachment_count = attachments.len() as u32;
        let subpass_count = subpasses.len() as u32;
        let caps = renderer.resource_manager().caps();

        // ========== VALIDATION 1: Subpasses present ==========
        if subpasses.is_empty() {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Render pass requires at least one subpass");
        }

        // ========== VALIDATION 2: Attachment formats and samples ==========
        for (i, attachment) in attachments.iter().enumerate() {
            if attachment.format != renderer.surface_color_format()
                && attachment.format != renderer.surface_depth_stencil_format()
                && !renderer.resource_manager().offscreen_supported(attachment.format)
            {
                engine_bail!(InvalidArgument, "abyss::RenderPass",
                    "Attachment {} format {:?} can't be rendered to", i, attachment.format);
            }

            if attachment.samples == 0 {
                engine_bail!(InvalidArgument, "abyss::RenderPass",
                    "Attachment {} samples must be greater than 0", i);
            }
        }

        // ========== VALIDATION 3: Subpasses ==========
        for (i, subpass) in subpasses.iter().enumerate() {
            for &input in &subpass.input_attachments {
                if input >= attachment_count {
                    engine_bail!(IndexOutOfRange, "abyss::RenderPass",
                        "Subpass {} ('{}') input attachment {} out of range ({} attachments)",
                        i, subpass.name, input, attachment_count);
                }
            }

            if subpass.color_attachments.len() as u32 > renderer.max_color_attachments() {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Subpass {} ('{}') has {} color attachments, maximum is {}",
                    i, subpass.name, subpass.color_attachments.len(), renderer.max_color_attachments());
            }

            // 0 means no attachment has constrained the sample count yet
            let mut samples = 0u32;
            let mut any_color_attachment = false;
            for color in &subpass.color_attachments {
                let index = color.attachment_index;
                if index == NO_ATTACHMENT {
                    continue;
                }

                any_color_attachment = true;
                if index >= attachment_count {
                    engine_bail!(IndexOutOfRange, "abyss::RenderPass",
                        "Subpass {} ('{}') color attachment {} out of range ({} attachments)",
                        i, subpass.name, index, attachment_count);
                }

                let attachment = &attachments[index as usize];
                if attachment.format.is_depth_stencil() {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Subpass {} ('{}') uses depth/stencil attachment {} as a color attachment",
                        i, subpass.name, index);
                }

                let attachment_samples = renderer.resolve_samples(attachment.samples);
                if samples == 0 {
                    samples = attachment_samples;
                } else if samples != attachment_samples {
                    engine_bail!(InvalidArgument, "abyss::RenderPass",
                        "Subpass {} ('{}') mixes {} and {} anti-alias samples",
                        i, subpass.name, samples, attachment_samples);
                }
            }

            if caps.requires_color_buffer && !any_color_attachment {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Subpass {} ('{}') needs a color attachment on the current backend",
                    i, subpass.name);
            }

            let depth = subpass.depth_stencil_attachment;
            if depth != NO_ATTACHMENT {
                if depth >= attachment_count {
                    engine_bail!(IndexOutOfRange, "abyss::RenderPass",
                        "Subpass {} ('{}') depth/stencil attachment {} out of range ({} attachments)",
                        i, subpass.name, depth, attachment_count);
                }

                let attachment = &attachments[depth as usize];
                if !attachment.format.is_depth_stencil() {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Subpass {} ('{}') uses color attachment {} as the depth/stencil attachment",
                        i, subpass.name, depth);
                }

                let attachment_samples = renderer.resolve_samples(attachment.samples);
                if samples != 0 && samples != attachment_samples {
                    engine_bail!(InvalidArgument, "abyss::RenderPass",
                        "Subpass {} ('{}') mixes {} and {} anti-alias samples",
                        i, subpass.name, samples, attachment_samples);
                }
            }

            if caps.requires_any_surface && !any_color_attachment && depth == NO_ATTACHMENT {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Subpass {} ('{}') needs at least one surface on the current backend",
                    i, subpass.name);
            }
        }

        // ========== VALIDATION 4: Dependencies ==========
        if let SubpassDependencies::Explicit(dependencies) = desc.dependencies {
            for (i, dependency) in dependencies.iter().enumerate() {
                Self::validate_dependency(i, dependency, subpass_count)?;
            }
        }

        // ========== VALIDATION 5: Main thread ==========
        if !renderer.is_main_thread() {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render passes may only be created on the main thread");
        }

        let render_pass = renderer.backend().create_render_pass(renderer, desc)?;
        crate::engine_debug!("abyss::RenderPass",
            "Render pass {} created ({} attachments, {} subpasses, {} dependencies)",
            render_pass.id, render_pass.attachments.len(), render_pass.subpasses.len(),
            render_pass.dependencies.len());
        Ok(render_pass)
    }

    fn validate_dependency(index: usize, dependency: &SubpassDependency, subpass_count: u32) -> Result<()> {
        let src = dependency.src_subpass;
        let dst = dependency.dst_subpass;

        if src == EXTERNAL_SUBPASS && dst == EXTERNAL_SUBPASS {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Dependency {}: source and destination can't both be external", index);
        }

        if (src != EXTERNAL_SUBPASS && src >= subpass_count)
            || (dst != EXTERNAL_SUBPASS && dst >= subpass_count)
        {
            engine_bail!(IndexOutOfRange, "abyss::RenderPass",
                "Dependency {}: subpass {} -> {} out of range ({} subpasses)",
                index, src, dst, subpass_count);
        }

        if src != EXTERNAL_SUBPASS && dst != EXTERNAL_SUBPASS && src > dst {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Dependency {}: subpass {} can only depend on earlier subpasses, not {}",
                index, dst, src);
        }

        if dependency.src_stages.is_empty() || dependency.dst_stages.is_empty() {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Dependency {}: pipeline stages can't be empty", index);
        }

        if src == dst && !dependency.region_dependency {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Dependency {}: subpass {} depending on itself must be a region dependency",
                index, src);
        }

        Ok(())
    }

    // ===== RECORDING =====

    /// Begin the render pass on `command_buffer` with `framebuffer`
    ///
    /// # Arguments
    ///
    /// * `viewport` - Optional viewport override, defaults to the whole framebuffer
    /// * `clear_values` - Empty, or one value per attachment
    /// * `indirect_commands` - The first subpass is drawn with indirect/secondary commands
    ///
    /// # Errors
    ///
    /// - InvalidArgument: destroyed render pass, malformed clear values
    /// - NotPermitted: another render pass active, framebuffer incompatible with the attachments
    /// - RangeError: viewport outside the framebuffer
    /// - Any error returned by the backend (the command buffer scope is rolled back)
    pub fn begin(
        &self,
        command_buffer: &mut CommandBuffer,
        framebuffer: &Framebuffer,
        viewport: Option<&Viewport>,
        clear_values: &[SurfaceClearValue],
        indirect_commands: bool,
    ) -> Result<()> {
        self.check_not_destroyed()?;
        let renderer = &self.renderer;

        // ========== VALIDATION 1: No active render pass ==========
        if let Some(active) = command_buffer.bound_render_pass() {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Can't begin render pass {} while render pass {} is active on '{}'",
                self.id, active, command_buffer.name());
        }

        // ========== VALIDATION 2: Surface count ==========
        if framebuffer.surface_count() != self.attachments.len() {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Framebuffer '{}' has {} surfaces, render pass {} has {} attachments",
                framebuffer.name(), framebuffer.surface_count(), self.id, self.attachments.len());
        }

        // ========== VALIDATION 3: Per-attachment compatibility ==========
        let mut needs_clear = false;
        for (i, (attachment, surface)) in self.attachments.iter().zip(framebuffer.surfaces()).enumerate() {
            let surface_format = surface.format(renderer);
            if surface_format != attachment.format {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Framebuffer '{}' surface {} format {:?} doesn't match attachment format {:?}",
                    framebuffer.name(), i, surface_format, attachment.format);
            }

            let samples = renderer.resolve_samples(attachment.samples);
            let surface_samples = surface.samples(renderer);
            if surface_samples != samples {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Framebuffer '{}' surface {} has {} samples, attachment expects {}",
                    framebuffer.name(), i, surface_samples, samples);
            }

            if attachment.usage.contains(AttachmentUsage::KEEP_AFTER) && !surface.can_keep() {
                engine_bail!(NotPermitted, "abyss::RenderPass",
                    "Attachment {} keeps its contents but surface {} lacks continue or blit-from usage",
                    i, i);
            }

            if attachment.usage.contains(AttachmentUsage::RESOLVE) {
                let resolvable = match surface {
                    FramebufferSurface::Offscreen(offscreen) => {
                        offscreen.usage.contains(OffscreenUsage::CONTINUE)
                    }
                    _ => false,
                };
                if !resolvable {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Attachment {} resolves but surface {} isn't an offscreen with continue usage",
                        i, i);
                }
            }

            if attachment.usage.contains(AttachmentUsage::CLEAR) {
                needs_clear = true;
            }
        }

        // ========== VALIDATION 4: Clear values ==========
        if needs_clear && clear_values.is_empty() {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Render pass {} clears attachments but no clear values were provided", self.id);
        }

        if !clear_values.is_empty() && clear_values.len() != self.attachments.len() {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "{} clear values provided, render pass {} has {} attachments",
                clear_values.len(), self.id, self.attachments.len());
        }

        // ========== VALIDATION 5: Per-subpass surface rules ==========
        let can_mix = renderer.resource_manager().caps().can_mix_with_render_surface;
        let surfaces = framebuffer.surfaces();
        for (i, subpass) in self.subpasses.iter().enumerate() {
            for &input in &subpass.input_attachments {
                if !surfaces[input as usize].is_offscreen() {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Subpass {} ('{}') input attachment {} must be bound to an offscreen",
                        i, subpass.name, input);
                }
            }

            if !can_mix {
                let mut categories: Vec<SurfaceCategory> = Vec::with_capacity(3);
                let written = subpass
                    .color_attachments
                    .iter()
                    .map(|c| c.attachment_index)
                    .chain(std::iter::once(subpass.depth_stencil_attachment))
                    .filter(|&index| index != NO_ATTACHMENT);
                for index in written {
                    let category = surfaces[index as usize].category();
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }

                if categories.len() > 1 {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Subpass {} ('{}') mixes the render surface with other surfaces, unsupported by the current backend",
                        i, subpass.name);
                }
            }

            for color in &subpass.color_attachments {
                let index = color.attachment_index;
                if !color.resolve || index == NO_ATTACHMENT {
                    continue;
                }

                let samples = renderer.resolve_samples(self.attachments[index as usize].samples);
                if samples > 1 && !surfaces[index as usize].can_resolve() {
                    engine_bail!(NotPermitted, "abyss::RenderPass",
                        "Subpass {} ('{}') resolves color attachment {} into an unresolvable surface",
                        i, subpass.name, index);
                }
            }
        }

        // ========== VALIDATION 6: Viewport ==========
        if let Some(viewport) = viewport {
            if !viewport.fits(framebuffer.width(), framebuffer.height()) {
                engine_bail!(RangeError, "abyss::RenderPass",
                    "Viewport {:?}..{:?} is out of range for framebuffer '{}' ({}x{})",
                    viewport.min, viewport.max, framebuffer.name(), framebuffer.width(), framebuffer.height());
            }
        }

        let effective_viewport = viewport
            .copied()
            .unwrap_or_else(|| Viewport::full(framebuffer.width(), framebuffer.height()));
        command_buffer.start_render_pass_scope(self.id, framebuffer.name(), effective_viewport, indirect_commands);

        let result = renderer.backend().begin_render_pass(
            command_buffer, self, framebuffer, viewport, clear_values, indirect_commands);
        if let Err(err) = result {
            command_buffer.end_render_pass_scope();
            return Err(err);
        }

        crate::engine_trace!("abyss::RenderPass",
            "Render pass {} began on '{}' with framebuffer '{}'", self.id, command_buffer.name(), framebuffer.name());
        Ok(())
    }

    /// Advance to the next subpass
    ///
    /// # Errors
    ///
    /// - InvalidArgument: destroyed render pass
    /// - NotPermitted: this render pass isn't active, or already at the last subpass
    /// - Any error returned by the backend (the subpass index is restored)
    pub fn next_subpass(&self, command_buffer: &mut CommandBuffer, indirect_commands: bool) -> Result<()> {
        self.check_not_destroyed()?;

        if command_buffer.bound_render_pass() != Some(self.id) {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render pass {} isn't the active render pass on '{}'", self.id, command_buffer.name());
        }

        if command_buffer.active_subpass() + 1 >= self.subpasses.len() as u32 {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render pass {} is already at its last subpass", self.id);
        }

        let previous_indirect = command_buffer.indirect_commands();
        command_buffer.advance_subpass_scope(indirect_commands);
        let subpass_index = command_buffer.active_subpass();

        let result = self.renderer.backend().next_render_subpass(
            command_buffer, self, subpass_index, indirect_commands);
        if let Err(err) = result {
            command_buffer.restore_previous_subpass_scope(previous_indirect);
            return Err(err);
        }

        crate::engine_trace!("abyss::RenderPass",
            "Render pass {} advanced to subpass {} ('{}')",
            self.id, subpass_index, self.subpasses[subpass_index as usize].name);
        Ok(())
    }

    /// End the render pass
    ///
    /// # Errors
    ///
    /// - InvalidArgument: destroyed render pass
    /// - NotPermitted: this render pass isn't active, or subpasses were skipped
    /// - Any error returned by the backend (the render pass stays active)
    pub fn end(&self, command_buffer: &mut CommandBuffer) -> Result<()> {
        self.check_not_destroyed()?;

        if command_buffer.bound_render_pass() != Some(self.id) {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render pass {} isn't the active render pass on '{}'", self.id, command_buffer.name());
        }

        if command_buffer.active_subpass() + 1 != self.subpasses.len() as u32 {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render pass {} ended at subpass {} of {}",
                self.id, command_buffer.active_subpass(), self.subpasses.len());
        }

        self.renderer.backend().end_render_pass(command_buffer, self)?;
        command_buffer.end_render_pass_scope();

        crate::engine_trace!("abyss::RenderPass", "Render pass {} ended", self.id);
        Ok(())
    }

    // ===== DESTRUCTION =====

    /// Destroy the backend render pass object
    ///
    /// # Errors
    ///
    /// - InvalidArgument: already destroyed
    /// - NotPermitted: not on the main thread
    /// - Any error returned by the backend (the render pass stays alive)
    pub fn destroy(&mut self) -> Result<()> {
        self.check_not_destroyed()?;

        if !self.renderer.is_main_thread() {
            engine_bail!(NotPermitted, "abyss::RenderPass",
                "Render passes may only be destroyed on the main thread");
        }

        self.renderer.backend().destroy_render_pass(self)?;
        self.destroyed = true;

        crate::engine_debug!("abyss::RenderPass", "Render pass {} destroyed", self.id);
        Ok(())
    }

    fn check_not_destroyed(&self) -> Result<()> {
        if self.destroyed {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Render pass {} was already destroyed", self.id);
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> RenderPassId {
        self.id
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    pub fn attachments(&self) -> &[AttachmentInfo] {
        &self.attachments
    }

    pub fn subpasses(&self) -> &[RenderSubpassInfo] {
        &self.subpasses
    }

    pub fn dependencies(&self) -> &[SubpassDependency] {
        &self.dependencies
    }

    pub fn attachment_count(&self) -> u32 {
        self.attachments.len() as u32
    }

    pub fn subpass_count(&self) -> u32 {
        self.subpasses.len() as u32
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Backend-specific data, if it has type `T`
    pub fn backend_data<T: Any>(&self) -> Option<&T> {
        self.backend_data.downcast_ref::<T>()
    }
}

impl fmt::Debug for RenderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPass")
            .field("id", &self.id)
            .field("attachments", &self.attachments)
            .field("subpasses", &self.subpasses)
            .field("dependencies", &self.dependencies)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        if !self.destroyed {
            crate::engine_warn!("abyss::RenderPass",
                "Render pass {} dropped without destroy()", self.id);
        }
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
