/// CommandBuffer - render pass scope tracking for command recording
///
/// The command buffer records which render pass is active, which subpass is
/// current and the effective viewport. Only one recorder thread may use a command
/// buffer at a time (`&mut` access enforces this).

use crate::renderer::{RenderPassId, Viewport};

/// Command buffer state
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    name: String,
    bound_render_pass: Option<RenderPassId>,
    bound_framebuffer: Option<String>,
    active_subpass: u32,
    viewport: Option<Viewport>,
    indirect_commands: bool,
}

impl CommandBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound_render_pass: None,
            bound_framebuffer: None,
            active_subpass: 0,
            viewport: None,
            indirect_commands: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render pass currently recording, if any
    pub fn bound_render_pass(&self) -> Option<RenderPassId> {
        self.bound_render_pass
    }

    /// Name of the framebuffer bound with the active render pass
    pub fn bound_framebuffer(&self) -> Option<&str> {
        self.bound_framebuffer.as_deref()
    }

    /// Index of the current subpass (0 when no render pass is active)
    pub fn active_subpass(&self) -> u32 {
        self.active_subpass
    }

    /// Effective viewport of the active render pass
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Draws of the current subpass come from indirect/secondary commands
    pub fn indirect_commands(&self) -> bool {
        self.indirect_commands
    }

    pub fn is_recording_render_pass(&self) -> bool {
        self.bound_render_pass.is_some()
    }

    // ===== SCOPE (render pass internal) =====

    pub(crate) fn start_render_pass_scope(
        &mut self,
        render_pass: RenderPassId,
        framebuffer: &str,
        viewport: Viewport,
        indirect_commands: bool,
    ) {
        self.bound_render_pass = Some(render_pass);
        self.bound_framebuffer = Some(framebuffer.to_string());
        self.active_subpass = 0;
        self.viewport = Some(viewport);
        self.indirect_commands = indirect_commands;
    }

    pub(crate) fn advance_subpass_scope(&mut self, indirect_commands: bool) {
        self.active_subpass += 1;
        self.indirect_commands = indirect_commands;
    }

    pub(crate) fn restore_previous_subpass_scope(&mut self, indirect_commands: bool) {
        debug_assert!(self.active_subpass > 0);
        self.active_subpass = self.active_subpass.saturating_sub(1);
        self.indirect_commands = indirect_commands;
    }

    pub(crate) fn end_render_pass_scope(&mut self) {
        self.bound_render_pass = None;
        self.bound_framebuffer = None;
        self.active_subpass = 0;
        self.viewport = None;
        self.indirect_commands = false;
    }
}
