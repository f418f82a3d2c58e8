/// Render pass descriptors - attachments, subpasses, dependencies, viewport and clear values

use bitflags::bitflags;
use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use crate::renderer::GfxFormat;

// ============================================================================
// Sentinels
// ============================================================================

/// Attachment index meaning "no attachment bound to this slot"
pub const NO_ATTACHMENT: u32 = u32::MAX;

/// Subpass index meaning "work outside of the render pass"
pub const EXTERNAL_SUBPASS: u32 = u32::MAX;

/// Dependency count meaning "let the backend synthesize default dependencies"
pub const DEFAULT_SUBPASS_DEPENDENCIES: u32 = u32::MAX;

/// Sample count meaning "use the renderer's configured sample count"
pub const DEFAULT_ANTIALIAS_SAMPLES: u32 = u32::MAX - 1;

/// Raw index meaning "not found" in serialized scene data
pub const NOT_FOUND: u32 = u32::MAX;

// ============================================================================
// Flags
// ============================================================================

bitflags! {
    /// How an attachment is loaded and stored across the render pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttachmentUsage: u32 {
        /// Cleared at the start of the render pass (a clear value must be supplied)
        const CLEAR = 1 << 0;
        /// Previous contents are kept at the start of the render pass
        const KEEP_BEFORE = 1 << 1;
        /// Contents are kept after the render pass ends
        const KEEP_AFTER = 1 << 2;
        /// Multisampled contents are resolved after the render pass ends
        const RESOLVE = 1 << 3;
        /// Contents are read by a later subpass
        const USE_LATER = 1 << 4;
    }
}

bitflags! {
    /// GPU pipeline stages
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStages: u32 {
        /// Begin/end of command buffer execution
        const COMMAND_BUFFER = 1 << 0;
        /// Consume indirect draw parameters
        const DRAW_INDIRECT = 1 << 1;
        /// Read vertex attributes and indices
        const VERTEX_INPUT = 1 << 2;
        const VERTEX_SHADER = 1 << 3;
        const TESSELLATION_CONTROL_SHADER = 1 << 4;
        const TESSELLATION_EVALUATION_SHADER = 1 << 5;
        const GEOMETRY_SHADER = 1 << 6;
        const FRAGMENT_SHADER = 1 << 7;
        /// Tests before the fragment shader, including depth reads
        const PRE_FRAGMENT_SHADER_TESTS = 1 << 8;
        /// Tests after the fragment shader, including depth writes
        const POST_FRAGMENT_SHADER_TESTS = 1 << 9;
        /// Color output, blending and multisample resolve
        const COLOR_OUTPUT = 1 << 10;
        const COMPUTE_SHADER = 1 << 11;
        const COPY = 1 << 12;
        const HOST_ACCESS = 1 << 13;
        /// All graphics stages
        const ALL_GRAPHICS = 1 << 14;
    }
}

bitflags! {
    /// Memory access kinds guarded by a dependency
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GfxAccess: u32 {
        const INDIRECT_COMMAND_READ = 1 << 0;
        const INDEX_READ = 1 << 1;
        const VERTEX_ATTRIBUTE_READ = 1 << 2;
        const UNIFORM_BLOCK_READ = 1 << 3;
        const UNIFORM_BUFFER_READ = 1 << 4;
        const UNIFORM_BUFFER_WRITE = 1 << 5;
        const TEXTURE_READ = 1 << 6;
        const IMAGE_READ = 1 << 7;
        const IMAGE_WRITE = 1 << 8;
        const INPUT_ATTACHMENT_READ = 1 << 9;
        const COLOR_ATTACHMENT_READ = 1 << 10;
        const COLOR_ATTACHMENT_WRITE = 1 << 11;
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 12;
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 13;
        const COPY_READ = 1 << 14;
        const COPY_WRITE = 1 << 15;
        const HOST_READ = 1 << 16;
        const HOST_WRITE = 1 << 17;
        const MEMORY_READ = 1 << 18;
        const MEMORY_WRITE = 1 << 19;
    }
}

/// Every attachment access a render pass can perform
const ALL_ATTACHMENT_ACCESS: GfxAccess = GfxAccess::INPUT_ATTACHMENT_READ
    .union(GfxAccess::COLOR_ATTACHMENT_READ)
    .union(GfxAccess::COLOR_ATTACHMENT_WRITE)
    .union(GfxAccess::DEPTH_STENCIL_ATTACHMENT_READ)
    .union(GfxAccess::DEPTH_STENCIL_ATTACHMENT_WRITE);

// ============================================================================
// Attachments and subpasses
// ============================================================================

/// One render pass attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentInfo {
    /// Load/store usage
    pub usage: AttachmentUsage,
    /// Pixel format
    pub format: GfxFormat,
    /// Sample count, or [`DEFAULT_ANTIALIAS_SAMPLES`]
    pub samples: u32,
}

/// Reference from a subpass color slot to an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttachmentRef {
    /// Attachment index, or [`NO_ATTACHMENT`] to leave the slot unused
    pub attachment_index: u32,
    /// Resolve the multisampled result at the end of the subpass
    pub resolve: bool,
}

impl ColorAttachmentRef {
    pub fn new(attachment_index: u32, resolve: bool) -> Self {
        Self { attachment_index, resolve }
    }

    /// Unused color slot
    pub fn none() -> Self {
        Self { attachment_index: NO_ATTACHMENT, resolve: false }
    }
}

/// One rendering phase of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSubpassInfo {
    /// Debug name
    pub name: String,
    /// Attachments read as shader inputs
    pub input_attachments: Vec<u32>,
    /// Color output slots
    pub color_attachments: Vec<ColorAttachmentRef>,
    /// Depth/stencil attachment index, or [`NO_ATTACHMENT`]
    pub depth_stencil_attachment: u32,
}

impl RenderSubpassInfo {
    /// Subpass with no inputs, no color outputs and no depth/stencil
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_attachments: Vec::new(),
            color_attachments: Vec::new(),
            depth_stencil_attachment: NO_ATTACHMENT,
        }
    }

    pub fn with_inputs(mut self, inputs: &[u32]) -> Self {
        self.input_attachments = inputs.to_vec();
        self
    }

    pub fn with_colors(mut self, colors: &[ColorAttachmentRef]) -> Self {
        self.color_attachments = colors.to_vec();
        self
    }

    pub fn with_depth_stencil(mut self, attachment: u32) -> Self {
        self.depth_stencil_attachment = attachment;
        self
    }

    /// Returns true if the subpass references `attachment` (inputs only when `check_inputs`)
    pub fn has_attachment(&self, attachment: u32, check_inputs: bool) -> bool {
        if attachment == NO_ATTACHMENT {
            return false;
        }
        if check_inputs && self.input_attachments.contains(&attachment) {
            return true;
        }
        self.color_attachments.iter().any(|c| c.attachment_index == attachment)
            || self.depth_stencil_attachment == attachment
    }
}

// ============================================================================
// Dependencies
// ============================================================================

/// Ordering/barrier edge between two subpasses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubpassDependency {
    /// Source subpass, or [`EXTERNAL_SUBPASS`]
    pub src_subpass: u32,
    /// Stages of the source that must complete
    pub src_stages: PipelineStages,
    /// Accesses of the source that must be visible
    pub src_access: GfxAccess,
    /// Destination subpass, or [`EXTERNAL_SUBPASS`]
    pub dst_subpass: u32,
    /// Stages of the destination that wait
    pub dst_stages: PipelineStages,
    /// Accesses of the destination that wait
    pub dst_access: GfxAccess,
    /// The dependency is per-pixel region rather than for the whole framebuffer
    pub region_dependency: bool,
}

impl SubpassDependency {
    /// Add the stage/access flags for an edge from external work into the first use
    pub fn add_first_subpass_flags(&mut self) -> Result<()> {
        if self.src_subpass != EXTERNAL_SUBPASS {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "First subpass dependency must have an external source subpass");
        }

        self.src_stages |= PipelineStages::COMMAND_BUFFER;
        self.dst_stages |= PipelineStages::ALL_GRAPHICS;
        self.dst_access |= ALL_ATTACHMENT_ACCESS;
        Ok(())
    }

    /// Add the stage/access flags for an edge from the last use out to external work
    pub fn add_last_subpass_flags(&mut self) -> Result<()> {
        if self.dst_subpass != EXTERNAL_SUBPASS {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Last subpass dependency must have an external destination subpass");
        }

        self.src_stages |= PipelineStages::ALL_GRAPHICS;
        self.dst_stages |= PipelineStages::COMMAND_BUFFER;
        self.src_access |= ALL_ATTACHMENT_ACCESS;
        Ok(())
    }
}

/// Dependency list of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubpassDependencies<'a> {
    /// The backend synthesizes a conservative default set
    Default,
    /// Explicit dependencies, validated at creation
    Explicit(&'a [SubpassDependency]),
}

impl<'a> SubpassDependencies<'a> {
    /// Build from a raw count, where [`DEFAULT_SUBPASS_DEPENDENCIES`] selects the defaults
    ///
    /// # Errors
    ///
    /// Returns InvalidArgument if `count` is larger than the supplied slice.
    pub fn from_raw(count: u32, dependencies: &'a [SubpassDependency]) -> Result<Self> {
        if count == DEFAULT_SUBPASS_DEPENDENCIES {
            return Ok(SubpassDependencies::Default);
        }

        let count = count as usize;
        if count > dependencies.len() {
            engine_bail!(InvalidArgument, "abyss::RenderPass",
                "Dependency count {} exceeds the {} dependencies provided", count, dependencies.len());
        }
        Ok(SubpassDependencies::Explicit(&dependencies[..count]))
    }

    /// Raw count, [`DEFAULT_SUBPASS_DEPENDENCIES`] for the defaults
    pub fn raw_count(&self) -> u32 {
        match self {
            SubpassDependencies::Default => DEFAULT_SUBPASS_DEPENDENCIES,
            SubpassDependencies::Explicit(deps) => deps.len() as u32,
        }
    }
}

// ============================================================================
// Render pass descriptor
// ============================================================================

/// Descriptor for creating a render pass
#[derive(Debug, Clone, Copy)]
pub struct RenderPassDesc<'a> {
    /// Attachment slots
    pub attachments: &'a [AttachmentInfo],
    /// Subpasses, in execution order (at least one)
    pub subpasses: &'a [RenderSubpassInfo],
    /// Dependencies between subpasses
    pub dependencies: SubpassDependencies<'a>,
}

// ============================================================================
// Begin parameters
// ============================================================================

/// Viewport override for a render pass
///
/// x/y are in pixels, z is the normalized depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: Vec3,
    pub max: Vec3,
}

impl Viewport {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Viewport covering a whole framebuffer and the full depth range
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(width as f32, height as f32, 1.0),
        }
    }

    /// Returns true if the viewport lies within `[0, width] x [0, height] x [0, 1]`
    ///
    /// Every component of both `min` and `max` is checked against both bounds.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        let upper = Vec3::new(width as f32, height as f32, 1.0);
        [self.min, self.max]
            .iter()
            .all(|corner| corner.cmpge(Vec3::ZERO).all() && corner.cmple(upper).all())
    }
}

/// Clear value for one attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceClearValue {
    /// Float color
    Color([f32; 4]),
    /// Signed integer color
    ColorInt([i32; 4]),
    /// Unsigned integer color
    ColorUInt([u32; 4]),
    /// Depth and stencil
    DepthStencil { depth: f32, stencil: u32 },
}

#[cfg(test)]
#[path = "render_pass_desc_tests.rs"]
mod tests;
