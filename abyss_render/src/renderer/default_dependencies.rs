/// Default subpass dependency synthesis
///
/// Backends use this when a render pass is created with
/// [`SubpassDependencies::Default`](crate::renderer::SubpassDependencies::Default).
/// For every subpass:
/// - one edge from each earlier subpass that shares an attachment one of them writes
/// - an edge from external work when there is no earlier edge
/// - an edge to external work when no later subpass shares an attachment

use bitflags::bitflags;
use crate::renderer::{
    GfxAccess, PipelineStages, RenderSubpassInfo, SubpassDependency, EXTERNAL_SUBPASS,
    NO_ATTACHMENT,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct AttachmentUse: u32 {
        const INPUT = 1 << 0;
        const COLOR = 1 << 1;
        const DEPTH_STENCIL = 1 << 2;
    }
}

const WRITE_USES: AttachmentUse = AttachmentUse::COLOR.union(AttachmentUse::DEPTH_STENCIL);

fn attachment_use(subpass: &RenderSubpassInfo, attachment: u32) -> AttachmentUse {
    let mut uses = AttachmentUse::empty();
    if attachment == NO_ATTACHMENT {
        return uses;
    }

    if subpass.input_attachments.contains(&attachment) {
        uses |= AttachmentUse::INPUT;
    }
    if subpass.color_attachments.iter().any(|c| c.attachment_index == attachment) {
        uses |= AttachmentUse::COLOR;
    }
    if subpass.depth_stencil_attachment == attachment {
        uses |= AttachmentUse::DEPTH_STENCIL;
    }
    uses
}

fn shares_attachments(first: &RenderSubpassInfo, second: &RenderSubpassInfo) -> bool {
    // Two subpasses that only read the same input don't need ordering
    first.input_attachments.iter().any(|&a| second.has_attachment(a, false))
        || first.color_attachments.iter().any(|c| second.has_attachment(c.attachment_index, true))
        || second.has_attachment(first.depth_stencil_attachment, true)
}

fn has_later_dependency(subpasses: &[RenderSubpassInfo], index: usize) -> bool {
    subpasses[index + 1..]
        .iter()
        .any(|later| shares_attachments(&subpasses[index], later))
}

/// Number of dependencies [`default_dependencies`] produces
pub fn count_default_dependencies(subpasses: &[RenderSubpassInfo]) -> usize {
    let mut count = 0;
    for i in 0..subpasses.len() {
        let earlier = (0..i)
            .filter(|&j| shares_attachments(&subpasses[i], &subpasses[j]))
            .count();
        count += earlier.max(1);

        if !has_later_dependency(subpasses, i) {
            count += 1;
        }
    }
    count
}

/// Build the edge from `prev_index` to `cur_index`, if one is needed
fn edge_between(
    prev: &RenderSubpassInfo,
    prev_index: u32,
    cur: &RenderSubpassInfo,
    cur_index: u32,
) -> Option<SubpassDependency> {
    let mut prev_use = AttachmentUse::empty();
    let mut cur_use = AttachmentUse::empty();
    // The current subpass writes something the previous one read as an input
    let mut writes_prev_input = false;

    for &input in &cur.input_attachments {
        let uses = attachment_use(prev, input);
        if !uses.is_empty() {
            prev_use |= uses;
            cur_use |= AttachmentUse::INPUT;
        }
    }

    for color in &cur.color_attachments {
        let uses = attachment_use(prev, color.attachment_index);
        if !uses.is_empty() {
            writes_prev_input |= uses.contains(AttachmentUse::INPUT);
            prev_use |= uses;
            cur_use |= AttachmentUse::COLOR;
        }
    }

    let uses = attachment_use(prev, cur.depth_stencil_attachment);
    if !uses.is_empty() {
        writes_prev_input |= uses.contains(AttachmentUse::INPUT);
        prev_use |= uses;
        cur_use |= AttachmentUse::DEPTH_STENCIL;
    }

    if !prev_use.intersects(WRITE_USES) && !cur_use.intersects(WRITE_USES) {
        return None;
    }

    let mut src_stages = PipelineStages::empty();
    let mut src_access = GfxAccess::empty();
    if writes_prev_input {
        src_stages |= PipelineStages::FRAGMENT_SHADER;
        src_access |= GfxAccess::INPUT_ATTACHMENT_READ;
    }
    if prev_use.contains(AttachmentUse::COLOR) {
        src_stages |= PipelineStages::COLOR_OUTPUT;
        src_access |= GfxAccess::COLOR_ATTACHMENT_WRITE;
        if cur_use.contains(AttachmentUse::COLOR) {
            src_access |= GfxAccess::COLOR_ATTACHMENT_READ;
        }
    }
    if prev_use.contains(AttachmentUse::DEPTH_STENCIL) {
        src_stages |= PipelineStages::PRE_FRAGMENT_SHADER_TESTS
            | PipelineStages::POST_FRAGMENT_SHADER_TESTS;
        src_access |= GfxAccess::DEPTH_STENCIL_ATTACHMENT_WRITE;
        if cur_use.contains(AttachmentUse::DEPTH_STENCIL) {
            src_access |= GfxAccess::DEPTH_STENCIL_ATTACHMENT_READ;
        }
    }

    let mut dst_stages = PipelineStages::empty();
    let mut dst_access = GfxAccess::empty();
    if cur_use.contains(AttachmentUse::INPUT) {
        dst_stages |= PipelineStages::FRAGMENT_SHADER;
        dst_access |= GfxAccess::INPUT_ATTACHMENT_READ;
    }
    if cur_use.contains(AttachmentUse::COLOR) {
        dst_stages |= PipelineStages::COLOR_OUTPUT;
        dst_access |= GfxAccess::COLOR_ATTACHMENT_READ | GfxAccess::COLOR_ATTACHMENT_WRITE;
    }
    if cur_use.contains(AttachmentUse::DEPTH_STENCIL) {
        dst_stages |= PipelineStages::PRE_FRAGMENT_SHADER_TESTS
            | PipelineStages::POST_FRAGMENT_SHADER_TESTS;
        dst_access |= GfxAccess::DEPTH_STENCIL_ATTACHMENT_READ
            | GfxAccess::DEPTH_STENCIL_ATTACHMENT_WRITE;
    }

    Some(SubpassDependency {
        src_subpass: prev_index,
        src_stages,
        src_access,
        dst_subpass: cur_index,
        dst_stages,
        dst_access,
        region_dependency: true,
    })
}

fn external_edge(src_subpass: u32, dst_subpass: u32) -> SubpassDependency {
    let mut dependency = SubpassDependency {
        src_subpass,
        src_stages: PipelineStages::empty(),
        src_access: GfxAccess::empty(),
        dst_subpass,
        dst_stages: PipelineStages::empty(),
        dst_access: GfxAccess::empty(),
        region_dependency: false,
    };

    // One side is always external here, so the matching call cannot fail
    let added = if src_subpass == EXTERNAL_SUBPASS {
        dependency.add_first_subpass_flags()
    } else {
        dependency.add_last_subpass_flags()
    };
    debug_assert!(added.is_ok());
    dependency
}

/// Synthesize the default dependency set for `subpasses`
pub fn default_dependencies(subpasses: &[RenderSubpassInfo]) -> Vec<SubpassDependency> {
    let mut dependencies = Vec::with_capacity(count_default_dependencies(subpasses));

    for (i, cur) in subpasses.iter().enumerate() {
        let cur_index = i as u32;

        let mut has_earlier = false;
        for (j, prev) in subpasses[..i].iter().enumerate() {
            if let Some(edge) = edge_between(prev, j as u32, cur, cur_index) {
                dependencies.push(edge);
                has_earlier = true;
            }
        }

        if !has_earlier {
            dependencies.push(external_edge(EXTERNAL_SUBPASS, cur_index));
        }

        if !has_later_dependency(subpasses, i) {
            dependencies.push(external_edge(cur_index, EXTERNAL_SUBPASS));
        }
    }

    debug_assert_eq!(dependencies.len(), count_default_dependencies(subpasses));
    dependencies
}

#[cfg(test)]
#[path = "default_dependencies_tests.rs"]
mod tests;
