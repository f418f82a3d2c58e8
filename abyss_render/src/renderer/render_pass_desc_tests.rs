/// Unit tests for render pass descriptors

use glam::Vec3;
use crate::error::ErrorKind;
use crate::renderer::{
    ColorAttachmentRef, GfxAccess, PipelineStages, RenderSubpassInfo, SubpassDependencies,
    SubpassDependency, Viewport, DEFAULT_ANTIALIAS_SAMPLES, DEFAULT_SUBPASS_DEPENDENCIES,
    EXTERNAL_SUBPASS, NOT_FOUND, NO_ATTACHMENT,
};

fn dependency(src: u32, dst: u32) -> SubpassDependency {
    SubpassDependency {
        src_subpass: src,
        src_stages: PipelineStages::empty(),
        src_access: GfxAccess::empty(),
        dst_subpass: dst,
        dst_stages: PipelineStages::empty(),
        dst_access: GfxAccess::empty(),
        region_dependency: false,
    }
}

// ============================================================================
// Sentinels
// ============================================================================

#[test]
fn test_sentinel_values() {
    assert_eq!(NO_ATTACHMENT, 0xFFFF_FFFF);
    assert_eq!(EXTERNAL_SUBPASS, 0xFFFF_FFFF);
    assert_eq!(DEFAULT_SUBPASS_DEPENDENCIES, 0xFFFF_FFFF);
    assert_eq!(DEFAULT_ANTIALIAS_SAMPLES, 0xFFFF_FFFE);
    assert_eq!(NOT_FOUND, 0xFFFF_FFFF);
}

// ============================================================================
// Subpasses
// ============================================================================

#[test]
fn test_subpass_builder() {
    let subpass = RenderSubpassInfo::new("lighting")
        .with_inputs(&[0, 1])
        .with_colors(&[ColorAttachmentRef::new(2, true), ColorAttachmentRef::none()])
        .with_depth_stencil(3);

    assert_eq!(subpass.name, "lighting");
    assert_eq!(subpass.input_attachments, vec![0, 1]);
    assert_eq!(subpass.color_attachments[1].attachment_index, NO_ATTACHMENT);
    assert_eq!(subpass.depth_stencil_attachment, 3);
}

#[test]
fn test_subpass_has_attachment() {
    let subpass = RenderSubpassInfo::new("lighting")
        .with_inputs(&[0])
        .with_colors(&[ColorAttachmentRef::new(2, false)])
        .with_depth_stencil(3);

    assert!(subpass.has_attachment(0, true));
    assert!(!subpass.has_attachment(0, false));
    assert!(subpass.has_attachment(2, false));
    assert!(subpass.has_attachment(3, false));
    assert!(!subpass.has_attachment(NO_ATTACHMENT, true));
}

// ============================================================================
// Dependencies
// ============================================================================

#[test]
fn test_dependencies_from_raw_default() {
    let deps = SubpassDependencies::from_raw(DEFAULT_SUBPASS_DEPENDENCIES, &[]).unwrap();
    assert_eq!(deps, SubpassDependencies::Default);
    assert_eq!(deps.raw_count(), DEFAULT_SUBPASS_DEPENDENCIES);
}

#[test]
fn test_dependencies_from_raw_explicit() {
    let all = [dependency(EXTERNAL_SUBPASS, 0), dependency(0, 1), dependency(1, EXTERNAL_SUBPASS)];

    let deps = SubpassDependencies::from_raw(2, &all).unwrap();
    assert_eq!(deps.raw_count(), 2);
    match deps {
        SubpassDependencies::Explicit(slice) => assert_eq!(slice[1].dst_subpass, 1),
        SubpassDependencies::Default => panic!("expected explicit dependencies"),
    }

    let empty = SubpassDependencies::from_raw(0, &all).unwrap();
    assert_eq!(empty.raw_count(), 0);
}

#[test]
fn test_dependencies_from_raw_count_too_large() {
    let all = [dependency(0, 1)];
    let err = SubpassDependencies::from_raw(2, &all).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_add_first_and_last_flags() {
    let mut first = dependency(EXTERNAL_SUBPASS, 0);
    first.add_first_subpass_flags().unwrap();
    assert!(first.src_stages.contains(PipelineStages::COMMAND_BUFFER));
    assert!(first.dst_access.contains(GfxAccess::COLOR_ATTACHMENT_READ));

    let mut last = dependency(0, EXTERNAL_SUBPASS);
    last.add_last_subpass_flags().unwrap();
    assert!(last.dst_stages.contains(PipelineStages::COMMAND_BUFFER));
    assert!(last.src_access.contains(GfxAccess::DEPTH_STENCIL_ATTACHMENT_WRITE));
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_viewport_full_fits() {
    let viewport = Viewport::full(800, 600);
    assert_eq!(viewport.max, Vec3::new(800.0, 600.0, 1.0));
    assert!(viewport.fits(800, 600));
    assert!(!viewport.fits(799, 600));
}

#[test]
fn test_viewport_out_of_bounds() {
    assert!(!Viewport::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 1.0)).fits(100, 100));
    assert!(!Viewport::new(Vec3::ZERO, Vec3::new(10.0, 10.0, 1.5)).fits(100, 100));
    assert!(Viewport::new(Vec3::new(5.0, 5.0, 0.25), Vec3::new(10.0, 10.0, 0.75)).fits(100, 100));
}

#[test]
fn test_viewport_checks_both_corners_on_both_bounds() {
    assert!(!Viewport::new(Vec3::ZERO, Vec3::new(-5.0, 10.0, 1.0)).fits(100, 100));
    assert!(!Viewport::new(Vec3::ZERO, Vec3::new(10.0, 10.0, -1.0)).fits(100, 100));
    assert!(!Viewport::new(Vec3::new(150.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 1.0)).fits(100, 100));
    assert!(!Viewport::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(10.0, 10.0, 1.0)).fits(100, 100));
}
