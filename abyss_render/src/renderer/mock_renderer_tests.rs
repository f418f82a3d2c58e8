/// Unit tests for MockRenderer and associated mock types.

use crate::renderer::mock_renderer::*;
use crate::renderer::{GfxFormat, ResourceCaps, ResourceManager};
use crate::error::ErrorKind;

// ============================================================================
// MockResourceManager Tests
// ============================================================================

#[test]
fn test_mock_resource_manager_default_caps() {
    let rm = MockResourceManager::new();
    assert_eq!(rm.caps(), ResourceCaps::default());
}

#[test]
fn test_mock_resource_manager_update_caps() {
    let rm = MockResourceManager::new();
    rm.update_caps(|caps| caps.min_texture_buffer_alignment = 64);
    assert_eq!(rm.caps().min_texture_buffer_alignment, 64);

    rm.set_caps(ResourceCaps { requires_color_buffer: true, ..ResourceCaps::default() });
    assert!(rm.caps().requires_color_buffer);
    assert_eq!(rm.caps().min_texture_buffer_alignment, 16);
}

#[test]
fn test_mock_resource_manager_format_support() {
    let rm = MockResourceManager::new();

    assert!(rm.offscreen_supported(GfxFormat::R8G8B8A8_UNORM));
    assert!(rm.offscreen_supported(GfxFormat::D24S8));
    assert!(!rm.offscreen_supported(GfxFormat::BC1_RGB));
    assert!(!rm.offscreen_supported(GfxFormat::Unknown));

    assert!(rm.texture_buffer_supported(GfxFormat::R32_SFLOAT));
    assert!(!rm.texture_buffer_supported(GfxFormat::D16));
    assert!(!rm.texture_buffer_supported(GfxFormat::BC3));
}

// ============================================================================
// MockRenderer Tests
// ============================================================================

#[test]
fn test_mock_renderer_config() {
    let (renderer, backend, _rm) = MockRenderer::create();

    assert_eq!(renderer.surface_color_format(), GfxFormat::R8G8B8_UNORM);
    assert_eq!(renderer.surface_depth_stencil_format(), GfxFormat::D24S8);
    assert_eq!(renderer.surface_samples(), 4);
    assert_eq!(renderer.max_color_attachments(), 4);
    assert!(renderer.is_main_thread());
    assert_eq!(backend.creates(), 0);
    assert!(backend.commands().is_empty());
}

#[test]
fn test_mock_backend_failure_is_one_shot() {
    use crate::renderer::{
        AttachmentInfo, AttachmentUsage, ColorAttachmentRef, RenderPass, RenderPassDesc,
        RenderSubpassInfo, SubpassDependencies,
    };

    let (renderer, backend, _rm) = MockRenderer::create();
    let attachments = [AttachmentInfo {
        usage: AttachmentUsage::CLEAR,
        format: GfxFormat::R8G8B8_UNORM,
        samples: 1,
    }];
    let subpasses = [RenderSubpassInfo::new("main").with_colors(&[ColorAttachmentRef::new(0, false)])];
    let desc = RenderPassDesc {
        attachments: &attachments,
        subpasses: &subpasses,
        dependencies: SubpassDependencies::Default,
    };

    backend.fail_next_create();
    let err = RenderPass::create(&renderer, &desc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendError);
    assert_eq!(backend.creates(), 0);

    let mut render_pass = RenderPass::create(&renderer, &desc).unwrap();
    assert_eq!(backend.creates(), 1);
    assert_eq!(render_pass.backend_data::<MockRenderPassData>(), Some(&MockRenderPassData { serial: 1 }));
    assert_eq!(render_pass.dependencies().len(), 2);

    render_pass.destroy().unwrap();
    assert_eq!(backend.commands(), vec!["create_render_pass", "destroy_render_pass"]);
}
