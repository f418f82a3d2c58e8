//! Integration tests for Engine logging system
//!
//! These tests verify that validation failures reach the installed logger.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use abyss_render::abyss::Engine;
use abyss_render::abyss::log::{Logger, LogEntry, LogSeverity};
use abyss_render::abyss::render::mock_renderer::MockRenderer;
use abyss_render::abyss::render::{
    AttachmentInfo, AttachmentUsage, ColorAttachmentRef, GfxFormat, RenderPass, RenderPassDesc,
    RenderSubpassInfo, SubpassDependencies, DEFAULT_ANTIALIAS_SAMPLES,
};
use abyss_render::abyss::resource::SharedMaterialValues;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn errors_from(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.severity == LogSeverity::Error && e.source == source)
        .cloned()
        .collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert_eq!(captured[2].message, "Test error message");
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_render_pass_failure_is_logged() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let (renderer, _backend, _rm) = MockRenderer::create();
    let attachments = [AttachmentInfo {
        usage: AttachmentUsage::CLEAR,
        format: renderer.surface_depth_stencil_format(),
        samples: DEFAULT_ANTIALIAS_SAMPLES,
    }];
    let subpasses = [RenderSubpassInfo::new("main").with_colors(&[ColorAttachmentRef::new(0, false)])];
    let desc = RenderPassDesc {
        attachments: &attachments,
        subpasses: &subpasses,
        dependencies: SubpassDependencies::Default,
    };

    let err = RenderPass::create(&renderer, &desc).unwrap_err();

    let errors = errors_from(&entries, "abyss::RenderPass");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, err.message());
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_store_failure_is_logged() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let result = SharedMaterialValues::new(0);
    assert!(result.is_err());
    assert_eq!(errors_from(&entries, "abyss::SharedMaterialValues").len(), 1);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_undestroyed_render_pass_warns() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let (renderer, _backend, _rm) = MockRenderer::create();
    let attachments = [AttachmentInfo {
        usage: AttachmentUsage::empty(),
        format: GfxFormat::R8G8B8A8_UNORM,
        samples: 1,
    }];
    let subpasses = [RenderSubpassInfo::new("main").with_colors(&[ColorAttachmentRef::new(0, false)])];
    let desc = RenderPassDesc {
        attachments: &attachments,
        subpasses: &subpasses,
        dependencies: SubpassDependencies::Default,
    };

    let render_pass = RenderPass::create(&renderer, &desc).unwrap();
    drop(render_pass);

    let warned = entries
        .lock()
        .unwrap()
        .iter()
        .any(|e| e.severity == LogSeverity::Warn && e.source == "abyss::RenderPass");
    assert!(warned);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_log_level_filters_validation_noise() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::set_log_level(LogSeverity::Trace);

    let (renderer, _backend, _rm) = MockRenderer::create();
    let attachments = [AttachmentInfo {
        usage: AttachmentUsage::empty(),
        format: GfxFormat::R8G8B8A8_UNORM,
        samples: 1,
    }];
    let subpasses = [RenderSubpassInfo::new("main").with_colors(&[ColorAttachmentRef::new(0, false)])];
    let desc = RenderPassDesc {
        attachments: &attachments,
        subpasses: &subpasses,
        dependencies: SubpassDependencies::Default,
    };
    let mut render_pass = RenderPass::create(&renderer, &desc).unwrap();
    render_pass.destroy().unwrap();

    let debug_count = entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.severity == LogSeverity::Debug)
        .count();
    assert!(debug_count >= 2);

    // Back at the default level, debug messages are dropped
    Engine::reset_logger();
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let mut render_pass = RenderPass::create(&renderer, &desc).unwrap();
    render_pass.destroy().unwrap();
    assert!(entries.lock().unwrap().is_empty());

    Engine::reset_logger();
}
