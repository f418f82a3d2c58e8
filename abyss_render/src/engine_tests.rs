//! Unit tests for engine.rs
//!
//! Tests the logger facade and the minimum severity filter.
//! These tests touch global state and must run serially.

use crate::engine::Engine;
use crate::log::{LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

// Other unit tests log concurrently, keep only this file's entries
impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "abyss::test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn install_capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

// ============================================================================
// LOGGER FACADE
// ============================================================================

#[test]
#[serial]
fn test_log_reaches_custom_logger() {
    let entries = install_capture();

    Engine::log(LogSeverity::Warn, "abyss::test", "hello".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].source, "abyss::test");
    assert_eq!(captured[0].message, "hello");
    assert!(captured[0].file.is_none());
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_detailed_carries_location() {
    let entries = install_capture();

    Engine::log_detailed(LogSeverity::Error, "abyss::test", "boom".to_string(), "x.rs", 12);

    let captured = entries.lock().unwrap();
    assert_eq!(captured[0].file, Some("x.rs"));
    assert_eq!(captured[0].line, Some(12));
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_error_macro_records_location() {
    let entries = install_capture();

    crate::engine_error!("abyss::test", "failed with {}", 3);

    let captured = entries.lock().unwrap();
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert_eq!(captured[0].message, "failed with 3");
    assert!(captured[0].file.is_some());
    assert!(captured[0].line.is_some());
    drop(captured);

    Engine::reset_logger();
}

// ============================================================================
// SEVERITY FILTER
// ============================================================================

#[test]
#[serial]
fn test_default_level_filters_debug() {
    Engine::reset_logger();
    let entries = install_capture();

    assert_eq!(Engine::log_level(), LogSeverity::Info);
    crate::engine_debug!("abyss::test", "hidden");
    crate::engine_info!("abyss::test", "shown");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].message, "shown");
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_set_log_level_trace_enables_everything() {
    let entries = install_capture();
    Engine::set_log_level(LogSeverity::Trace);

    crate::engine_trace!("abyss::test", "t");
    crate::engine_debug!("abyss::test", "d");

    assert_eq!(entries.lock().unwrap().len(), 2);
    assert!(Engine::is_enabled(LogSeverity::Trace));

    Engine::reset_logger();
    assert_eq!(Engine::log_level(), LogSeverity::Info);
}

#[test]
#[serial]
fn test_set_log_level_error_hides_warnings() {
    let entries = install_capture();
    Engine::set_log_level(LogSeverity::Error);

    crate::engine_warn!("abyss::test", "w");
    crate::engine_error!("abyss::test", "e");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    drop(captured);

    Engine::reset_logger();
}
