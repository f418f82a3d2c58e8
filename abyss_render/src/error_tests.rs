//! Unit tests for error.rs
//!
//! Tests Error variants, kinds, Display and the error macros.

use crate::error::{Error, ErrorKind, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("No subpasses provided".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid argument"));
    assert!(display.contains("No subpasses provided"));
}

#[test]
fn test_not_permitted_display() {
    let err = Error::NotPermitted("Wrong thread".to_string());
    assert_eq!(format!("{}", err), "Not permitted: Wrong thread");
}

#[test]
fn test_exhausted_capacity_display() {
    let err = Error::ExhaustedCapacity("100 values".to_string());
    assert!(format!("{}", err).starts_with("Exhausted capacity"));
}

// ============================================================================
// KIND AND MESSAGE
// ============================================================================

#[test]
fn test_error_kind_matches_variant() {
    let cases = [
        (Error::InvalidArgument(String::new()), ErrorKind::InvalidArgument),
        (Error::IndexOutOfRange(String::new()), ErrorKind::IndexOutOfRange),
        (Error::NotPermitted(String::new()), ErrorKind::NotPermitted),
        (Error::RangeError(String::new()), ErrorKind::RangeError),
        (Error::FormatError(String::new()), ErrorKind::FormatError),
        (Error::ExhaustedCapacity(String::new()), ErrorKind::ExhaustedCapacity),
        (Error::TypeMismatch(String::new()), ErrorKind::TypeMismatch),
        (Error::NotFound(String::new()), ErrorKind::NotFound),
        (Error::BackendError(String::new()), ErrorKind::BackendError),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn test_error_message() {
    let err = Error::RangeError("Viewport is out of range".to_string());
    assert_eq!(err.message(), "Viewport is out of range");
}

#[test]
fn test_error_is_std_error() {
    let err = Error::NotFound("tex0".to_string());
    let _: &dyn std::error::Error = &err;
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_when(fail: bool) -> Result<u32> {
    if fail {
        crate::engine_bail!(TypeMismatch, "abyss::test", "Value '{}' has another kind", "tex0");
    }
    Ok(7)
}

#[test]
fn test_engine_bail_returns_variant() {
    let err = bail_when(true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.message(), "Value 'tex0' has another kind");
    assert_eq!(bail_when(false).unwrap(), 7);
}

#[test]
fn test_engine_err_builds_variant() {
    let err = crate::engine_err!(IndexOutOfRange, "abyss::test", "index {} >= {}", 4, 3);
    assert_eq!(err, Error::IndexOutOfRange("index 4 >= 3".to_string()));
}
