//! Error types for the Abyss render core
//!
//! Every public entry point validates its inputs fully before mutating anything and
//! reports the first failing check through one of these variants. The message names
//! the offending field so it can be logged as-is.

use std::fmt;

/// Result type for Abyss operations
pub type Result<T> = std::result::Result<T, Error>;

/// Abyss errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing or malformed argument (empty required array, count mismatch, ...)
    InvalidArgument(String),

    /// An attachment, subpass or buffer range reference exceeds its bound
    IndexOutOfRange(String),

    /// Structurally valid but disallowed combination (wrong thread, capability limit, ...)
    NotPermitted(String),

    /// Viewport or other numeric range outside of its target
    RangeError(String),

    /// Pixel format cannot be used the way it was requested
    FormatError(String),

    /// A fixed-capacity container is full
    ExhaustedCapacity(String),

    /// A keyed value already exists with a different kind
    TypeMismatch(String),

    /// Lookup on an absent key
    NotFound(String),

    /// Failure reported by a backend hook, passed through unchanged
    BackendError(String),
}

/// Fieldless discriminant of [`Error`], convenient for matching in callers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    IndexOutOfRange,
    NotPermitted,
    RangeError,
    FormatError,
    ExhaustedCapacity,
    TypeMismatch,
    NotFound,
    BackendError,
}

impl Error {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::IndexOutOfRange(_) => ErrorKind::IndexOutOfRange,
            Error::NotPermitted(_) => ErrorKind::NotPermitted,
            Error::RangeError(_) => ErrorKind::RangeError,
            Error::FormatError(_) => ErrorKind::FormatError,
            Error::ExhaustedCapacity(_) => ErrorKind::ExhaustedCapacity,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::BackendError(_) => ErrorKind::BackendError,
        }
    }

    /// Get the human-readable message carried by this error
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidArgument(msg)
            | Error::IndexOutOfRange(msg)
            | Error::NotPermitted(msg)
            | Error::RangeError(msg)
            | Error::FormatError(msg)
            | Error::ExhaustedCapacity(msg)
            | Error::TypeMismatch(msg)
            | Error::NotFound(msg)
            | Error::BackendError(msg) => msg,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::IndexOutOfRange(msg) => write!(f, "Index out of range: {}", msg),
            Error::NotPermitted(msg) => write!(f, "Not permitted: {}", msg),
            Error::RangeError(msg) => write!(f, "Range error: {}", msg),
            Error::FormatError(msg) => write!(f, "Format error: {}", msg),
            Error::ExhaustedCapacity(msg) => write!(f, "Exhausted capacity: {}", msg),
            Error::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR and build the matching [`Error`] variant
///
/// # Example
///
/// ```ignore
/// let err = engine_err!(NotPermitted, "abyss::RenderPass", "Wrong thread");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($kind:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::abyss::Error::$kind(message)
    }};
}

/// Log an ERROR and return `Err` of the matching [`Error`] variant
///
/// # Example
///
/// ```ignore
/// engine_bail!(InvalidArgument, "abyss::RenderPass", "No subpasses provided");
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($kind:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($kind, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
