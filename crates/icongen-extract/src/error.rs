//! Error types for the icongen-extract crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for icon extraction operations.
///
/// Only the two fatal conditions (the diagrams library cannot be located,
/// or the traversal produced zero records) plus output I/O and
/// serialization failures surface here. Per-provider and per-module
/// failures are contained at the unit that caused them and logged, never
/// propagated.
#[derive(Debug)]
pub struct ExtractError {
    kind: ExtractErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods instead.
#[derive(Debug)]
pub(crate) enum ExtractErrorKind {
    /// The diagrams package could not be located on this system.
    LibraryNotFound(String),
    /// Traversal completed but produced zero icon records.
    NoIcons,
    /// I/O error when reading the library tree or writing output.
    Io(std::io::Error),
    /// Failed to serialize output to JSON.
    Serialization(serde_json::Error),
}

impl ExtractError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: ExtractErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates the fatal "missing dependency" error.
    pub(crate) fn library_not_found(detail: impl Into<String>) -> Self {
        Self::new(ExtractErrorKind::LibraryNotFound(detail.into()))
    }

    /// Creates the fatal "empty result" error.
    pub(crate) fn no_icons() -> Self {
        Self::new(ExtractErrorKind::NoIcons)
    }

    /// Returns true if this error is due to the diagrams library being
    /// missing or unimportable.
    pub fn is_library_not_found(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::LibraryNotFound(_))
    }

    /// Returns true if this error is due to an empty extraction result.
    pub fn is_no_icons(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::NoIcons)
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::Io(_))
    }

    /// Returns true if this error is due to serialization failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::Serialization(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractErrorKind::LibraryNotFound(detail) => {
                write!(
                    f,
                    "diagrams package not found ({detail}). \
                     Install with: pip install diagrams"
                )
            }
            ExtractErrorKind::NoIcons => {
                write!(f, "no icons extracted from the diagrams library")
            }
            ExtractErrorKind::Io(err) => {
                write!(f, "I/O error: {err}")
            }
            ExtractErrorKind::Serialization(err) => {
                write!(f, "failed to serialize output: {err}")
            }
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExtractErrorKind::LibraryNotFound(_) => None,
            ExtractErrorKind::NoIcons => None,
            ExtractErrorKind::Io(err) => Some(err),
            ExtractErrorKind::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ExtractErrorKind::Io(err))
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ExtractErrorKind::Serialization(err))
    }
}
