//! Error codes for the Dere diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Record grammar errors
//! - `E1xx` - Tag namespace errors
//! - `E2xx` - Resolution errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Record Grammar Errors (E0xx)
    // =========================================================================
    /// Malformed text-bound annotation.
    ///
    /// A `T` line must have exactly three tab-separated fields, and its
    /// middle field must be `Type Left Right` with integer offsets.
    E001,

    /// Malformed event annotation.
    ///
    /// An `E` line must have a tag, a tab, and at least one `Type:Trigger`
    /// pair. Every role pair needs a colon.
    E002,

    /// Invalid span offsets.
    ///
    /// The left offset of a text-bound annotation is past its right offset.
    E003,

    /// Missing event trigger.
    ///
    /// The head pair of an event line has an empty trigger tag.
    E004,

    // =========================================================================
    // Tag Namespace Errors (E1xx)
    // =========================================================================
    /// Duplicate tag.
    ///
    /// The same tag is defined twice among the annotation files of one
    /// document.
    E100,

    /// Undefined trigger.
    ///
    /// An event names a trigger tag that no record of the document defines.
    E101,

    /// Undefined filler reference.
    ///
    /// An event role names a `T` or `E` tag that no record of the document
    /// defines.
    E102,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Span text mismatch.
    ///
    /// The text recorded in a `T` line differs from the document text at its
    /// offsets.
    E200,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Record grammar errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            // Tag namespace errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Resolution errors
            ErrorCode::E200 => "E200",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            // Record grammar errors
            ErrorCode::E001 => "malformed text-bound annotation",
            ErrorCode::E002 => "malformed event annotation",
            ErrorCode::E003 => "invalid span offsets",
            ErrorCode::E004 => "missing event trigger",
            // Tag namespace errors
            ErrorCode::E100 => "duplicate tag",
            ErrorCode::E101 => "undefined trigger",
            ErrorCode::E102 => "undefined filler reference",
            // Resolution errors
            ErrorCode::E200 => "span text mismatch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
