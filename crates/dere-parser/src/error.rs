//! Error and diagnostic system for the Dere annotation reader.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled byte spans within the annotation file for rich error context
//! - The file and line each problem was found on
//! - Diagnostic collector for accumulating every fatal line of a document
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single fatal problem with optional error code, source
//! locations, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from [`read_document`](crate::read_document).
//!
//! # Example
//!
//! ```
//! # use dere_parser::error::{Diagnostic, ErrorCode};
//! # use dere_parser::{ByteSpan, Location};
//!
//! let diag = Diagnostic::error("tag `T3` is defined more than once")
//!     .with_code(ErrorCode::E100)
//!     .with_location(Location::new("PMID-1.a2", 4))
//!     .with_label(ByteSpan::new(120..122), "duplicate definition")
//!     .with_secondary_label(ByteSpan::new(40..42), "first defined here")
//!     .with_help("tags must be unique across both annotation files");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
