//! The core diagnostic type for the Dere error system.
//!
//! A [`Diagnostic`] represents a single fatal problem with optional
//! error code, the annotation file line it was raised for, multiple labeled
//! byte spans, and help text.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    source::{ByteSpan, Location},
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// PMID-10.a1:3: error[E001]: malformed text-bound annotation
///    |
///  3 | T3	Protein 12	IL-2
///    |   ^^^^^^^^^^ expected `Type Left Right`
///    |
///    = help: the middle field holds a type name and two character offsets
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    location: Option<Location>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use dere_parser::error::{Diagnostic, ErrorCode};
    /// # use dere_parser::ByteSpan;
    ///
    /// let diag = Diagnostic::error("trigger `T9` is not defined")
    ///     .with_code(ErrorCode::E101)
    ///     .with_label(ByteSpan::new(11..13), "not found");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            location: None,
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the annotation file and line, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the annotation file and line.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: ByteSpan, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: ByteSpan, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "path:line: error[E001]: message" or "error: message"
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        f.write_str("error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
