//! Labeled byte spans for diagnostic messages.

use crate::source::ByteSpan;

/// A labeled span in an annotation file.
///
/// - **Primary labels** mark the offending text.
/// - **Secondary labels** add context, such as "first defined here".
#[derive(Debug, Clone)]
pub struct Label {
    span: ByteSpan,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: ByteSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: ByteSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> ByteSpan {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
