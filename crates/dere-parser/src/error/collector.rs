//! Collector for accumulating diagnostics during a reader pass.
//!
//! The [`DiagnosticCollector`] lets a pass report every bad line of a
//! document instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a reader pass.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection, failing with every emitted diagnostic if there
    /// was any.
    ///
    /// Skipped records are not diagnostics; they are counted in
    /// [`SkipStats`](crate::SkipStats).
    pub fn finish(self) -> Result<(), ParseError> {
        if !self.diagnostics.is_empty() {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, source::ByteSpan};

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_finish_with_errors() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::error("test error")
                .with_code(ErrorCode::E001)
                .with_label(ByteSpan::new(10..20), "here"),
        );
        collector.emit(Diagnostic::error("second error"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "test error");
    }
}
