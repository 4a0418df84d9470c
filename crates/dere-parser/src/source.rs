//! In-memory inputs of one document and positions within them.

use std::{
    fmt,
    ops::Range,
    path::{Path, PathBuf},
    sync::Arc,
};

/// A byte range within one annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteSpan {
    start: usize,
    end: usize,
}

impl ByteSpan {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span by `offset` bytes.
    pub fn offset(&self, offset: usize) -> Self {
        Self::new(self.start + offset..self.end + offset)
    }
}

/// A 1-based line in a named annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: PathBuf,
    line: usize,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// The contents of one annotation file.
#[derive(Debug, Clone)]
pub struct AnnotationSource {
    path: PathBuf,
    content: String,
}

impl AnnotationSource {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Everything needed to ingest one document: its text and the annotation
/// files that share its tag namespace, base file first.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    id: Arc<str>,
    text: String,
    annotations: Vec<AnnotationSource>,
}

impl DocumentSource {
    pub fn new(id: impl Into<Arc<str>>, text: impl Into<String>, base: AnnotationSource) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            annotations: vec![base],
        }
    }

    /// Add a further annotation file to the document's namespace.
    pub fn with_annotations(mut self, source: AnnotationSource) -> Self {
        self.annotations.push(source);
        self
    }

    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[AnnotationSource] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_span() {
        let span = ByteSpan::new(3..7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert_eq!(span.offset(10), ByteSpan::new(13..17));
        assert!(ByteSpan::default().is_empty());
    }

    #[test]
    fn test_location_display() {
        let location = Location::new("corpus/PMID-1.a1", 12);
        assert_eq!(location.to_string(), "corpus/PMID-1.a1:12");
    }

    #[test]
    fn test_document_source_keeps_file_order() {
        let source = DocumentSource::new("d", "text\n", AnnotationSource::new("d.a1", ""))
            .with_annotations(AnnotationSource::new("d.a2", "E1\tX:T1"));

        let paths: Vec<_> = source
            .annotations()
            .iter()
            .map(|a| a.path().to_path_buf())
            .collect();
        assert_eq!(paths, [PathBuf::from("d.a1"), PathBuf::from("d.a2")]);
        assert_eq!(source.id().as_ref(), "d");
    }
}
