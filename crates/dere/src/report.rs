//! Summary of a corpus load.

use dere_core::corpus::{AnnotationGraph, Corpus};
use dere_parser::SkipStats;

/// Counts describing a loaded corpus and what was skipped reading it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    documents: usize,
    instances: usize,
    spans: usize,
    frames: usize,
    shared_frames: usize,
    skips: SkipStats,
}

impl LoadReport {
    pub fn new(corpus: &Corpus, skips: SkipStats) -> Self {
        Self {
            documents: corpus.documents().count(),
            instances: corpus.instances().len(),
            spans: corpus.span_count(),
            frames: corpus.frames().len(),
            shared_frames: corpus.shared_frame_count(),
            skips,
        }
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn instances(&self) -> usize {
        self.instances
    }

    pub fn spans(&self) -> usize {
        self.spans
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frames that appear in the closure of more than one instance.
    pub fn shared_frames(&self) -> usize {
        self.shared_frames
    }

    pub fn skips(&self) -> &SkipStats {
        &self.skips
    }
}
