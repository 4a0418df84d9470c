//! # Dere Parser
//!
//! Reader for stand-off annotated documents. This crate turns the text of a
//! document and its annotation files into a resolved
//! [`Document`](dere_core::corpus::Document); it performs no I/O.
//!
//! ## Usage
//!
//! ```
//! # use dere_core::{corpus::AnnotationGraph, schema::TaskSpec};
//! # use dere_parser::{AnnotationSource, DocumentSource, ReaderConfig, read_document};
//!
//! let spec = TaskSpec::builder()
//!     .span("Protein")
//!     .frame("Activation", [("Theme", ["Protein"])])
//!     .build()
//!     .unwrap();
//!
//! let source = DocumentSource::new(
//!     "doc1",
//!     "Alice activates Bob.\n",
//!     AnnotationSource::new("doc1.a1", "T1\tProtein 0 5\tAlice\nT2\tProtein 16 19\tBob\n"),
//! )
//! .with_annotations(AnnotationSource::new("doc1.a2", "E1\tActivation:T1 Theme:T2\n"));
//!
//! let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
//! assert_eq!(outcome.document.frames().len(), 1);
//! ```

pub mod closure;
pub mod error;
pub mod records;
pub mod resolve;
pub mod segment;
mod source;
mod stats;

pub use error::ParseError;
pub use source::{AnnotationSource, ByteSpan, DocumentSource, Location};
pub use stats::{SkipReason, SkipStats};

use log::{debug, info, trace};

use dere_core::{
    corpus::{AnnotationGraph, ClosureStrategy, Document},
    schema::TaskSchema,
};

use segment::Segment;

/// Options for reading one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    closure: ClosureStrategy,
}

impl ReaderConfig {
    pub fn new(closure: ClosureStrategy) -> Self {
        Self { closure }
    }

    pub fn closure(&self) -> ClosureStrategy {
        self.closure
    }
}

/// A resolved document and the records dropped while reading it.
#[derive(Debug)]
pub struct ReadOutcome {
    pub document: Document,
    pub stats: SkipStats,
}

/// Read one document.
///
/// The pipeline runs strictly in order:
///
/// 1. **Segment** - Split the text into line instances
/// 2. **Parse** - Scan every annotation file into one tag namespace
/// 3. **Anchor spans** - Place text-bound records in their instances
/// 4. **Allocate frames** - Create an empty frame per kept event
/// 5. **Fill slots** - Resolve role fillers against spans and frames
/// 6. **Close** - Attach to each instance the frames reachable from its spans
///
/// # Errors
///
/// Returns [`ParseError`] with every fatal diagnostic found in the stage
/// that failed; nothing of the document is returned in that case.
pub fn read_document(
    source: &DocumentSource,
    schema: &dyn TaskSchema,
    config: ReaderConfig,
) -> Result<ReadOutcome, ParseError> {
    info!(doc_id = source.id().as_ref(); "Reading document");
    let mut stats = SkipStats::new();

    let mut segments = segment::segment(source.id(), source.text());
    debug!(instances = segments.len(); "Segmented document text");

    let records = records::parse_records(source.annotations(), &mut stats)?;

    let mut tags = resolve::TagTable::new();
    resolve::resolve_spans(&records, &mut segments, schema, &mut tags, &mut stats)?;

    let instances = segments.into_iter().map(Segment::into_instance).collect();
    let mut document = Document::new(source.id().clone(), instances);

    let kept = resolve::instantiate_frames(&records, &mut document, schema, &mut tags, &mut stats);
    resolve::fill_slots(&kept, &mut document, &tags, &mut stats);
    debug!(frames = document.frames().len(); "Resolved frames");

    closure::propagate(&mut document, config.closure);
    trace!(document:?; "Resolved document");

    Ok(ReadOutcome { document, stats })
}
