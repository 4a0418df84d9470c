//! Corpus data model.
//!
//! These types are the resolved output of the reader: documents split into
//! [`Instance`]s, each holding the [`Span`]s anchored in its text and the
//! handles of the [`Frame`]s reachable from those spans.
//!
//! # Ownership
//!
//! ```text
//! Corpus / Document
//!   ├── instances: Vec<Instance>          (own their spans)
//!   │       ├── spans:  Vec<Span>         addressed by SpanId { instance, index }
//!   │       └── frames: Vec<FrameId>      closure, handles into the arena
//!   └── frames: Vec<Frame>                arena, addressed by FrameId
//!           └── slots: Filler = Span(SpanId) | Frame(FrameId)
//! ```
//!
//! A frame reachable from several instances is stored once and referenced by
//! each of them. Documents are resolved in their own id space and rebased
//! when appended to a [`Corpus`].

use std::{fmt, str::FromStr, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    identifier::Id,
    schema::{FrameType, SpanType, TypeRef},
};

/// Handle of a span: the owning instance and the span's position in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId {
    instance: usize,
    index: usize,
}

impl SpanId {
    pub fn new(instance: usize, index: usize) -> Self {
        Self { instance, index }
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle of a frame in the frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// The value occupying a frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Filler {
    Span(SpanId),
    Frame(FrameId),
}

impl Filler {
    fn rebase(self, instance_offset: usize, frame_offset: usize) -> Self {
        match self {
            Filler::Span(id) => Filler::Span(SpanId::new(id.instance + instance_offset, id.index)),
            Filler::Frame(id) => Filler::Frame(FrameId(id.0 + frame_offset)),
        }
    }
}

/// Violations of the span/instance text invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    #[error("span [{left}, {right}) does not fit in an instance of {len} characters")]
    OutOfBounds {
        left: usize,
        right: usize,
        len: usize,
    },

    #[error("span text {recorded:?} does not match instance text {actual:?}")]
    TextMismatch { recorded: String, actual: String },
}

/// A typed text annotation with instance-local character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    span_type: Arc<SpanType>,
    left: usize,
    right: usize,
    text: String,
}

impl Span {
    pub fn new(span_type: Arc<SpanType>, left: usize, right: usize, text: impl Into<String>) -> Self {
        Self {
            span_type,
            left,
            right,
            text: text.into(),
        }
    }

    pub fn span_type(&self) -> &Arc<SpanType> {
        &self.span_type
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A typed relational annotation whose slots hold spans and other frames.
#[derive(Debug, Clone)]
pub struct Frame {
    frame_type: Arc<FrameType>,
    slots: IndexMap<Id, IndexSet<Filler>>,
}

impl Frame {
    /// Create a frame with one empty filler set per declared slot.
    pub fn new(frame_type: Arc<FrameType>) -> Self {
        let slots = frame_type
            .slot_types()
            .map(|slot| (slot.name(), IndexSet::new()))
            .collect();
        Self { frame_type, slots }
    }

    pub fn frame_type(&self) -> &Arc<FrameType> {
        &self.frame_type
    }

    /// Fillers of the slot named `name`, or `None` if the frame type does not
    /// declare it.
    pub fn slot(&self, name: &str) -> Option<&IndexSet<Filler>> {
        Id::lookup(name).and_then(|id| self.slots.get(&id))
    }

    /// All slots with their fillers, in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (Id, &IndexSet<Filler>)> {
        self.slots.iter().map(|(name, fillers)| (*name, fillers))
    }

    /// Every filler of every slot.
    pub fn fillers(&self) -> impl Iterator<Item = Filler> + '_ {
        self.slots.values().flatten().copied()
    }

    /// Add `filler` to the slot named `slot`.
    ///
    /// Returns `false` if the slot is not declared on this frame's type or
    /// already holds the filler.
    pub fn add_filler(&mut self, slot: Id, filler: Filler) -> bool {
        self.slots
            .get_mut(&slot)
            .is_some_and(|fillers| fillers.insert(filler))
    }

    fn rebase(&mut self, instance_offset: usize, frame_offset: usize) {
        for fillers in self.slots.values_mut() {
            *fillers = fillers
                .iter()
                .map(|filler| filler.rebase(instance_offset, frame_offset))
                .collect();
        }
    }
}

/// One document sub-unit (a physical line of the source text).
#[derive(Debug, Clone)]
pub struct Instance {
    doc_id: Arc<str>,
    text: String,
    char_len: usize,
    spans: Vec<Span>,
    frames: Vec<FrameId>,
}

impl Instance {
    pub fn new(doc_id: Arc<str>, text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            doc_id,
            text,
            char_len,
            spans: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Id of the document this instance was cut from.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Handles of the frames in this instance's closure, in discovery order.
    pub fn frame_ids(&self) -> &[FrameId] {
        &self.frames
    }

    /// Slice the text by character offsets.
    pub fn slice(&self, left: usize, right: usize) -> Option<&str> {
        if left > right || right > self.char_len {
            return None;
        }
        let start = self.byte_offset(left)?;
        let end = self.byte_offset(right)?;
        self.text.get(start..end)
    }

    /// Append a span after checking it against this instance's text.
    ///
    /// Returns the index of the span within the instance.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError`] if the offsets exceed the text or the recorded
    /// span text differs from the text at those offsets.
    pub fn add_span(&mut self, span: Span) -> Result<usize, SpanError> {
        let actual = self
            .slice(span.left, span.right)
            .ok_or(SpanError::OutOfBounds {
                left: span.left,
                right: span.right,
                len: self.char_len,
            })?;
        if actual != span.text {
            return Err(SpanError::TextMismatch {
                recorded: span.text,
                actual: actual.to_string(),
            });
        }

        self.spans.push(span);
        Ok(self.spans.len() - 1)
    }

    /// Append frames to this instance's closure, skipping ones already present.
    pub fn extend_frames(&mut self, frames: impl IntoIterator<Item = FrameId>) {
        for frame in frames {
            if !self.frames.contains(&frame) {
                self.frames.push(frame);
            }
        }
    }

    fn byte_offset(&self, chars: usize) -> Option<usize> {
        if self.char_len == self.text.len() {
            // ASCII text: characters and bytes coincide.
            return Some(chars);
        }
        if chars == self.char_len {
            return Some(self.text.len());
        }
        self.text.char_indices().nth(chars).map(|(byte, _)| byte)
    }
}

/// Read access shared by [`Document`] and [`Corpus`].
pub trait AnnotationGraph {
    fn instances(&self) -> &[Instance];

    fn frames(&self) -> &[Frame];

    fn span(&self, id: SpanId) -> Option<&Span> {
        self.instances().get(id.instance)?.spans.get(id.index)
    }

    fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames().get(id.0)
    }

    /// Runtime type of a filler, as matched against slot constraints.
    fn filler_type(&self, filler: Filler) -> Option<TypeRef> {
        match filler {
            Filler::Span(id) => self.span(id).map(|span| span.span_type.type_ref()),
            Filler::Frame(id) => self.frame(id).map(|frame| frame.frame_type.type_ref()),
        }
    }

    /// Frames in the closure of `instance`.
    fn instance_frames<'a>(&'a self, instance: &'a Instance) -> impl Iterator<Item = &'a Frame> {
        instance.frames.iter().filter_map(|id| self.frame(*id))
    }

    /// Number of frames that appear in more than one instance's closure.
    fn shared_frame_count(&self) -> usize {
        let mut seen = vec![0usize; self.frames().len()];
        for instance in self.instances() {
            for id in &instance.frames {
                if let Some(count) = seen.get_mut(id.0) {
                    *count += 1;
                }
            }
        }
        seen.into_iter().filter(|count| *count > 1).count()
    }
}

/// A single resolved document in its own id space.
#[derive(Debug, Clone)]
pub struct Document {
    id: Arc<str>,
    instances: Vec<Instance>,
    frames: Vec<Frame>,
}

impl Document {
    pub fn new(id: Arc<str>, instances: Vec<Instance>) -> Self {
        Self {
            id,
            instances,
            frames: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Move a frame into the arena and return its handle.
    pub fn push_frame(&mut self, frame: Frame) -> FrameId {
        self.frames.push(frame);
        FrameId(self.frames.len() - 1)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(id.0)
    }

    pub fn instances_mut(&mut self) -> &mut [Instance] {
        &mut self.instances
    }
}

impl AnnotationGraph for Document {
    fn instances(&self) -> &[Instance] {
        &self.instances
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// The aggregate handed to downstream consumers: every instance of every
/// document, in document order, with the frame arena they share.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Arc<str>>,
    instances: Vec<Instance>,
    frames: Vec<Frame>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolved document, rebasing its handles into corpus space.
    pub fn append(&mut self, document: Document) {
        let instance_offset = self.instances.len();
        let frame_offset = self.frames.len();

        self.frames.extend(document.frames.into_iter().map(|mut frame| {
            frame.rebase(instance_offset, frame_offset);
            frame
        }));
        self.instances
            .extend(document.instances.into_iter().map(|mut instance| {
                for id in &mut instance.frames {
                    id.0 += frame_offset;
                }
                instance
            }));
        self.documents.push(document.id);
    }

    /// Ids of the appended documents, in order.
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|id| id.as_ref())
    }

    pub fn span_count(&self) -> usize {
        self.instances.iter().map(|instance| instance.spans.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl AnnotationGraph for Corpus {
    fn instances(&self) -> &[Instance] {
        &self.instances
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// How instance closures are computed.
///
/// Both strategies produce the same set of frames per instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureStrategy {
    /// Breadth-first search over a filler → dependent-frame index.
    #[default]
    Indexed,
    /// Repeated full scans of the frame arena until nothing changes.
    Fixpoint,
}

impl fmt::Display for ClosureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureStrategy::Indexed => f.write_str("indexed"),
            ClosureStrategy::Fixpoint => f.write_str("fixpoint"),
        }
    }
}

impl FromStr for ClosureStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indexed" => Ok(ClosureStrategy::Indexed),
            "fixpoint" => Ok(ClosureStrategy::Fixpoint),
            _ => Err(format!("unknown closure strategy `{s}`")),
        }
    }
}
