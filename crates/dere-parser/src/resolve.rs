//! Turning raw records into spans and frames.
//!
//! Spans are anchored first, then frames are resolved in two passes: every
//! kept event gets an empty frame before any slot is filled, so fillers may
//! name events defined later in the namespace.

use std::collections::HashMap;

use log::debug;

use dere_core::{
    corpus::{AnnotationGraph, Document, Filler, Frame, FrameId, Span, SpanId},
    schema::{FRAME_PREFIX, SPAN_PREFIX, TaskSchema, TypeDef},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    records::{Event, RecordSet},
    segment::{self, Segment},
    stats::{SkipReason, SkipStats},
};

/// Resolved fillers of one document by tag.
pub type TagTable<'a> = HashMap<&'a str, Filler>;

fn skip(stats: &mut SkipStats, reason: SkipReason, tag: &str) {
    debug!(tag, reason:%; "Skipping annotation");
    stats.record(reason);
}

/// Anchor every text-bound record in the instance containing it.
///
/// Records whose type is not a span type, or that lie outside every
/// instance, are skipped. Resolved spans are entered into `tags`.
///
/// # Errors
///
/// Returns [`ParseError`] with one diagnostic per span whose recorded text
/// differs from the instance text at its offsets.
pub fn resolve_spans<'a>(
    records: &RecordSet<'a>,
    segments: &mut [Segment],
    schema: &dyn TaskSchema,
    tags: &mut TagTable<'a>,
    stats: &mut SkipStats,
) -> Result<(), ParseError> {
    let mut diagnostics = DiagnosticCollector::new();

    for record in records.text_bounds() {
        let span_type = match schema.type_lookup(&format!("{SPAN_PREFIX}:{}", record.type_name)) {
            Some(TypeDef::Span(span_type)) => span_type,
            _ => {
                skip(stats, SkipReason::SpanType, record.tag);
                continue;
            }
        };

        let Some(index) = segment::owning_segment(segments, record.left, record.right) else {
            skip(stats, SkipReason::OutsideInstances, record.tag);
            continue;
        };
        let segment = &mut segments[index];
        let left = record.left - segment.left();
        let right = record.right - segment.left();

        let span = Span::new(span_type, left, right, record.text);
        match segment.instance_mut().add_span(span) {
            Ok(position) => {
                tags.insert(record.tag, Filler::Span(SpanId::new(index, position)));
            }
            Err(err) => diagnostics.emit(
                Diagnostic::error(format!("text of span `{}` does not match the document", record.tag))
                    .with_code(ErrorCode::E200)
                    .with_location(records.location(&record.origin))
                    .with_label(record.origin.span, err.to_string())
                    .with_help("offsets count characters from the start of the text file"),
            ),
        }
    }

    diagnostics.finish()
}

/// First frame pass: allocate an empty frame for every event whose type is
/// a frame type, and enter it into `tags`.
///
/// Returns the kept events with the handles of their frames.
pub fn instantiate_frames<'a, 'r>(
    records: &'r RecordSet<'a>,
    document: &mut Document,
    schema: &dyn TaskSchema,
    tags: &mut TagTable<'a>,
    stats: &mut SkipStats,
) -> Vec<(FrameId, &'r Event<'a>)> {
    let mut kept = Vec::with_capacity(records.events().len());

    for event in records.events() {
        match schema.type_lookup(&format!("{FRAME_PREFIX}:{}", event.type_name)) {
            Some(TypeDef::Frame(frame_type)) => {
                let id = document.push_frame(Frame::new(frame_type));
                tags.insert(event.tag, Filler::Frame(id));
                kept.push((id, event));
            }
            _ => skip(stats, SkipReason::FrameType, event.tag),
        }
    }

    kept
}

/// Second frame pass: fill the slots of every kept frame.
///
/// A pair is skipped when its slot is not declared by the frame type, its
/// filler did not resolve, or the slot does not allow the filler's type.
/// The head `Type:Trigger` pair only fills a slot of the same name, and is
/// not counted when there is none.
pub fn fill_slots(
    kept: &[(FrameId, &Event<'_>)],
    document: &mut Document,
    tags: &TagTable<'_>,
    stats: &mut SkipStats,
) {
    for (id, event) in kept {
        let Some(frame_type) = document.frame(*id).map(|frame| frame.frame_type().clone()) else {
            continue;
        };

        for (position, role) in event.roles.iter().enumerate() {
            let Some(slot) = frame_type.slot_type_lookup(role.name) else {
                if position > 0 {
                    skip(stats, SkipReason::UnknownSlot, event.tag);
                }
                continue;
            };
            let Some(filler) = tags.get(role.filler).copied() else {
                skip(stats, SkipReason::UnresolvedFiller, event.tag);
                continue;
            };
            let allowed = document
                .filler_type(filler)
                .is_some_and(|type_ref| slot.allows(type_ref));
            if !allowed {
                skip(stats, SkipReason::DisallowedFiller, event.tag);
                continue;
            }

            let slot_name = slot.name();
            if let Some(frame) = document.frame_mut(*id) {
                frame.add_filler(slot_name, filler);
            }
        }
    }
}
