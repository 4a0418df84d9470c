//! Frame closure of instances.
//!
//! The closure of an instance is every frame reachable from one of its spans
//! by following slot fillers, transitively through other frames. Two
//! strategies compute it and always agree on the resulting set:
//!
//! - [`ClosureStrategy::Indexed`] builds a filler → dependent-frame graph
//!   once per document and walks it breadth-first from each instance's spans.
//! - [`ClosureStrategy::Fixpoint`] rescans the whole frame arena until a
//!   scan connects nothing new.
//!
//! A frame whose fillers sit in several instances belongs to the closure of
//! each of them.

use std::collections::{HashSet, VecDeque};

use log::debug;
use petgraph::graphmap::DiGraphMap;

use dere_core::corpus::{AnnotationGraph, ClosureStrategy, Document, Filler, FrameId, SpanId};

/// Edges from each filler to the frames that hold it in a slot.
#[derive(Debug, Default)]
pub struct FillerIndex {
    graph: DiGraphMap<Filler, ()>,
}

impl FillerIndex {
    pub fn new(graph: &impl AnnotationGraph) -> Self {
        let mut index = DiGraphMap::new();
        for (position, frame) in graph.frames().iter().enumerate() {
            let dependent = Filler::Frame(FrameId::new(position));
            for filler in frame.fillers() {
                index.add_edge(filler, dependent, ());
            }
        }
        Self { graph: index }
    }

    /// Frames reachable from `spans`, in breadth-first discovery order.
    pub fn closure(&self, spans: impl IntoIterator<Item = SpanId>) -> Vec<FrameId> {
        let mut queue: VecDeque<Filler> = spans.into_iter().map(Filler::Span).collect();
        let mut seen = HashSet::new();
        let mut connected = Vec::new();

        while let Some(filler) = queue.pop_front() {
            for dependent in self.graph.neighbors(filler) {
                if let Filler::Frame(id) = dependent {
                    if seen.insert(id) {
                        connected.push(id);
                        queue.push_back(dependent);
                    }
                }
            }
        }

        connected
    }
}

/// Frames reachable from `spans` by repeated scans of the frame arena, in
/// the order the scans connect them.
pub fn fixpoint_closure(
    graph: &impl AnnotationGraph,
    spans: impl IntoIterator<Item = SpanId>,
) -> Vec<FrameId> {
    let mut target: HashSet<Filler> = spans.into_iter().map(Filler::Span).collect();
    let mut connected = Vec::new();

    let mut updated = true;
    while updated {
        updated = false;
        for (position, frame) in graph.frames().iter().enumerate() {
            let id = FrameId::new(position);
            if target.contains(&Filler::Frame(id)) {
                continue;
            }
            if frame.fillers().any(|filler| target.contains(&filler)) {
                target.insert(Filler::Frame(id));
                connected.push(id);
                updated = true;
            }
        }
    }

    connected
}

/// Handles of every span in instance `instance`.
pub fn instance_spans(graph: &impl AnnotationGraph, instance: usize) -> Vec<SpanId> {
    graph
        .instances()
        .get(instance)
        .map(|inst| {
            (0..inst.spans().len())
                .map(|index| SpanId::new(instance, index))
                .collect()
        })
        .unwrap_or_default()
}

/// Attach to every instance of `document` the frames in its closure.
pub fn propagate(document: &mut Document, strategy: ClosureStrategy) {
    let graph: &Document = document;
    let closures: Vec<Vec<FrameId>> = match strategy {
        ClosureStrategy::Indexed => {
            let index = FillerIndex::new(graph);
            (0..graph.instances().len())
                .map(|instance| index.closure(instance_spans(graph, instance)))
                .collect()
        }
        ClosureStrategy::Fixpoint => (0..graph.instances().len())
            .map(|instance| fixpoint_closure(graph, instance_spans(graph, instance)))
            .collect(),
    };

    for (instance, frames) in document.instances_mut().iter_mut().zip(closures) {
        instance.extend_frames(frames);
    }

    debug!(
        doc_id = document.id(),
        strategy:%,
        shared_frames = document.shared_frame_count();
        "Propagated frame closures"
    );
}
