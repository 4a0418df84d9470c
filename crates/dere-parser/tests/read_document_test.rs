//! End-to-end tests of the single-document reader.

use std::path::Path;

use dere_core::{
    corpus::{AnnotationGraph, ClosureStrategy, Filler, FrameId, SpanId},
    schema::TaskSpec,
};
use dere_parser::{
    AnnotationSource, DocumentSource, ReaderConfig, SkipReason, error::ErrorCode, read_document,
};

fn genia() -> TaskSpec {
    TaskSpec::builder()
        .span("Protein")
        .frame("Activation", [("Theme", vec!["Protein"])])
        .frame("Binding", [("Theme", vec!["Protein"])])
        .frame(
            "Positive_regulation",
            [
                ("Theme", vec!["Protein", "Binding", "Positive_regulation"]),
                ("Cause", vec!["Protein"]),
            ],
        )
        .build()
        .unwrap()
}

fn source(text: &str, a1: &str, a2: Option<&str>) -> DocumentSource {
    let source = DocumentSource::new("PMID-1", text, AnnotationSource::new("PMID-1.a1", a1));
    match a2 {
        Some(a2) => source.with_annotations(AnnotationSource::new("PMID-1.a2", a2)),
        None => source,
    }
}

#[test]
fn test_round_trip_single_instance() {
    let spec = genia();
    let source = source(
        "Alice activates Bob.\n",
        "T1\tProtein 0 5\tAlice\nT2\tProtein 16 19\tBob\n",
        Some("E1\tActivation:T1 Theme:T2\n"),
    );

    let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
    let document = &outcome.document;

    assert_eq!(document.instances().len(), 1);
    let instance = &document.instances()[0];
    let spans: Vec<_> = instance
        .spans()
        .iter()
        .map(|s| (s.text(), s.left(), s.right()))
        .collect();
    assert_eq!(spans, [("Alice", 0, 5), ("Bob", 16, 19)]);

    assert_eq!(document.frames().len(), 1);
    let frame = &document.frames()[0];
    assert_eq!(frame.frame_type().name(), "Activation");
    let theme: Vec<_> = frame.slot("Theme").unwrap().iter().copied().collect();
    assert_eq!(theme, [Filler::Span(SpanId::new(0, 1))]);

    // Reachable through the Theme filler, not through the trigger.
    assert_eq!(instance.frame_ids(), [FrameId::new(0)]);
    assert!(outcome.stats.is_empty());
}

#[test]
fn test_trigger_alone_does_not_connect() {
    let spec = genia();
    let source = source(
        "Alice activates.\nBob\n",
        "T1\tProtein 0 5\tAlice\nT2\tProtein 17 20\tBob\n",
        Some("E1\tActivation:T1 Theme:T2\n"),
    );

    let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
    let instances = outcome.document.instances();
    assert!(instances[0].frame_ids().is_empty());
    assert_eq!(instances[1].frame_ids(), [FrameId::new(0)]);
}

#[test]
fn test_forward_reference_resolves() {
    let spec = genia();
    let source = source(
        "IL-2 binds p50 and induces it\n",
        "T1\tProtein 0 4\tIL-2\nT2\tProtein 11 14\tp50\n",
        Some("E2\tPositive_regulation:T1 Theme:E1 Cause:T1\nE1\tBinding:T1 Theme:T2\n"),
    );

    for strategy in [ClosureStrategy::Indexed, ClosureStrategy::Fixpoint] {
        let outcome = read_document(&source, &spec, ReaderConfig::new(strategy)).unwrap();
        let document = &outcome.document;

        let regulation = &document.frames()[0];
        let theme: Vec<_> = regulation.slot("Theme").unwrap().iter().copied().collect();
        assert_eq!(theme, [Filler::Frame(FrameId::new(1))]);

        let mut closure = document.instances()[0].frame_ids().to_vec();
        closure.sort();
        assert_eq!(closure, [FrameId::new(0), FrameId::new(1)]);
    }
}

#[test]
fn test_multi_file_namespace() {
    let spec = genia();
    let source = source(
        "p50 binds.\n",
        "T1\tProtein 0 3\tp50\n",
        Some("T2\tBinding 4 9\tbinds\nE1\tBinding:T2 Theme:T1\n"),
    );

    let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
    let frame = &outcome.document.frames()[0];
    assert_eq!(frame.slot("Theme").unwrap().len(), 1);
    assert_eq!(outcome.stats.count(SkipReason::SpanType), 1);
}

#[test]
fn test_malformed_text_bound_names_file_and_line() {
    let spec = genia();
    let source = source(
        "Alice activates Bob.\n",
        "T1\tProtein 0 5\tAlice\nT2\tProtein 16 19\n",
        None,
    );

    let err = read_document(&source, &spec, ReaderConfig::default()).unwrap_err();
    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E001));
    let location = diag.location().unwrap();
    assert_eq!(location.path(), Path::new("PMID-1.a1"));
    assert_eq!(location.line(), 2);
}

#[test]
fn test_unicode_offsets_count_characters() {
    let spec = genia();
    let source = source(
        "α-synuclein binds β-actin\nIκBα\n",
        "T1\tProtein 0 11\tα-synuclein\nT2\tProtein 18 25\tβ-actin\nT3\tProtein 26 30\tIκBα\n",
        None,
    );

    let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
    let instances = outcome.document.instances();
    assert_eq!(instances[0].spans()[1].text(), "β-actin");
    assert_eq!(instances[1].spans()[0].left(), 0);
    assert_eq!(instances[1].spans()[0].right(), 4);
}

#[test]
fn test_unresolved_filler_fails_whole_document() {
    let spec = genia();
    let source = source(
        "Alice activates Bob.\n",
        "T1\tProtein 0 5\tAlice\n",
        Some("E1\tActivation:T1 Theme:T2\n"),
    );

    let err = read_document(&source, &spec, ReaderConfig::default()).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
}

#[test]
fn test_text_without_trailing_newline() {
    let spec = genia();
    let source = source("Alice\nBob", "T1\tProtein 6 9\tBob\n", None);

    let outcome = read_document(&source, &spec, ReaderConfig::default()).unwrap();
    let instances = outcome.document.instances();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[1].text(), "Bob");
    assert_eq!(instances[1].spans()[0].text(), "Bob");
}
