//! Line grammar of the stand-off annotation files.
//!
//! All annotation files of a document are scanned into one tag namespace.
//! Two line kinds are modelled:
//!
//! ```text
//! T3	Protein 12 16	IL-2
//! E1	Binding:T7 Theme:T3 Theme2:T4
//! ```
//!
//! Lines are trimmed first and blank lines are ignored. Lines whose tag
//! starts with any other character (attributes, normalizations, relations,
//! comments) are counted as skipped.

use std::{collections::HashMap, ops::Range, path::PathBuf};

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{dec_uint, multispace1},
    combinator::{eof, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _},
    token::take_till,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    source::{AnnotationSource, ByteSpan, Location},
    stats::{SkipReason, SkipStats},
};

/// Where a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Index of the annotation file within the document.
    pub source: usize,
    /// 1-based line number.
    pub line: usize,
    /// Byte range of the trimmed line within the file.
    pub span: ByteSpan,
}

impl Origin {
    /// The first `len` bytes of the line, typically its tag.
    fn head(&self, len: usize) -> ByteSpan {
        ByteSpan::new(self.span.start()..self.span.start() + len)
    }
}

/// A `T` line: a typed span given by absolute character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBound<'a> {
    pub tag: &'a str,
    pub type_name: &'a str,
    pub left: usize,
    pub right: usize,
    pub text: &'a str,
    pub origin: Origin,
}

/// One `Name:Tag` pair of an event line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role<'a> {
    pub name: &'a str,
    pub filler: &'a str,
    /// Byte range of the pair within the file.
    pub span: ByteSpan,
}

/// An `E` line: a typed frame with its trigger and role pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<'a> {
    pub tag: &'a str,
    pub type_name: &'a str,
    pub trigger: &'a str,
    /// Every pair of the line in order, the `Type:Trigger` head first.
    pub roles: Vec<Role<'a>>,
    pub origin: Origin,
}

/// The records of one document's merged tag namespace.
#[derive(Debug)]
pub struct RecordSet<'a> {
    sources: &'a [AnnotationSource],
    text_bounds: Vec<TextBound<'a>>,
    events: Vec<Event<'a>>,
}

impl<'a> RecordSet<'a> {
    pub fn text_bounds(&self) -> &[TextBound<'a>] {
        &self.text_bounds
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    /// File and line a record was read from.
    pub fn location(&self, origin: &Origin) -> Location {
        location(self.sources, origin)
    }
}

fn location(sources: &[AnnotationSource], origin: &Origin) -> Location {
    let path = sources
        .get(origin.source)
        .map_or_else(PathBuf::new, |source| source.path().to_path_buf());
    Location::new(path, origin.line)
}

/// Context attached to grammar failures.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineDiagnostic {
    message: &'static str,
    help: Option<&'static str>,
}

const BOM: char = '\u{feff}';

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LineDiagnostic>>;

const TAB_AFTER_TAG: LineDiagnostic = LineDiagnostic {
    message: "expected a tab after the tag",
    help: Some("a text-bound line has three tab-separated fields: `Tag`, `Type Left Right`, `Text`"),
};

const TYPE_NAME: LineDiagnostic = LineDiagnostic {
    message: "expected a span type name",
    help: None,
};

const OFFSET: LineDiagnostic = LineDiagnostic {
    message: "expected a space and a non-negative character offset",
    help: Some("the middle field must be exactly `Type Left Right`"),
};

const TAB_AFTER_OFFSETS: LineDiagnostic = LineDiagnostic {
    message: "expected a tab after the offsets",
    help: Some("the middle field must be exactly `Type Left Right`, followed by a tab and the span text"),
};

const EXTRA_FIELD: LineDiagnostic = LineDiagnostic {
    message: "unexpected tab in span text",
    help: Some("a text-bound line has exactly three tab-separated fields"),
};

const EVENT_HEAD: LineDiagnostic = LineDiagnostic {
    message: "expected `Type:Trigger` after the tag",
    help: None,
};

struct TextBoundFields<'a> {
    tag: &'a str,
    type_name: &'a str,
    left: usize,
    right: usize,
    offsets: Range<usize>,
    text: &'a str,
}

fn text_bound_fields<'a>(input: &mut Input<'a>) -> IResult<TextBoundFields<'a>> {
    let tag = take_till(1.., '\t').parse_next(input)?;
    '\t'.context(TAB_AFTER_TAG).parse_next(input)?;
    let ((type_name, left, right), offsets) = (
        take_till(1.., [' ', '\t']).context(TYPE_NAME),
        preceded(' ', dec_uint::<_, usize, _>).context(OFFSET),
        preceded(' ', dec_uint::<_, usize, _>).context(OFFSET),
    )
        .with_span()
        .parse_next(input)?;
    '\t'.context(TAB_AFTER_OFFSETS).parse_next(input)?;
    let text = take_till(0.., '\t').parse_next(input)?;
    eof.context(EXTRA_FIELD).parse_next(input)?;

    Ok(TextBoundFields {
        tag,
        type_name,
        left,
        right,
        offsets,
        text,
    })
}

fn event_fields<'a>(input: &mut Input<'a>) -> IResult<(&'a str, Vec<(&'a str, Range<usize>)>)> {
    let tag = take_till(1.., |c: char| c.is_whitespace()).parse_next(input)?;
    let tokens: Vec<(&str, Range<usize>)> = repeat(
        1..,
        preceded(
            multispace1,
            take_till(1.., |c: char| c.is_whitespace()).with_span(),
        ),
    )
    .context(EVENT_HEAD)
    .parse_next(input)?;
    eof.parse_next(input)?;

    Ok((tag, tokens))
}

/// A trimmed, non-blank line of an annotation file.
struct Line<'a> {
    text: &'a str,
    origin: Origin,
}

impl Line<'_> {
    fn location(&self, sources: &[AnnotationSource]) -> Location {
        location(sources, &self.origin)
    }

    fn span(&self, range: Range<usize>) -> ByteSpan {
        ByteSpan::new(range).offset(self.origin.span.start())
    }
}

/// Scanner state for one document's namespace.
struct Scanner<'a> {
    sources: &'a [AnnotationSource],
    text_bounds: Vec<TextBound<'a>>,
    events: Vec<Event<'a>>,
    defined: HashMap<&'a str, Origin>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Scanner<'a> {
    fn new(sources: &'a [AnnotationSource]) -> Self {
        Self {
            sources,
            text_bounds: Vec::new(),
            events: Vec::new(),
            defined: HashMap::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn scan(&mut self, stats: &mut SkipStats) {
        let sources: &'a [AnnotationSource] = self.sources;
        for (index, source) in sources.iter().enumerate() {
            for line in lines(index, source.content()) {
                match line.text.chars().next() {
                    Some('T') => self.text_bound(&line),
                    Some('E') => self.event(&line),
                    _ => {
                        debug!(
                            path:% = source.path().display(),
                            line = line.origin.line;
                            "Skipping unmodelled annotation line"
                        );
                        stats.record(SkipReason::UnmodelledLine);
                    }
                }
            }
        }
    }

    fn text_bound(&mut self, line: &Line<'a>) {
        let mut input = LocatingSlice::new(line.text);
        let fields = match text_bound_fields(&mut input) {
            Ok(fields) => fields,
            Err(err) => {
                let error_pos = input.current_token_start();
                self.grammar_error(line, ErrorCode::E001, err, error_pos);
                return;
            }
        };

        if fields.left > fields.right {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "span `{}` starts at {} after its end {}",
                    fields.tag, fields.left, fields.right
                ))
                .with_code(ErrorCode::E003)
                .with_location(line.location(self.sources))
                .with_label(line.span(fields.offsets), ErrorCode::E003.description()),
            );
            return;
        }

        if self.define(fields.tag, line.origin) {
            self.text_bounds.push(TextBound {
                tag: fields.tag,
                type_name: fields.type_name,
                left: fields.left,
                right: fields.right,
                text: fields.text,
                origin: line.origin,
            });
        }
    }

    fn event(&mut self, line: &Line<'a>) {
        let mut input = LocatingSlice::new(line.text);
        let (tag, tokens) = match event_fields(&mut input) {
            Ok(fields) => fields,
            Err(err) => {
                let error_pos = input.current_token_start();
                self.grammar_error(line, ErrorCode::E002, err, error_pos);
                return;
            }
        };

        let mut roles = Vec::with_capacity(tokens.len());
        for (position, (token, range)) in tokens.into_iter().enumerate() {
            let span = line.span(range);
            let Some((name, filler)) = token.rsplit_once(':') else {
                self.malformed_pair(line, token, span);
                return;
            };
            if position == 0 && !name.is_empty() && filler.is_empty() {
                self.diagnostics.emit(
                    Diagnostic::error(format!("event `{tag}` has no trigger"))
                        .with_code(ErrorCode::E004)
                        .with_location(line.location(self.sources))
                        .with_label(span, ErrorCode::E004.description())
                        .with_help("the first pair of an event line is `Type:Trigger`"),
                );
                return;
            }
            if name.is_empty() || filler.is_empty() {
                self.malformed_pair(line, token, span);
                return;
            }
            roles.push(Role { name, filler, span });
        }

        let Some(head) = roles.first() else {
            return;
        };
        let (type_name, trigger) = (head.name, head.filler);
        if self.define(tag, line.origin) {
            self.events.push(Event {
                tag,
                type_name,
                trigger,
                roles,
                origin: line.origin,
            });
        }
    }

    /// Register `tag`; reports a duplicate and returns `false` if it is taken.
    fn define(&mut self, tag: &'a str, origin: Origin) -> bool {
        let Some(first) = self.defined.get(tag).copied() else {
            self.defined.insert(tag, origin);
            return true;
        };

        let mut diag = Diagnostic::error(format!("tag `{tag}` is defined more than once"))
            .with_code(ErrorCode::E100)
            .with_location(location(self.sources, &origin))
            .with_label(origin.head(tag.len()), "duplicate definition")
            .with_help("tags must be unique across all annotation files of a document");
        if first.source == origin.source {
            diag = diag.with_secondary_label(first.head(tag.len()), "first defined here");
        } else {
            diag = diag.with_help(format!(
                "first defined at {}",
                location(self.sources, &first)
            ));
        }
        self.diagnostics.emit(diag);
        false
    }

    /// Check that triggers and modelled filler tags name defined records.
    fn check_references(&mut self) {
        for event in &self.events {
            if !self.defined.contains_key(event.trigger) {
                let mut diag = Diagnostic::error(format!(
                    "trigger `{}` of event `{}` is not defined",
                    event.trigger, event.tag
                ))
                .with_code(ErrorCode::E101)
                .with_location(location(self.sources, &event.origin));
                if let Some(head) = event.roles.first() {
                    diag = diag.with_label(head.span, "not found");
                }
                self.diagnostics.emit(diag);
            }

            for role in event.roles.iter().skip(1) {
                let modelled = role.filler.starts_with(['T', 'E']);
                if modelled && !self.defined.contains_key(role.filler) {
                    self.diagnostics.emit(
                        Diagnostic::error(format!(
                            "role `{}` of event `{}` refers to undefined tag `{}`",
                            role.name, event.tag, role.filler
                        ))
                        .with_code(ErrorCode::E102)
                        .with_location(location(self.sources, &event.origin))
                        .with_label(role.span, "not found"),
                    );
                }
            }
        }
    }

    fn malformed_pair(&mut self, line: &Line<'_>, token: &str, span: ByteSpan) {
        self.diagnostics.emit(
            Diagnostic::error(format!("malformed event pair `{token}`"))
                .with_code(ErrorCode::E002)
                .with_location(line.location(self.sources))
                .with_label(span, "expected `Name:Tag`"),
        );
    }

    fn grammar_error(
        &mut self,
        line: &Line<'_>,
        code: ErrorCode,
        err: ErrMode<ContextError<LineDiagnostic>>,
        error_pos: usize,
    ) {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        let span = line.span(error_pos..line.text.len());
        let mut diag = Diagnostic::error(code.description())
            .with_code(code)
            .with_location(line.location(self.sources));
        if let Some(LineDiagnostic { message, help }) = context_error.context().next() {
            diag = diag.with_label(span, *message);
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
        } else {
            diag = diag.with_label(span, "unexpected input");
        }
        self.diagnostics.emit(diag);
    }

    fn finish(mut self) -> Result<RecordSet<'a>, ParseError> {
        self.check_references();
        self.diagnostics.finish()?;
        Ok(RecordSet {
            sources: self.sources,
            text_bounds: self.text_bounds,
            events: self.events,
        })
    }
}

/// Trimmed, non-blank lines of a file with their positions.
///
/// A leading byte order mark is skipped; positions still count it.
fn lines(source: usize, content: &str) -> impl Iterator<Item = Line<'_>> {
    let (mut offset, content) = match content.strip_prefix(BOM) {
        Some(rest) => (BOM.len_utf8(), rest),
        None => (0, content),
    };
    content
        .split_inclusive('\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let start = offset;
            offset += raw.len();
            let text = raw.trim();
            if text.is_empty() {
                return None;
            }
            let leading = raw.len() - raw.trim_start().len();
            let begin = start + leading;
            Some(Line {
                text,
                origin: Origin {
                    source,
                    line: index + 1,
                    span: ByteSpan::new(begin..begin + text.len()),
                },
            })
        })
}

/// Parse every annotation file of a document into one record set.
///
/// Grammar and namespace errors are collected across all files before
/// failing, so a single call reports every bad line.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed `T`/`E` lines, inverted offsets,
/// missing triggers, duplicate tags, and references to undefined tags.
pub fn parse_records<'a>(
    sources: &'a [AnnotationSource],
    stats: &mut SkipStats,
) -> Result<RecordSet<'a>, ParseError> {
    let mut scanner = Scanner::new(sources);
    scanner.scan(stats);
    let records = scanner.finish()?;

    debug!(
        text_bounds = records.text_bounds.len(),
        events = records.events.len();
        "Parsed annotation records"
    );
    trace!(
        text_bounds:? = records.text_bounds,
        events:? = records.events;
        "Annotation records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(files: &[(&str, &str)]) -> (Result<Vec<String>, ParseError>, SkipStats) {
        let sources: Vec<_> = files
            .iter()
            .map(|(path, content)| AnnotationSource::new(*path, *content))
            .collect();
        let mut stats = SkipStats::new();
        let result = parse_records(&sources, &mut stats).map(|records| {
            records
                .text_bounds()
                .iter()
                .map(|t| t.tag.to_string())
                .chain(records.events().iter().map(|e| e.tag.to_string()))
                .collect()
        });
        (result, stats)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(|d| d.code()).collect()
    }

    #[test]
    fn test_text_bound_line() {
        let sources = [AnnotationSource::new("d.a1", "T1\tProtein 0 5\tAlice\n")];
        let mut stats = SkipStats::new();
        let records = parse_records(&sources, &mut stats).unwrap();

        let span = &records.text_bounds()[0];
        assert_eq!(span.tag, "T1");
        assert_eq!(span.type_name, "Protein");
        assert_eq!((span.left, span.right), (0, 5));
        assert_eq!(span.text, "Alice");
        assert_eq!(span.origin.line, 1);
        assert_eq!(span.origin.span, ByteSpan::new(0..20));
    }

    #[test]
    fn test_leading_byte_order_mark_is_skipped() {
        let sources = [
            AnnotationSource::new("d.a1", "\u{feff}T1\tProtein 0 5\tAlice\n"),
            AnnotationSource::new("d.a2", "E1\tBinding:T1 Theme:T1\n"),
        ];
        let mut stats = SkipStats::new();
        let records = parse_records(&sources, &mut stats).unwrap();

        let span = &records.text_bounds()[0];
        assert_eq!(span.tag, "T1");
        assert_eq!(span.origin.line, 1);
        assert_eq!(span.origin.span, ByteSpan::new(3..23));
        assert_eq!(records.events()[0].trigger, "T1");
        assert!(stats.is_empty());
    }

    #[test]
    fn test_span_text_may_contain_spaces() {
        let sources = [AnnotationSource::new(
            "d.a1",
            "T1\tProtein 0 13\tNF-kappa B p50",
        )];
        let mut stats = SkipStats::new();
        let records = parse_records(&sources, &mut stats).unwrap();
        assert_eq!(records.text_bounds()[0].text, "NF-kappa B p50");
    }

    #[test]
    fn test_event_line_splits_on_last_colon() {
        let sources = [
            AnnotationSource::new("d.a1", "T1\tP 0 1\ta\nT2\tP 1 2\tb\nT3\tB 2 3\tc\n"),
            AnnotationSource::new("d.a2", "E1\tBinding:T3 Theme:T1 Site:Loc:T2\n"),
        ];
        let mut stats = SkipStats::new();
        let records = parse_records(&sources, &mut stats).unwrap();

        let event = &records.events()[0];
        assert_eq!(event.type_name, "Binding");
        assert_eq!(event.trigger, "T3");
        let pairs: Vec<_> = event.roles.iter().map(|r| (r.name, r.filler)).collect();
        assert_eq!(
            pairs,
            [("Binding", "T3"), ("Theme", "T1"), ("Site:Loc", "T2")]
        );
        assert_eq!(records.location(&event.origin).to_string(), "d.a2:1");
    }

    #[test]
    fn test_blank_and_unmodelled_lines() {
        let (result, stats) = parse(&[(
            "d.a1",
            "\n  T1\tProtein 0 5\tAlice  \r\n\nA1\tNegation E1\n#1\tNote T1\tcomment\n",
        )]);
        assert_eq!(result.unwrap(), ["T1"]);
        assert_eq!(stats.count(SkipReason::UnmodelledLine), 2);
    }

    #[test]
    fn test_two_field_text_bound_is_fatal() {
        let (result, _) = parse(&[("corpus/d.a1", "T1\tProtein 0 5\tAlice\nT2\tProtein 6 9\n")]);
        let err = result.unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        let location = diag.location().unwrap();
        assert_eq!(location.path(), std::path::Path::new("corpus/d.a1"));
        assert_eq!(location.line(), 2);
        assert_eq!(diag.labels()[0].message(), "expected a tab after the offsets");
        assert!(err.to_string().starts_with("corpus/d.a1:2: error[E001]"));
    }

    #[test]
    fn test_text_bound_grammar_errors() {
        for line in [
            "T1 Protein 0 5 Alice",
            "T1\tProtein 0\tAlice",
            "T1\tProtein zero 5\tAlice",
            "T1\tProtein -1 5\tAlice",
            "T1\tProtein 0 5 6\tAlice",
            "T1\tProtein 0 5\tAli\tce",
        ] {
            let (result, _) = parse(&[("d.a1", line)]);
            let err = result.unwrap_err();
            assert_eq!(codes(&err), [ErrorCode::E001], "{line}");
        }
    }

    #[test]
    fn test_inverted_offsets() {
        let (result, _) = parse(&[("d.a1", "T1\tProtein 5 0\tAlice")]);
        assert_eq!(codes(&result.unwrap_err()), [ErrorCode::E003]);
    }

    #[test]
    fn test_event_grammar_errors() {
        let cases = [
            ("E1", ErrorCode::E002),
            ("E1\tBinding", ErrorCode::E002),
            ("E1\tBinding:T1 Theme", ErrorCode::E002),
            ("E1\tBinding:T1 :T1", ErrorCode::E002),
            ("E1\tBinding:", ErrorCode::E004),
        ];
        for (line, code) in cases {
            let (result, _) = parse(&[("d.a1", "T1\tP 0 1\ta"), ("d.a2", line)]);
            assert_eq!(codes(&result.unwrap_err()), [code], "{line}");
        }
    }

    #[test]
    fn test_duplicate_tag_across_files() {
        let (result, _) = parse(&[
            ("d.a1", "T1\tProtein 0 5\tAlice"),
            ("d.a2", "T1\tProtein 0 5\tAlice"),
        ]);
        let err = result.unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.location().unwrap().to_string(), "d.a2:1");
        assert_eq!(diag.help(), Some("first defined at d.a1:1"));
    }

    #[test]
    fn test_duplicate_tag_same_file_points_at_first() {
        let (result, _) = parse(&[("d.a1", "T1\tP 0 1\ta\nT1\tP 1 2\tb\n")]);
        let err = result.unwrap_err();
        let labels = err.diagnostics()[0].labels();
        assert_eq!(labels[0].span(), ByteSpan::new(11..13));
        assert_eq!(labels[1].span(), ByteSpan::new(0..2));
    }

    #[test]
    fn test_undefined_references() {
        let (result, _) = parse(&[
            ("d.a1", "T1\tP 0 1\ta"),
            ("d.a2", "E1\tBinding:T9 Theme:T1\nE2\tBinding:T1 Theme:E7\n"),
        ]);
        let err = result.unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E101, ErrorCode::E102]);
        assert_eq!(err.diagnostics()[1].location().unwrap().line(), 2);
    }

    #[test]
    fn test_unmodelled_filler_prefix_is_not_checked() {
        let (result, _) = parse(&[("d.a1", "T1\tP 0 1\ta\nE1\tBinding:T1 Site:A3 Theme:N2\n")]);
        assert_eq!(result.unwrap(), ["T1", "E1"]);
    }

    #[test]
    fn test_forward_reference_between_events() {
        let (result, _) = parse(&[(
            "d.a2",
            "E2\tRegulation:T2 Theme:E1\nE1\tBinding:T1\nT1\tB 0 1\ta\nT2\tR 1 2\tb\n",
        )]);
        assert_eq!(result.unwrap(), ["T1", "T2", "E2", "E1"]);
    }

    #[test]
    fn test_every_bad_line_is_reported() {
        let (result, _) = parse(&[("d.a1", "T1\tP 0\nT2\tP 0 1\ta\nT3\tP x y\tz\nT2\tP 0 1\ta\n")]);
        let err = result.unwrap_err();
        assert_eq!(
            codes(&err),
            [ErrorCode::E001, ErrorCode::E001, ErrorCode::E100]
        );
    }
}
