//! Dere CLI library
//!
//! This module contains the core CLI logic for the Dere corpus reader.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::path::Path;

use log::info;

use dere::{
    CorpusReader, DereError, LoadReport,
    corpus::{AnnotationGraph, Corpus},
    load_schema,
};

/// Run the Dere CLI application
///
/// Loads the schema and the corpus directory named by `args` and prints
/// the corpus in the requested format to standard output.
///
/// # Errors
///
/// Returns `DereError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Schema errors
/// - Annotation errors in any document
pub fn run(args: &Args) -> Result<(), DereError> {
    print!("{}", load_and_render(args)?);
    Ok(())
}

/// Load the corpus named by `args` and render it without printing.
///
/// # Errors
///
/// As [`run`].
pub fn load_and_render(args: &Args) -> Result<String, DereError> {
    info!(
        corpus_path = args.corpus,
        schema_path = args.schema;
        "Reading corpus"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let schema = load_schema(Path::new(&args.schema))?;

    let reader = CorpusReader::new(app_config, &schema);
    let (corpus, report) = reader.load(Path::new(&args.corpus))?;

    let output = match args.format {
        OutputFormat::Text => render_summary(&report),
        OutputFormat::Tsv => render_tsv(&corpus),
    };

    info!(documents = report.documents(); "Corpus read successfully");

    Ok(output)
}

/// Summary counts followed by one line per non-zero skip reason.
pub fn render_summary(report: &LoadReport) -> String {
    let rows = [
        ("documents", report.documents()),
        ("instances", report.instances()),
        ("spans", report.spans()),
        ("frames", report.frames()),
        ("shared frames", report.shared_frames()),
        ("skipped", report.skips().total()),
    ];
    let counts = rows
        .into_iter()
        .map(|(name, count)| format!("{name:<14}{count}\n"));
    let skips = report
        .skips()
        .iter()
        .map(|(reason, count)| format!("  {:<24}{count}\n", reason.as_str()));
    counts.chain(skips).collect()
}

/// One row per instance: document id, instance index within its document,
/// span count and closure size.
pub fn render_tsv(corpus: &Corpus) -> String {
    let mut out = String::from("doc_id\tinstance\tspans\tframes\n");
    let mut current: Option<&str> = None;
    let mut index = 0;
    for instance in corpus.instances() {
        if current == Some(instance.doc_id()) {
            index += 1;
        } else {
            current = Some(instance.doc_id());
            index = 0;
        }
        out.push_str(&format!(
            "{}\t{index}\t{}\t{}\n",
            instance.doc_id(),
            instance.spans().len(),
            instance.frame_ids().len()
        ));
    }
    out
}
