//! Dere - a reader for stand-off annotated biomedical corpora.
//!
//! Reads directories of documents annotated with typed text spans (`.a1`)
//! and typed events (`.a2`) into a [`Corpus`]: the documents' lines as
//! instances, each holding its spans and the frames reachable from them.

pub mod config;

mod discover;
mod error;
mod report;
mod schema;

pub use dere_core::{corpus, identifier};
pub use dere_core::schema::{TaskSchema, TaskSpec};
pub use dere_parser::{ReadOutcome, SkipReason, SkipStats};

pub use discover::DocumentPaths;
pub use error::DereError;
pub use report::LoadReport;
pub use schema::{load_schema, parse_schema};

use std::{fs, path::Path};

use log::{debug, info};
use rayon::prelude::*;

use dere_core::corpus::Corpus;
use dere_parser::{AnnotationSource, DocumentSource};

use config::AppConfig;

/// Reader for corpus directories and single documents.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use dere::{CorpusReader, config::AppConfig, load_schema};
///
/// let schema = load_schema(Path::new("genia.toml")).expect("Failed to load schema");
/// let reader = CorpusReader::new(AppConfig::default(), &schema);
///
/// let (corpus, report) = reader
///     .load(Path::new("corpus/train"))
///     .expect("Failed to load corpus");
///
/// println!("{} documents, {} instances", report.documents(), report.instances());
/// ```
pub struct CorpusReader<'s> {
    config: AppConfig,
    schema: &'s dyn TaskSchema,
}

impl<'s> CorpusReader<'s> {
    /// Create a reader checking annotations against `schema`.
    pub fn new(config: AppConfig, schema: &'s dyn TaskSchema) -> Self {
        Self { config, schema }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// List the documents of a corpus directory, sorted by id.
    ///
    /// # Errors
    ///
    /// Returns `DereError` for invalid reader settings, an unreadable
    /// directory, or a document without a text file.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DocumentPaths>, DereError> {
        self.config.reader().validate()?;
        discover::discover(dir, self.config.reader())
    }

    /// Read and resolve one document.
    ///
    /// # Errors
    ///
    /// Returns `DereError::Io` if a file cannot be read and
    /// `DereError::Parse` with the document's diagnostics if it fails to
    /// resolve.
    pub fn read_document(&self, paths: &DocumentPaths) -> Result<ReadOutcome, DereError> {
        let text = read(paths.text())?;
        let base = AnnotationSource::new(paths.base(), read(paths.base())?);
        let mut source = DocumentSource::new(paths.id(), text, base);
        if let Some(extension) = paths.extension() {
            source = source.with_annotations(AnnotationSource::new(extension, read(extension)?));
        }

        dere_parser::read_document(&source, self.schema, self.config.reader().reader_config())
            .map_err(|err| DereError::new_parse_error(err, paths.id(), source.annotations()))
    }

    /// Load every document of `dir` into one corpus.
    ///
    /// Documents are read independently, on a thread pool when the reader
    /// settings allow it, and appended in id order. The first failing
    /// document in that order aborts the load.
    ///
    /// # Errors
    ///
    /// Returns `DereError` from discovery or from the first document that
    /// fails to read.
    pub fn load(&self, dir: &Path) -> Result<(Corpus, LoadReport), DereError> {
        info!(dir:% = dir.display(); "Loading corpus");
        let documents = self.discover(dir)?;

        let parallel = self.config.reader().parallel();
        debug!(documents = documents.len(), parallel; "Reading documents");
        let outcomes: Vec<Result<ReadOutcome, DereError>> = if parallel {
            documents
                .par_iter()
                .map(|paths| self.read_document(paths))
                .collect()
        } else {
            documents
                .iter()
                .map(|paths| self.read_document(paths))
                .collect()
        };

        let mut corpus = Corpus::new();
        let mut skips = SkipStats::new();
        for outcome in outcomes {
            let outcome = outcome?;
            skips.merge(&outcome.stats);
            corpus.append(outcome.document);
        }

        let report = LoadReport::new(&corpus, skips);
        info!(
            documents = report.documents(),
            instances = report.instances(),
            frames = report.frames(),
            skipped = report.skips().total();
            "Corpus loaded"
        );
        Ok((corpus, report))
    }
}

fn read(path: &Path) -> Result<String, DereError> {
    fs::read_to_string(path).map_err(|err| DereError::io(path, err))
}
