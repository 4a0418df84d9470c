//! Error types for Dere operations.
//!
//! This module provides the main error type [`DereError`] which wraps
//! the error conditions of loading a schema and reading a corpus.

use std::{io, path::PathBuf};

use thiserror::Error;

use dere_core::schema::SchemaError;
use dere_parser::{AnnotationSource, error::ParseError};

/// The main error type for Dere operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the annotation files of the failed document so
/// that diagnostics can be rendered against the lines they point at.
#[derive(Debug, Error)]
pub enum DereError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document `{doc_id}`: {err}")]
    Parse {
        err: ParseError,
        doc_id: String,
        sources: Vec<AnnotationSource>,
    },

    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("malformed schema file: {0}")]
    SchemaSyntax(#[from] toml::de::Error),

    #[error("invalid reader configuration: {0}")]
    Config(String),

    #[error("document `{doc_id}` has no text file {}", path.display())]
    MissingText { doc_id: String, path: PathBuf },
}

impl DereError {
    /// Create an `Io` error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Parse` error with the annotation files it was raised for.
    pub fn new_parse_error(
        err: ParseError,
        doc_id: impl Into<String>,
        sources: &[AnnotationSource],
    ) -> Self {
        Self::Parse {
            err,
            doc_id: doc_id.into(),
            sources: sources.to_vec(),
        }
    }
}
