//! Finding the documents of a corpus directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{config::ReaderSettings, error::DereError};

/// The files making up one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    id: String,
    text: PathBuf,
    base: PathBuf,
    extension: Option<PathBuf>,
}

impl DocumentPaths {
    pub fn new(id: impl Into<String>, text: PathBuf, base: PathBuf) -> Self {
        Self {
            id: id.into(),
            text,
            base,
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: PathBuf) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &Path {
        &self.text
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn extension(&self) -> Option<&Path> {
        self.extension.as_deref()
    }
}

/// List the documents of `dir`, sorted by id.
///
/// Every file with the base extension names a document after its stem. The
/// text file is required; the extension annotation file is optional.
///
/// # Errors
///
/// Returns [`DereError::Io`] if the directory cannot be listed and
/// [`DereError::MissingText`] for a document without a text file.
pub fn discover(dir: &Path, settings: &ReaderSettings) -> Result<Vec<DocumentPaths>, DereError> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| DereError::io(dir, err))? {
        let path = entry.map_err(|err| DereError::io(dir, err))?.path();
        let extension = path.extension().and_then(|ext| ext.to_str());
        if !path.is_file() || extension != Some(settings.base_extension()) {
            continue;
        }
        match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(id) => ids.push(id.to_string()),
            None => warn!(path:% = path.display(); "Skipping annotation file with a non UTF-8 name"),
        }
    }
    ids.sort();

    let documents = ids
        .into_iter()
        .map(|id| {
            let file = |extension: &str| dir.join(format!("{id}.{extension}"));
            let text = file(settings.text_extension());
            if !text.is_file() {
                return Err(DereError::MissingText {
                    doc_id: id.clone(),
                    path: text,
                });
            }
            let base = file(settings.base_extension());
            let extension = file(settings.extension_extension());
            let paths = DocumentPaths::new(id.as_str(), text, base);
            Ok(if extension.is_file() {
                paths.with_extension(extension)
            } else {
                paths
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(dir:% = dir.display(), documents = documents.len(); "Discovered documents");
    Ok(documents)
}
