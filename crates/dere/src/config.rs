//! Configuration types for reading corpora.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file:
//!
//! ```toml
//! [reader]
//! parallel = true
//! closure = "indexed"
//! base_extension = "a1"
//! extension_extension = "a2"
//! text_extension = "txt"
//! ```
//!
//! # Example
//!
//! ```
//! # use dere::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.reader().parallel());
//! assert_eq!(config.reader().base_extension(), "a1");
//! ```

use serde::Deserialize;

use dere_core::corpus::ClosureStrategy;
use dere_parser::ReaderConfig;

use crate::error::DereError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Reader configuration section.
    #[serde(default)]
    reader: ReaderSettings,
}

impl AppConfig {
    pub fn new(reader: ReaderSettings) -> Self {
        Self { reader }
    }

    /// Returns the reader configuration.
    pub fn reader(&self) -> &ReaderSettings {
        &self.reader
    }
}

/// How corpus directories are discovered and read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderSettings {
    /// Read documents on a thread pool.
    parallel: bool,

    /// Strategy for instance frame closures.
    closure: ClosureStrategy,

    /// Extension of the span annotation file; its stem names the document.
    base_extension: String,

    /// Extension of the optional event annotation file.
    extension_extension: String,

    /// Extension of the document text file.
    text_extension: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            closure: ClosureStrategy::default(),
            base_extension: "a1".to_string(),
            extension_extension: "a2".to_string(),
            text_extension: "txt".to_string(),
        }
    }
}

impl ReaderSettings {
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn closure(&self) -> ClosureStrategy {
        self.closure
    }

    pub fn base_extension(&self) -> &str {
        &self.base_extension
    }

    pub fn extension_extension(&self) -> &str {
        &self.extension_extension
    }

    pub fn text_extension(&self) -> &str {
        &self.text_extension
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_closure(mut self, closure: ClosureStrategy) -> Self {
        self.closure = closure;
        self
    }

    /// Per-document options handed to the parser.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::new(self.closure)
    }

    /// Check that the three file extensions are non-empty and distinct.
    ///
    /// # Errors
    ///
    /// Returns [`DereError::Config`] naming the offending extension.
    pub fn validate(&self) -> Result<(), DereError> {
        let extensions = [
            ("base_extension", &self.base_extension),
            ("extension_extension", &self.extension_extension),
            ("text_extension", &self.text_extension),
        ];
        for (position, (key, extension)) in extensions.iter().enumerate() {
            if extension.is_empty() || extension.contains(['.', '/', '\\']) {
                return Err(DereError::Config(format!(
                    "`{key}` must be a bare file extension, got `{extension}`"
                )));
            }
            if let Some((other, _)) = extensions[..position]
                .iter()
                .find(|(_, earlier)| earlier == extension)
            {
                return Err(DereError::Config(format!(
                    "`{key}` and `{other}` are both `{extension}`"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[reader]\nclosure = \"fixpoint\"\n").unwrap();

        assert_eq!(config.reader().closure(), ClosureStrategy::Fixpoint);
        assert!(config.reader().parallel());
        assert_eq!(config.reader().text_extension(), "txt");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.reader(), &ReaderSettings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<AppConfig>("[reader]\nthreads = 4\n").is_err());
        assert!(toml::from_str::<AppConfig>("[reader]\nclosure = \"bfs\"\n").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ReaderSettings::default().validate().is_ok());

        let clash: AppConfig =
            toml::from_str("[reader]\nextension_extension = \"a1\"\n").unwrap();
        let err = clash.reader().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid reader configuration: `extension_extension` and `base_extension` are both `a1`"
        );

        let dotted: AppConfig = toml::from_str("[reader]\ntext_extension = \".txt\"\n").unwrap();
        assert!(dotted.reader().validate().is_err());
    }
}
