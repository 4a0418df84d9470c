//! Command-line argument definitions for the Dere CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the corpus directory, the schema and
//! configuration files, logging verbosity, and the output format.

use clap::{Parser, ValueEnum};

/// How the loaded corpus is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary counts and skip statistics
    #[default]
    Text,
    /// One tab-separated row per instance
    Tsv,
}

/// Command-line arguments for the Dere corpus reader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the documents' text and annotation files
    #[arg(help = "Path to the corpus directory")]
    pub corpus: String,

    /// Path to the task schema (TOML)
    #[arg(short, long)]
    pub schema: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["dere", "corpus/", "--schema", "genia.toml"]).unwrap();
        assert_eq!(args.corpus, "corpus/");
        assert_eq!(args.schema, "genia.toml");
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_tsv_format() {
        let args =
            Args::try_parse_from(["dere", "corpus/", "-s", "genia.toml", "--format", "tsv"]).unwrap();
        assert_eq!(args.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_schema_is_required() {
        assert!(Args::try_parse_from(["dere", "corpus/"]).is_err());
    }
}
