//! Pipeline configuration.
//!
//! The default file locations and delimiters are constants; a wrapping CLI
//! overrides them through [`CollapseOptions`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::output::SubstitutionMode;
use crate::transform::assemble::{PresentationNames, SourceColumns};

/// Source table read when no input is given.
pub const DEFAULT_INPUT_PATH: &str = "scotch.csv";

/// Destination file written when no output is given.
pub const DEFAULT_OUTPUT_PATH: &str = "cleanDataSet.csv";

/// Delimiter of the source table.
pub const SOURCE_DELIMITER: char = ';';

/// Delimiter used while serializing, before the global replacement.
pub const SERIALIZE_DELIMITER: char = ';';

/// Delimiter of the final output text.
pub const OUTPUT_DELIMITER: char = ',';

/// Maximum log entries kept for the run report.
pub const MAX_LOG_ENTRIES: usize = 200;

/// Byte form of a delimiter; only ASCII characters qualify.
pub fn delimiter_byte(delimiter: char) -> Option<u8> {
    delimiter.is_ascii().then_some(delimiter as u8)
}

/// Where the indicator column layout comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    /// Built-in scotch schema, header names are checked.
    #[default]
    Declared,
    /// Columns are taken from the header row by position.
    Inferred,
}

/// Options for one collapsing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapseOptions {
    pub input: PathBuf,

    pub output: PathBuf,

    /// Source delimiter (auto-detect if not specified)
    pub delimiter: Option<char>,

    pub serialize_delimiter: char,

    pub output_delimiter: char,

    pub substitution: SubstitutionMode,

    pub schema: SchemaSource,

    /// Output header labels
    pub presentation: PresentationNames,

    /// Header names of the passthrough columns in the source
    pub source_columns: SourceColumns,

    /// JSON dictionary replacing the built-in one
    pub dictionary_path: Option<PathBuf>,

    /// Where to write the JSON run report
    pub report_path: Option<PathBuf>,
}

impl Default for CollapseOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: Some(SOURCE_DELIMITER),
            serialize_delimiter: SERIALIZE_DELIMITER,
            output_delimiter: OUTPUT_DELIMITER,
            substitution: SubstitutionMode::default(),
            schema: SchemaSource::default(),
            presentation: PresentationNames::default(),
            source_columns: SourceColumns::default(),
            dictionary_path: None,
            report_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = CollapseOptions::default();
        assert_eq!(opts.input, PathBuf::from("scotch.csv"));
        assert_eq!(opts.output, PathBuf::from("cleanDataSet.csv"));
        assert_eq!(opts.delimiter, Some(';'));
        assert_eq!(opts.output_delimiter, ',');
        assert_eq!(opts.substitution, SubstitutionMode::Legacy);
        assert_eq!(opts.schema, SchemaSource::Declared);
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(';'), Some(b';'));
        assert_eq!(delimiter_byte('\t'), Some(b'\t'));
        assert_eq!(delimiter_byte('é'), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: CollapseOptions =
            serde_json::from_str(r#"{ "output": "out.csv", "substitution": "token" }"#).unwrap();
        assert_eq!(opts.output, PathBuf::from("out.csv"));
        assert_eq!(opts.input, PathBuf::from("scotch.csv"));
        assert_eq!(opts.substitution, SubstitutionMode::Token);
    }
}
