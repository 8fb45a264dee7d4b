//! Serialization and lexical normalization of the collapsed table.
//!
//! ```text
//! notes ─▶ serialize (';', no quoting) ─▶ ';' → ',' ─▶ dictionary ─▶ file
//! ```
//!
//! Two substitution modes:
//!
//! - [`SubstitutionMode::Legacy`] - the dictionary runs over the whole
//!   serialized text as plain substring replacement. Expansions can leak into
//!   unrelated fields and into already expanded words; output stays
//!   byte-compatible with existing consumers.
//! - [`SubstitutionMode::Token`] - the dictionary rewrites descriptor tokens
//!   that match an entry exactly, before serialization.

pub mod dictionary;

pub use dictionary::{Dictionary, Substitution};

use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::config::delimiter_byte;
use crate::error::{OutputError, OutputResult};
use crate::models::TastingNote;
use crate::transform::assemble::PresentationNames;

/// How the dictionary is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// Whole-text substring replacement after serialization.
    #[default]
    Legacy,
    /// Exact token replacement inside descriptor fields.
    Token,
}

/// A data row whose field count changed after delimiter replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelimiterCollision {
    /// 1-based data row (header excluded)
    pub row: usize,
    pub fields: usize,
    pub expected: usize,
}

/// Write header and rows as delimited text without adding any quoting.
pub fn serialize(
    notes: &[TastingNote],
    names: &PresentationNames,
    delimiter: char,
) -> OutputResult<String> {
    let delimiter = delimiter_byte(delimiter).ok_or(OutputError::InvalidDelimiter(delimiter))?;

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(names.header_row())?;
    for note in notes {
        writer.write_record(&note.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    Ok(String::from_utf8(bytes)?)
}

/// Swap every `from` character of the text for `to`.
pub fn replace_delimiter(text: &str, from: char, to: char) -> String {
    if from == to {
        return text.to_string();
    }
    text.replace(from, to.encode_utf8(&mut [0; 4]))
}

/// Rows that a quote-aware reader no longer splits into the header's field
/// count. Quoted descriptor lists containing the delimiter are fine; bare
/// values containing it are not.
pub fn find_delimiter_collisions(text: &str, delimiter: char) -> Vec<DelimiterCollision> {
    let Some(delimiter) = delimiter_byte(delimiter) else {
        return Vec::new();
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records().filter_map(Result::ok);
    let Some(expected) = rows.next().map(|header| header.len()) else {
        return Vec::new();
    };

    rows.enumerate()
        .filter(|(_, record)| record.len() != expected)
        .map(|(i, record)| DelimiterCollision {
            row: i + 1,
            fields: record.len(),
            expected,
        })
        .collect()
}

/// Serialize, swap delimiters and apply the dictionary per `mode`.
pub fn render(
    notes: &[TastingNote],
    names: &PresentationNames,
    dictionary: &Dictionary,
    mode: SubstitutionMode,
    serialize_delimiter: char,
    output_delimiter: char,
) -> OutputResult<String> {
    match mode {
        SubstitutionMode::Legacy => {
            let text = serialize(notes, names, serialize_delimiter)?;
            let text = replace_delimiter(&text, serialize_delimiter, output_delimiter);
            Ok(dictionary.expand_text(&text))
        }
        SubstitutionMode::Token => {
            let mut expanded = notes.to_vec();
            for note in &mut expanded {
                dictionary.expand_note(note);
            }
            let text = serialize(&expanded, names, serialize_delimiter)?;
            Ok(replace_delimiter(&text, serialize_delimiter, output_delimiter))
        }
    }
}

/// Write the final text, replacing any existing file.
pub fn write_output(path: &Path, text: &str) -> OutputResult<()> {
    std::fs::write(path, text).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}
