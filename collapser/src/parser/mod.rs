//! Table loader with encoding and delimiter auto-detection.
//!
//! Reads the whole source file into a [`Table`], keeping header names and
//! column order exactly as they appear. Rows with a different field count
//! than the header abort the load.

use std::io::ErrorKind;
use std::path::Path;

use csv::ReaderBuilder;

use crate::config::delimiter_byte;
use crate::error::{CsvError, CsvResult};
use crate::models::{SourceRecord, Table};

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    /// Detected encoding
    pub encoding: String,
    /// Detected or requested delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // UTF-8 and anything unrecognized
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into a [`Table`].
///
/// # Example
/// ```ignore
/// use whisky_collapser::parse_table;
///
/// let table = parse_table("NAME;%\nAberlour;40", ';').unwrap();
/// assert_eq!(table.headers, vec!["NAME", "%"]);
/// assert_eq!(table.records[0].fields, vec!["Aberlour", "40"]);
/// ```
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Table> {
    let delimiter = delimiter_byte(delimiter)
        .ok_or_else(|| CsvError::parse(1, format!("delimiter '{}' is not a single byte", delimiter)))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| to_parse_error(&e, 1))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();

    for (row_idx, row) in reader.records().enumerate() {
        // +1 for 0-index, +1 for header
        let fallback_line = row_idx as u64 + 2;
        let row = row.map_err(|e| to_parse_error(&e, fallback_line))?;
        let line = row.position().map(|p| p.line()).unwrap_or(fallback_line);

        records.push(SourceRecord {
            line,
            fields: row.iter().map(str::to_string).collect(),
        });
    }

    Ok(Table { headers, records })
}

fn to_parse_error(err: &csv::Error, fallback_line: u64) -> CsvError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { pos, expected_len, len } => CsvError::parse(
            pos.as_ref().map(|p| p.line()).unwrap_or(fallback_line),
            format!("found {} fields, expected {}", len, expected_len),
        ),
        _ => CsvError::parse(
            err.position().map(|p| p.line()).unwrap_or(fallback_line),
            err.to_string(),
        ),
    }
}

/// Load a table file, detecting encoding and (when `delimiter` is `None`)
/// the delimiter.
pub fn load_table<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CsvError::FileNotFound(path.to_path_buf()),
        _ => CsvError::IoError(e),
    })?;

    parse_bytes(&bytes, delimiter)
}

/// Parse raw bytes, detecting encoding and (optionally) the delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CsvError::NoHeaders);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    let table = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let table = parse_table("NAME;%\nAberlour;40\nArdbeg;46", ';').unwrap();

        assert_eq!(table.headers, vec!["NAME", "%"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].fields, vec!["Aberlour", "40"]);
        assert_eq!(table.records[1].get(1), Some("46"));
    }

    #[test]
    fn test_header_names_kept_exactly() {
        let table = parse_table("NAME;full;full;AROMA\nx;1;0;1", ';').unwrap();
        assert_eq!(table.headers, vec!["NAME", "full", "full", "AROMA"]);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "NAME;REGION\n\"Glen Scotia\";\"CAMPBELTOWN\"";
        let table = parse_table(csv, ';').unwrap();
        assert_eq!(table.records[0].fields, vec!["Glen Scotia", "CAMPBELTOWN"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_table("a;b\n1;2\n\n3;4\n", ';').unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let err = parse_table("a;b;c\n1;2;3\n4;5", ';').unwrap_err();
        match err {
            CsvError::ParseError { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("found 2 fields, expected 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_row_is_parse_error() {
        let result = parse_table("a;b\n1;2;3", ';');
        assert!(matches!(result, Err(CsvError::ParseError { .. })));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        assert!(matches!(parse_bytes(b"", Some(';')), Err(CsvError::NoHeaders)));
        assert!(matches!(parse_bytes(b"\n\n", None), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_line_numbers_recorded() {
        let table = parse_table("a;b\n1;2\n3;4", ';').unwrap();
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].line, 3);
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes(b"NAME;%\nAberlour;40", None).unwrap();
        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.len(), 1);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_missing_file() {
        let err = load_table("does/not/exist.csv", Some(';')).unwrap_err();
        assert!(matches!(err, CsvError::FileNotFound(_)));
    }
}
