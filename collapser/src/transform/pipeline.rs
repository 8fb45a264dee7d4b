//! End-to-end collapsing run.
//!
//! ```text
//! load ─▶ bind schema ─▶ resolve passthrough ─▶ collapse + assemble ─▶ render ─▶ write
//! ```
//!
//! Every step that can fail runs before the output file is touched, so a
//! failed run never leaves partial output behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use whisky_collapser::{run, CollapseOptions};
//!
//! let report = run(&CollapseOptions::default())?;
//! println!("Collapsed {} rows", report.rows);
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{CollapseOptions, SchemaSource};
use crate::error::{DictionaryResult, PipelineResult, SchemaResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning, LogEntry, LOG_SINK};
use crate::models::{Table, TastingNote};
use crate::output::{
    find_delimiter_collisions, render, write_output, DelimiterCollision, Dictionary,
    SubstitutionMode,
};
use crate::parser::{load_table, ParseResult};
use crate::schema::{Layout, Schema};
use crate::transform::assemble::{assemble, Passthrough};
use crate::transform::collapse::collapse_record;

/// Summary of one run, written as JSON when a report path is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapseReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: String,
    pub delimiter: char,
    /// Data rows read, and written
    pub rows: usize,
    /// Header columns of the source
    pub columns: usize,
    pub schema: SchemaSource,
    pub substitution: SubstitutionMode,
    pub collisions: Vec<DelimiterCollision>,
    pub warnings: Vec<String>,
    pub log: Vec<LogEntry>,
    pub generated_at: DateTime<Utc>,
}

/// A loaded table with its bound schema and passthrough columns.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub parsed: ParseResult,
    pub schema: Schema,
    pub passthrough: Passthrough,
}

/// Bind the indicator schema to a header row.
pub fn bind_schema(headers: &[String], source: SchemaSource) -> SchemaResult<Schema> {
    match source {
        SchemaSource::Declared => {
            let schema = Schema::scotch();
            schema.verify(headers)?;
            Ok(schema.clone())
        }
        SchemaSource::Inferred => Schema::infer(headers, &Layout::scotch()),
    }
}

/// Built-in dictionary, or the one stored at `path`.
pub fn load_dictionary(path: Option<&Path>) -> DictionaryResult<Dictionary> {
    match path {
        Some(path) => Dictionary::load(path),
        None => Ok(Dictionary::default()),
    }
}

/// One output note per source record, in source order.
pub fn collapse_table(table: &Table, schema: &Schema, passthrough: &Passthrough) -> Vec<TastingNote> {
    table
        .records
        .iter()
        .map(|record| assemble(record, collapse_record(record, schema), passthrough))
        .collect()
}

/// Load the input and bind everything the collapse needs.
pub fn prepare(options: &CollapseOptions) -> PipelineResult<Prepared> {
    log_info(format!("📖 Reading {}...", options.input.display()));
    let parsed = load_table(&options.input, options.delimiter)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.table.len(),
        parsed.table.headers.len()
    ));

    log_info("📋 Binding indicator schema...");
    let schema = bind_schema(&parsed.table.headers, options.schema)?;
    for group in &schema.groups {
        let positions = group.positions();
        log_info_indent(
            format!("{}: columns {}..{}", group.group, positions.start, positions.end),
            1,
        );
    }

    let passthrough = Passthrough::resolve(&parsed.table, &options.source_columns)?;

    Ok(Prepared { parsed, schema, passthrough })
}

/// Collapsed notes without serializing or writing anything.
pub fn preview(options: &CollapseOptions) -> PipelineResult<Vec<TastingNote>> {
    let prepared = prepare(options)?;
    Ok(collapse_table(&prepared.parsed.table, &prepared.schema, &prepared.passthrough))
}

/// Run the whole pipeline and write the output file.
pub fn run(options: &CollapseOptions) -> PipelineResult<CollapseReport> {
    let mut warnings = Vec::new();

    let Prepared { parsed, schema, passthrough } = prepare(options)?;
    let dictionary = load_dictionary(options.dictionary_path.as_deref())?;

    if parsed.table.is_empty() {
        let msg = "Source has no data rows, writing header only".to_string();
        log_warning(&msg);
        warnings.push(msg);
    }

    log_info("🔄 Collapsing attribute groups...");
    let notes = collapse_table(&parsed.table, &schema, &passthrough);
    log_success(format!("{} tasting notes", notes.len()));

    log_info(format!(
        "📝 Rendering with {} dictionary entries ({:?} mode)...",
        dictionary.entries().len(),
        options.substitution
    ));
    let text = render(
        &notes,
        &options.presentation,
        &dictionary,
        options.substitution,
        options.serialize_delimiter,
        options.output_delimiter,
    )?;

    let collisions = find_delimiter_collisions(&text, options.output_delimiter);
    for collision in &collisions {
        let msg = format!(
            "Row {} splits into {} fields instead of {} on '{}'",
            collision.row,
            collision.fields,
            collision.expected,
            format_delimiter(options.output_delimiter)
        );
        log_warning(&msg);
        warnings.push(msg);
    }

    write_output(&options.output, &text)?;
    log_success(format!("💾 Saved to {}", options.output.display()));

    let mut report = CollapseReport {
        input: options.input.clone(),
        output: options.output.clone(),
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        rows: notes.len(),
        columns: parsed.table.headers.len(),
        schema: options.schema,
        substitution: options.substitution,
        collisions,
        warnings,
        log: LOG_SINK.drain(),
        generated_at: Utc::now(),
    };

    // Output is already on disk here; report failures only warn
    if let Some(path) = &options.report_path {
        if let Err(e) = write_report(path, &report) {
            let msg = format!("Report not written: {}", e);
            log_warning(&msg);
            report.warnings.push(msg);
        }
    }

    Ok(report)
}

fn write_report(path: &Path, report: &CollapseReport) -> PipelineResult<()> {
    write_output(path, &serde_json::to_string_pretty(report)?)?;
    log_success(format!("Report saved to {}", path.display()));
    Ok(())
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
