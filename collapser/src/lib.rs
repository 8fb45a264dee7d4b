//! # Whisky collapser - one-hot tasting notes to descriptor lists
//!
//! Turns the wide scotch tasting table (one indicator column per color,
//! nose, body, palate and finish descriptor) into a narrow table with one
//! human-readable cell per attribute group.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ scotch.csv  │────▶│   Parser    │────▶│  Collapse   │────▶│ cleanData-  │
//! │ (one-hot)   │     │  (auto-enc) │     │ + Assemble  │     │  Set.csv    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲                                       ▲
//!                         Schema                                Dictionary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use whisky_collapser::{run, CollapseOptions};
//!
//! let report = run(&CollapseOptions::default()).unwrap();
//! println!("Collapsed {} rows", report.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Default paths, delimiters and run options
//! - [`logs`] - Leveled progress log
//! - [`models`] - Attribute groups, source records, tasting notes
//! - [`parser`] - Table loading with auto-detection
//! - [`schema`] - Indicator column declarations
//! - [`transform`] - Collapsing, assembly and the pipeline
//! - [`output`] - Serialization and the substitution dictionary

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Loading
pub mod parser;
pub mod schema;

// Transformation
pub mod transform;

// Output
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError,
    SchemaError,
    DictionaryError,
    OutputError,
    PipelineError,
    PipelineResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{CollapseOptions, SchemaSource, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AttributeGroup,
    Descriptors,
    SourceRecord,
    Table,
    TastingNote,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    load_table,
    parse_bytes,
    parse_table,
    detect_encoding,
    detect_delimiter,
    decode_content,
    ParseResult,
};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{GroupRange, GroupSchema, IndicatorColumn, Layout, Schema};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    assemble,
    collapse_record,
    HeaderStyle,
    Passthrough,
    PresentationNames,
    SourceColumns,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{
    render,
    DelimiterCollision,
    Dictionary,
    Substitution,
    SubstitutionMode,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    run,
    preview,
    prepare,
    bind_schema,
    collapse_table,
    load_dictionary,
    CollapseReport,
    Prepared,
};
