//! Transformation module.
//!
//! - Collapse: one-hot indicator groups to descriptor cells
//! - Assemble: collapsed cells plus passthrough columns to output rows
//! - Pipeline: the end-to-end run

pub mod assemble;
pub mod collapse;
pub mod pipeline;

pub use assemble::{assemble, HeaderStyle, Passthrough, PresentationNames, SourceColumns};
pub use collapse::{collapse_record, group_tokens, is_set, CollapsedGroups};
pub use pipeline::*;
