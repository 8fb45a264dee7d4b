//! Domain models for the collapsing pipeline.
//!
//! - [`AttributeGroup`] - The five tasting dimensions (Color, Nose, ...)
//! - [`Table`] / [`SourceRecord`] - The loaded one-hot source table
//! - [`Descriptors`] - Ordered, non-empty descriptor token list
//! - [`TastingNote`] - One collapsed output row

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Attribute Groups
// =============================================================================

/// A categorical tasting dimension encoded as a block of indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeGroup {
    Color,
    Nose,
    Body,
    Palate,
    Finish,
}

/// How a group turns its set indicators into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupFormat {
    /// First set column only, verbatim.
    FirstMatch,
    /// Every set column, lower-cased.
    LowercaseList,
    /// Every set column, as declared.
    List,
}

impl AttributeGroup {
    /// Groups in source column order.
    pub const ALL: [AttributeGroup; 5] = [
        AttributeGroup::Color,
        AttributeGroup::Nose,
        AttributeGroup::Body,
        AttributeGroup::Palate,
        AttributeGroup::Finish,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AttributeGroup::Color => "Color",
            AttributeGroup::Nose => "Nose",
            AttributeGroup::Body => "Body",
            AttributeGroup::Palate => "Palate",
            AttributeGroup::Finish => "Finish",
        }
    }

    pub fn format(self) -> GroupFormat {
        match self {
            AttributeGroup::Color => GroupFormat::FirstMatch,
            AttributeGroup::Nose => GroupFormat::LowercaseList,
            AttributeGroup::Body | AttributeGroup::Palate | AttributeGroup::Finish => {
                GroupFormat::List
            }
        }
    }

    /// Suffix markers dropped from header names when reporting tokens.
    pub fn strippable_markers(self) -> &'static [char] {
        match self {
            AttributeGroup::Palate => &['1'],
            AttributeGroup::Finish => &['1', '2'],
            AttributeGroup::Color | AttributeGroup::Nose | AttributeGroup::Body => &[],
        }
    }
}

impl fmt::Display for AttributeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Source Table
// =============================================================================

/// One data row of the source table, fields in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRecord {
    /// 1-based line number in the source file
    pub line: u64,
    pub fields: Vec<String>,
}

impl SourceRecord {
    pub fn get(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }
}

/// The whole source table held in memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<SourceRecord>,
}

impl Table {
    /// Position of a header, matched exactly.
    pub fn position_of(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Collapsed Output
// =============================================================================

/// Descriptor tokens of one group, in declared column order.
///
/// Never empty: a group without set indicators has no `Descriptors` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Descriptors(Vec<String>);

impl Descriptors {
    pub fn from_tokens(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens))
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn map_tokens(&mut self, f: impl Fn(&str) -> Option<String>) {
        for token in &mut self.0 {
            if let Some(replacement) = f(token) {
                *token = replacement;
            }
        }
    }
}

/// Quoted, comma-joined: `"peaty, smoky"`.
impl fmt::Display for Descriptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.join(", "))
    }
}

/// One collapsed row of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TastingNote {
    pub name: String,
    pub color: Option<String>,
    pub nose: Option<Descriptors>,
    pub body: Option<Descriptors>,
    pub palate: Option<Descriptors>,
    pub finish: Option<Descriptors>,
    pub percent: String,
    pub region: String,
    pub district: String,
}

impl TastingNote {
    /// Number of output columns.
    pub const WIDTH: usize = 9;

    /// Cells in output column order; absent groups become empty cells.
    pub fn cells(&self) -> [String; TastingNote::WIDTH] {
        fn list(d: &Option<Descriptors>) -> String {
            d.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        [
            self.name.clone(),
            self.color.clone().unwrap_or_default(),
            list(&self.nose),
            list(&self.body),
            list(&self.palate),
            list(&self.finish),
            self.percent.clone(),
            self.region.clone(),
            self.district.clone(),
        ]
    }

    pub fn descriptors_mut(&mut self) -> impl Iterator<Item = &mut Descriptors> {
        [&mut self.nose, &mut self.body, &mut self.palate, &mut self.finish]
            .into_iter()
            .flatten()
    }
}
