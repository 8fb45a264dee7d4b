//! Table assembly.
//!
//! Joins the collapsed groups with the passthrough columns in the fixed
//! output order `Name, Color, Nose, Body, Palate, Finish, Percent, Region,
//! District`. Passthrough columns are found by their source header
//! ([`SourceColumns`]) and relabelled once with [`PresentationNames`].

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::models::{SourceRecord, Table, TastingNote};
use crate::transform::collapse::CollapsedGroups;

/// Header names of the passthrough columns in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceColumns {
    pub name: String,
    pub percent: String,
    pub region: String,
    pub district: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            name: "NAME".to_string(),
            percent: "%".to_string(),
            region: "REGION".to_string(),
            district: "DISTRICT".to_string(),
        }
    }
}

/// Built-in sets of output header labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// `Name,Color,...,District`
    #[default]
    Title,
    /// `name,color,...,district`
    Lower,
}

/// Output header labels, in output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationNames {
    pub name: String,
    pub color: String,
    pub nose: String,
    pub body: String,
    pub palate: String,
    pub finish: String,
    pub percent: String,
    pub region: String,
    pub district: String,
}

impl PresentationNames {
    pub fn for_style(style: HeaderStyle) -> Self {
        let title = Self {
            name: "Name".to_string(),
            color: "Color".to_string(),
            nose: "Nose".to_string(),
            body: "Body".to_string(),
            palate: "Palate".to_string(),
            finish: "Finish".to_string(),
            percent: "Percent".to_string(),
            region: "Region".to_string(),
            district: "District".to_string(),
        };

        match style {
            HeaderStyle::Title => title,
            HeaderStyle::Lower => Self {
                name: title.name.to_lowercase(),
                color: title.color.to_lowercase(),
                nose: title.nose.to_lowercase(),
                body: title.body.to_lowercase(),
                palate: title.palate.to_lowercase(),
                finish: title.finish.to_lowercase(),
                percent: title.percent.to_lowercase(),
                region: title.region.to_lowercase(),
                district: title.district.to_lowercase(),
            },
        }
    }

    pub fn header_row(&self) -> [&str; TastingNote::WIDTH] {
        [
            self.name.as_str(),
            self.color.as_str(),
            self.nose.as_str(),
            self.body.as_str(),
            self.palate.as_str(),
            self.finish.as_str(),
            self.percent.as_str(),
            self.region.as_str(),
            self.district.as_str(),
        ]
    }
}

impl Default for PresentationNames {
    fn default() -> Self {
        Self::for_style(HeaderStyle::Title)
    }
}

/// Positions of the passthrough columns in one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passthrough {
    pub name: usize,
    pub percent: usize,
    pub region: usize,
    pub district: usize,
}

impl Passthrough {
    /// Locate the passthrough columns, case-sensitively.
    pub fn resolve(table: &Table, columns: &SourceColumns) -> SchemaResult<Self> {
        let find = |wanted: &str| {
            table
                .position_of(wanted)
                .ok_or_else(|| SchemaError::MissingColumn(wanted.to_string()))
        };

        Ok(Self {
            name: find(columns.name.as_str())?,
            percent: find(columns.percent.as_str())?,
            region: find(columns.region.as_str())?,
            district: find(columns.district.as_str())?,
        })
    }
}

/// Build the output row for one source record.
pub fn assemble(
    record: &SourceRecord,
    groups: CollapsedGroups,
    passthrough: &Passthrough,
) -> TastingNote {
    let value = |position: usize| record.get(position).unwrap_or_default().to_string();

    TastingNote {
        name: value(passthrough.name),
        color: groups.color,
        nose: groups.nose,
        body: groups.body,
        palate: groups.palate,
        finish: groups.finish,
        percent: value(passthrough.percent),
        region: value(passthrough.region),
        district: value(passthrough.district),
    }
}
