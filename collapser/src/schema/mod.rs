//! Indicator column schema.
//!
//! Every attribute group is an ordered list of [`IndicatorColumn`]s bound to
//! fixed positions in the source header. Each column carries the token it
//! reports, so suffix markers (`full.1`, `DRY1`) are resolved here once and
//! never re-parsed while collapsing.
//!
//! Two ways to get a schema:
//!
//! - [`Schema::scotch`] - the built-in declaration for the scotch dataset;
//!   [`Schema::verify`] checks a header row against it.
//! - [`Schema::infer`] - derive columns from any header row using a
//!   positional [`Layout`].
//!
//! ```text
//! position:  0    1     2 ........ 15  16 ...... 27  28 ... 35  36 ..... 50  51 ...... 69
//!            id   NAME  Color          Nose          Body       Palate       Finish
//! ```

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{SchemaError, SchemaResult};
use crate::models::AttributeGroup;

// =============================================================================
// Columns
// =============================================================================

/// One one-hot column of an attribute group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorColumn {
    /// Position in the source header row
    pub position: usize,
    /// Header name as declared
    pub header: String,
    /// Descriptor reported when the column is set
    pub token: String,
}

/// The ordered columns of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSchema {
    pub group: AttributeGroup,
    pub columns: Vec<IndicatorColumn>,
}

impl GroupSchema {
    pub fn positions(&self) -> Range<usize> {
        match (self.columns.first(), self.columns.last()) {
            (Some(first), Some(last)) => first.position..last.position + 1,
            _ => 0..0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub groups: Vec<GroupSchema>,
}

// =============================================================================
// Suffix markers
// =============================================================================

static SUFFIX_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.+?)[._-]?(?P<marker>[0-9])$").expect("suffix marker pattern is valid")
});

/// Token for a header, dropping a trailing marker digit listed in `markers`
/// together with its separator.
///
/// `full.1` → `full`, `DRY1` → `DRY`; headers without a listed marker are
/// returned unchanged.
pub fn strip_suffix_marker<'a>(header: &'a str, markers: &[char]) -> &'a str {
    if markers.is_empty() {
        return header;
    }

    SUFFIX_MARKER
        .captures(header)
        .filter(|caps| {
            caps.name("marker")
                .and_then(|m| m.as_str().chars().next())
                .is_some_and(|c| markers.contains(&c))
        })
        .and_then(|caps| caps.name("base"))
        .map(|base| base.as_str())
        .unwrap_or(header)
}

// =============================================================================
// Declared scotch schema
// =============================================================================

struct ColumnDecl {
    header: &'static str,
    token: &'static str,
}

const fn same(name: &'static str) -> ColumnDecl {
    ColumnDecl { header: name, token: name }
}

const fn marked(header: &'static str, token: &'static str) -> ColumnDecl {
    ColumnDecl { header, token }
}

/// First indicator column; columns 0 and 1 are the row id and the name.
const FIRST_INDICATOR: usize = 2;

const COLOR: &[ColumnDecl] = &[
    same("wyne"),
    same("yellow"),
    same("v.pale"),
    same("pale"),
    same("p.gold"),
    same("gold"),
    same("o.gold"),
    same("f.gold"),
    same("bronze"),
    same("p.amber"),
    same("amber"),
    same("f.amber"),
    same("red"),
    same("sherry"),
];

const NOSE: &[ColumnDecl] = &[
    same("AROMA"),
    same("PEAT"),
    same("SWEET"),
    same("LIGHT"),
    same("FRESH"),
    same("DRY"),
    same("FRUIT"),
    same("GRASS"),
    same("SEA"),
    same("SHERRY"),
    same("SPICY"),
    same("RICH"),
];

const BODY: &[ColumnDecl] = &[
    same("soft"),
    same("med"),
    same("full"),
    same("round"),
    same("smooth"),
    same("light"),
    same("firm"),
    same("oily"),
];

const PALATE: &[ColumnDecl] = &[
    marked("full.1", "full"),
    same("dry"),
    marked("sherry.1", "sherry"),
    same("big"),
    marked("light.1", "light"),
    marked("smooth.1", "smooth"),
    same("clean"),
    same("fruit"),
    same("grass"),
    same("smoke"),
    same("sweet"),
    same("spice"),
    same("oil"),
    same("salt"),
    same("arome"),
];

const FINISH: &[ColumnDecl] = &[
    marked("full.2", "full"),
    marked("dry.1", "dry"),
    same("warm"),
    marked("big.1", "big"),
    marked("light.2", "light"),
    marked("smooth.2", "smooth"),
    marked("clean.1", "clean"),
    marked("fruit.1", "fruit"),
    marked("grass.1", "grass"),
    marked("smoke.1", "smoke"),
    marked("sweet.1", "sweet"),
    marked("spice.1", "spice"),
    marked("oil.1", "oil"),
    marked("salt.1", "salt"),
    marked("arome.1", "arome"),
    same("ling"),
    same("long"),
    same("very"),
    same("quick"),
];

static SCOTCH_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let declared: [(AttributeGroup, &[ColumnDecl]); 5] = [
        (AttributeGroup::Color, COLOR),
        (AttributeGroup::Nose, NOSE),
        (AttributeGroup::Body, BODY),
        (AttributeGroup::Palate, PALATE),
        (AttributeGroup::Finish, FINISH),
    ];

    let mut position = FIRST_INDICATOR;
    let groups = declared
        .into_iter()
        .map(|(group, decls)| {
            let columns = decls
                .iter()
                .map(|decl| {
                    let column = IndicatorColumn {
                        position,
                        header: decl.header.to_string(),
                        token: decl.token.to_string(),
                    };
                    position += 1;
                    column
                })
                .collect();
            GroupSchema { group, columns }
        })
        .collect();

    Schema { groups }
});

// =============================================================================
// Positional layout
// =============================================================================

/// Position range of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRange {
    pub group: AttributeGroup,
    pub start: usize,
    pub end: usize,
}

/// Group boundaries by header position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub ranges: Vec<GroupRange>,
}

impl Layout {
    /// Boundaries of the scotch dataset.
    pub fn scotch() -> Self {
        Self::contiguous(FIRST_INDICATOR, &[14, 12, 8, 15, 19])
    }

    /// Five back-to-back groups in [`AttributeGroup::ALL`] order.
    pub fn contiguous(start: usize, widths: &[usize; 5]) -> Self {
        let mut next = start;
        let ranges = AttributeGroup::ALL
            .iter()
            .zip(widths)
            .map(|(&group, &width)| {
                let range = GroupRange { group, start: next, end: next + width };
                next += width;
                range
            })
            .collect();
        Self { ranges }
    }

    /// Number of header columns the layout needs.
    pub fn width(&self) -> usize {
        self.ranges.iter().map(|r| r.end).max().unwrap_or(0)
    }

    fn validate(&self) -> SchemaResult<()> {
        let mut previous_end = 0;
        for range in &self.ranges {
            if range.start >= range.end {
                return Err(SchemaError::InvalidLayout(format!(
                    "{} range {}..{} is empty",
                    range.group, range.start, range.end
                )));
            }
            if range.start < previous_end {
                return Err(SchemaError::InvalidLayout(format!(
                    "{} range starts at {} before the previous group ends at {}",
                    range.group, range.start, previous_end
                )));
            }
            previous_end = range.end;
        }
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::scotch()
    }
}

// =============================================================================
// Schema operations
// =============================================================================

impl Schema {
    /// The declared scotch schema.
    pub fn scotch() -> &'static Schema {
        &SCOTCH_SCHEMA
    }

    /// Build a schema from whatever headers sit inside the layout ranges.
    pub fn infer(headers: &[String], layout: &Layout) -> SchemaResult<Schema> {
        layout.validate()?;
        check_width(layout.width(), headers.len())?;

        let groups = layout
            .ranges
            .iter()
            .map(|range| GroupSchema {
                group: range.group,
                columns: (range.start..range.end)
                    .map(|position| {
                        let header = &headers[position];
                        IndicatorColumn {
                            position,
                            header: header.clone(),
                            token: strip_suffix_marker(header, range.group.strippable_markers())
                                .to_string(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(Schema { groups })
    }

    /// Check that a header row matches the declared columns.
    ///
    /// A header may carry either the declared name (`full.1`) or the bare
    /// token (`full`) for files whose duplicate names were never
    /// disambiguated. Comparison is case-sensitive.
    pub fn verify(&self, headers: &[String]) -> SchemaResult<()> {
        check_width(self.width(), headers.len())?;

        for column in self.columns() {
            let found = &headers[column.position];
            if *found != column.header && *found != column.token {
                return Err(SchemaError::HeaderMismatch {
                    position: column.position,
                    expected: column.header.clone(),
                    found: found.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn columns(&self) -> impl Iterator<Item = &IndicatorColumn> {
        self.groups.iter().flat_map(|g| g.columns.iter())
    }

    /// Number of header columns the schema needs.
    pub fn width(&self) -> usize {
        self.columns().map(|c| c.position + 1).max().unwrap_or(0)
    }
}

fn check_width(expected: usize, found: usize) -> SchemaResult<()> {
    if found < expected {
        Err(SchemaError::TooFewColumns { expected, found })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scotch_headers() -> Vec<String> {
        let mut headers = vec!["".to_string(), "NAME".to_string()];
        headers.extend(Schema::scotch().columns().map(|c| c.header.clone()));
        headers.extend(["%", "REGION", "DISTRICT"].map(String::from));
        headers
    }

    #[test]
    fn test_scotch_group_boundaries() {
        let schema = Schema::scotch();
        let ranges: Vec<_> = schema.groups.iter().map(GroupSchema::positions).collect();
        assert_eq!(ranges, vec![2..16, 16..28, 28..36, 36..51, 51..70]);
        assert_eq!(schema.width(), 70);
    }

    #[test]
    fn test_scotch_matches_layout() {
        let headers = scotch_headers();
        let inferred = Schema::infer(&headers, &Layout::scotch()).unwrap();
        assert_eq!(&inferred, Schema::scotch());
    }

    #[test]
    fn test_verify_accepts_declared_headers() {
        assert!(Schema::scotch().verify(&scotch_headers()).is_ok());
    }

    #[test]
    fn test_verify_accepts_bare_duplicate_names() {
        let mut headers = scotch_headers();
        headers[36] = "full".to_string();
        headers[51] = "full".to_string();
        assert!(Schema::scotch().verify(&headers).is_ok());
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let mut headers = scotch_headers();
        headers[16] = "aroma".to_string();
        match Schema::scotch().verify(&headers) {
            Err(SchemaError::HeaderMismatch { position, expected, found }) => {
                assert_eq!(position, 16);
                assert_eq!(expected, "AROMA");
                assert_eq!(found, "aroma");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_verify_too_few_columns() {
        let headers: Vec<String> = scotch_headers().into_iter().take(40).collect();
        assert!(matches!(
            Schema::scotch().verify(&headers),
            Err(SchemaError::TooFewColumns { expected: 70, found: 40 })
        ));
    }

    #[test]
    fn test_strip_suffix_marker() {
        assert_eq!(strip_suffix_marker("DRY1", &['1']), "DRY");
        assert_eq!(strip_suffix_marker("full.1", &['1']), "full");
        assert_eq!(strip_suffix_marker("smooth.2", &['1', '2']), "smooth");
        assert_eq!(strip_suffix_marker("SWEET", &['1']), "SWEET");
        assert_eq!(strip_suffix_marker("light.2", &['1']), "light.2");
        assert_eq!(strip_suffix_marker("DRY1", &[]), "DRY1");
        assert_eq!(strip_suffix_marker("1", &['1']), "1");
    }

    #[test]
    fn test_infer_strips_per_group() {
        let headers: Vec<String> = ["id", "NAME", "PALE", "DRY1", "SWEET", "warm2", "long1"]
            .map(String::from)
            .to_vec();
        let layout = Layout {
            ranges: vec![
                GroupRange { group: AttributeGroup::Color, start: 2, end: 3 },
                GroupRange { group: AttributeGroup::Palate, start: 3, end: 5 },
                GroupRange { group: AttributeGroup::Finish, start: 5, end: 7 },
            ],
        };

        let schema = Schema::infer(&headers, &layout).unwrap();
        let tokens: Vec<&str> = schema.columns().map(|c| c.token.as_str()).collect();
        assert_eq!(tokens, vec!["PALE", "DRY", "SWEET", "warm", "long"]);
    }

    #[test]
    fn test_infer_rejects_overlapping_layout() {
        let headers: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let layout = Layout {
            ranges: vec![
                GroupRange { group: AttributeGroup::Color, start: 2, end: 5 },
                GroupRange { group: AttributeGroup::Nose, start: 4, end: 6 },
            ],
        };
        assert!(matches!(
            Schema::infer(&headers, &layout),
            Err(SchemaError::InvalidLayout(_))
        ));
    }
}
