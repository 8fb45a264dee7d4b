//! Category collapsing.
//!
//! Reduces each attribute group of a source record to the columns whose
//! indicator is set, then formats them per [`GroupFormat`]:
//!
//! | Group  | Output                                  |
//! |--------|-----------------------------------------|
//! | Color  | first set column, verbatim              |
//! | Nose   | every set column, lower-cased           |
//! | Body   | every set column                        |
//! | Palate | every set column, `1` marker stripped   |
//! | Finish | every set column, `1`/`2` stripped      |
//!
//! Marker stripping already happened when the schema was built; here every
//! column simply reports its `token`.

use crate::models::{AttributeGroup, Descriptors, GroupFormat, SourceRecord};
use crate::schema::{GroupSchema, IndicatorColumn, Schema};

/// The five collapsed cells of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapsedGroups {
    pub color: Option<String>,
    pub nose: Option<Descriptors>,
    pub body: Option<Descriptors>,
    pub palate: Option<Descriptors>,
    pub finish: Option<Descriptors>,
}

/// An indicator is set when its value is the numeric flag 1.
pub fn is_set(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|v| v == 1.0)
        .unwrap_or(false)
}

/// Columns of the group whose indicator is set, in declared order.
pub fn set_columns<'a>(
    record: &'a SourceRecord,
    group: &'a GroupSchema,
) -> impl Iterator<Item = &'a IndicatorColumn> + 'a {
    group
        .columns
        .iter()
        .filter(move |column| record.get(column.position).is_some_and(is_set))
}

/// Tokens a group reports for one record, shaped by its [`GroupFormat`].
pub fn group_tokens(record: &SourceRecord, group: &GroupSchema) -> Vec<String> {
    let set = set_columns(record, group);

    match group.group.format() {
        GroupFormat::FirstMatch => set.take(1).map(|c| c.token.clone()).collect(),
        GroupFormat::LowercaseList => set.map(|c| c.token.to_lowercase()).collect(),
        GroupFormat::List => set.map(|c| c.token.clone()).collect(),
    }
}

/// Collapse every group of one record.
pub fn collapse_record(record: &SourceRecord, schema: &Schema) -> CollapsedGroups {
    let mut collapsed = CollapsedGroups::default();

    for group in &schema.groups {
        let tokens = group_tokens(record, group);
        match group.group {
            AttributeGroup::Color => collapsed.color = tokens.into_iter().next(),
            AttributeGroup::Nose => collapsed.nose = Descriptors::from_tokens(tokens),
            AttributeGroup::Body => collapsed.body = Descriptors::from_tokens(tokens),
            AttributeGroup::Palate => collapsed.palate = Descriptors::from_tokens(tokens),
            AttributeGroup::Finish => collapsed.finish = Descriptors::from_tokens(tokens),
        }
    }

    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GroupRange, Layout};

    fn record(fields: &[&str]) -> SourceRecord {
        SourceRecord {
            line: 2,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn schema(headers: &[&str], ranges: &[(AttributeGroup, usize, usize)]) -> Schema {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let layout = Layout {
            ranges: ranges
                .iter()
                .map(|&(group, start, end)| GroupRange { group, start, end })
                .collect(),
        };
        Schema::infer(&headers, &layout).unwrap()
    }

    fn tokens(d: &Option<Descriptors>) -> Vec<&str> {
        d.as_ref()
            .map(|d| d.tokens().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_is_set() {
        assert!(is_set("1"));
        assert!(is_set(" 1 "));
        assert!(is_set("1.0"));
        assert!(!is_set("0"));
        assert!(!is_set(""));
        assert!(!is_set("2"));
        assert!(!is_set("yes"));
    }

    #[test]
    fn test_color_first_match_wins() {
        let s = schema(
            &["id", "NAME", "PALE", "GOLD", "AMBER"],
            &[(AttributeGroup::Color, 2, 5)],
        );
        let collapsed = collapse_record(&record(&["0", "x", "1", "1", "0"]), &s);
        assert_eq!(collapsed.color.as_deref(), Some("PALE"));
    }

    #[test]
    fn test_color_none_set() {
        let s = schema(&["id", "NAME", "PALE", "GOLD"], &[(AttributeGroup::Color, 2, 4)]);
        let collapsed = collapse_record(&record(&["0", "x", "0", "0"]), &s);
        assert_eq!(collapsed.color, None);
    }

    #[test]
    fn test_nose_lowercased_in_group_order() {
        let s = schema(
            &["id", "NAME", "PEATY", "SALTY", "SMOKY"],
            &[(AttributeGroup::Nose, 2, 5)],
        );
        let collapsed = collapse_record(&record(&["0", "x", "1", "0", "1"]), &s);
        assert_eq!(tokens(&collapsed.nose), vec!["peaty", "smoky"]);
        assert_eq!(collapsed.nose.unwrap().to_string(), "\"peaty, smoky\"");
    }

    #[test]
    fn test_body_keeps_case() {
        let s = schema(&["id", "NAME", "Soft", "FULL"], &[(AttributeGroup::Body, 2, 4)]);
        let collapsed = collapse_record(&record(&["0", "x", "1", "1"]), &s);
        assert_eq!(tokens(&collapsed.body), vec!["Soft", "FULL"]);
    }

    #[test]
    fn test_palate_strips_only_marker_one() {
        let s = schema(
            &["id", "NAME", "DRY1", "SWEET", "BIG2"],
            &[(AttributeGroup::Palate, 2, 5)],
        );
        let collapsed = collapse_record(&record(&["0", "x", "1", "1", "1"]), &s);
        assert_eq!(tokens(&collapsed.palate), vec!["DRY", "SWEET", "BIG2"]);
    }

    #[test]
    fn test_finish_strips_both_markers() {
        let s = schema(
            &["id", "NAME", "full.2", "dry.1", "ling"],
            &[(AttributeGroup::Finish, 2, 5)],
        );
        let collapsed = collapse_record(&record(&["0", "x", "1", "1", "1"]), &s);
        assert_eq!(tokens(&collapsed.finish), vec!["full", "dry", "ling"]);
    }

    #[test]
    fn test_token_count_matches_set_indicators() {
        let s = schema(
            &["id", "NAME", "a", "b", "c", "d", "e", "f"],
            &[(AttributeGroup::Nose, 2, 5), (AttributeGroup::Body, 5, 8)],
        );
        let rows = [
            ["0", "x", "1", "1", "1", "0", "0", "0"],
            ["0", "x", "0", "1", "0", "1", "0", "1"],
            ["0", "x", "0", "0", "0", "0", "0", "0"],
        ];

        for row in rows {
            let rec = record(&row);
            let collapsed = collapse_record(&rec, &s);
            let nose_set = row[2..5].iter().filter(|v| is_set(v)).count();
            let body_set = row[5..8].iter().filter(|v| is_set(v)).count();
            assert_eq!(tokens(&collapsed.nose).len(), nose_set);
            assert_eq!(tokens(&collapsed.body).len(), body_set);
        }
    }

    #[test]
    fn test_group_tokens_follow_format() {
        let s = schema(
            &["id", "NAME", "PALE", "GOLD", "Peaty", "Smoky", "Soft", "FULL"],
            &[
                (AttributeGroup::Color, 2, 4),
                (AttributeGroup::Nose, 4, 6),
                (AttributeGroup::Body, 6, 8),
            ],
        );
        let rec = record(&["0", "x", "1", "1", "1", "1", "1", "1"]);

        let tokens: Vec<Vec<String>> = s.groups.iter().map(|g| group_tokens(&rec, g)).collect();
        assert_eq!(tokens[0], vec!["PALE"]);
        assert_eq!(tokens[1], vec!["peaty", "smoky"]);
        assert_eq!(tokens[2], vec!["Soft", "FULL"]);
    }

    #[test]
    fn test_empty_group_is_absent_not_empty_list() {
        let s = schema(&["id", "NAME", "a", "b"], &[(AttributeGroup::Palate, 2, 4)]);
        let collapsed = collapse_record(&record(&["0", "x", "0", "0"]), &s);
        assert!(collapsed.palate.is_none());
    }

    #[test]
    fn test_scotch_record() {
        let schema = Schema::scotch();
        let mut fields = vec!["0".to_string(); 73];
        fields[1] = "Ardbeg".to_string();
        fields[7] = "1".to_string(); // gold
        fields[17] = "1".to_string(); // PEAT
        fields[24] = "1".to_string(); // SEA
        fields[29] = "1".to_string(); // med
        fields[36] = "1".to_string(); // full.1
        fields[51] = "1".to_string(); // full.2
        fields[68] = "1".to_string(); // very

        let rec = SourceRecord { line: 2, fields };
        let collapsed = collapse_record(&rec, schema);
        assert_eq!(collapsed.color.as_deref(), Some("gold"));
        assert_eq!(tokens(&collapsed.nose), vec!["peat", "sea"]);
        assert_eq!(tokens(&collapsed.body), vec!["med"]);
        assert_eq!(tokens(&collapsed.palate), vec!["full"]);
        assert_eq!(tokens(&collapsed.finish), vec!["full", "very"]);
    }
}
