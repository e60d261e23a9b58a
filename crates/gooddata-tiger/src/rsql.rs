//! RSQL clause fragments for Tiger list and search endpoints.
//!
//! Grammar: `field=op=value` or `field==value`, clauses joined by `;` (logical AND). String
//! values are double quoted with `\` and `"` escaped. Builders return `None` when there is
//! nothing to filter on, so that absent criteria never turn into a clause.

use serde::{Deserialize, Serialize};

/// Escapes backslashes, then quotes.
pub fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn format_value(value: &str) -> String {
    format!("\"{}\"", escape_value(value))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOperator {
    In,
    Out,
}

impl ListOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ListOperator::In => "in",
            ListOperator::Out => "out",
        }
    }
}

/// `field=in=("a","b")`; `None` for missing or empty `values`.
pub fn build_list_clause<S: AsRef<str>>(
    field: &str,
    operator: ListOperator,
    values: Option<&[S]>,
) -> Option<String> {
    let values = values.filter(|values| !values.is_empty())?;
    let list = values
        .iter()
        .map(|value| format_value(value.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("{field}={}=({list})", operator.as_str()))
}

/// `field=="value"`; `None` for missing or empty `value`.
pub fn build_is_clause(field: &str, value: Option<&str>) -> Option<String> {
    let value = value.filter(|value| !value.is_empty())?;
    Some(format!("{field}=={}", format_value(value)))
}

/// `field=isnull=true|false`.
pub fn build_is_null_clause(field: &str, is_null: Option<bool>) -> Option<String> {
    is_null.map(|is_null| format!("{field}=isnull={is_null}"))
}

/// Case-insensitive substring match: `field=containsic="value"`.
pub fn build_contains_ic_clause(field: &str, value: Option<&str>) -> Option<String> {
    let value = value.filter(|value| !value.is_empty())?;
    Some(format!("{field}=containsic={}", format_value(value)))
}

/// Joins the present, non-empty clauses with `;`. `None` when nothing is left.
pub fn join_clauses<I>(clauses: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let clauses: Vec<String> = clauses
        .into_iter()
        .flatten()
        .filter(|clause| !clause.is_empty())
        .collect();
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(";"))
    }
}

/// Structured criteria of an entity list or search request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitySearchFilter {
    pub title_contains: Option<String>,
    pub ids: Vec<String>,
    pub created_by: Option<String>,
    pub tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    /// `Some(false)` keeps live entities only, `Some(true)` deleted ones only.
    pub is_deleted: Option<bool>,
}

/// RSQL `filter` query parameter for `filter`; `None` when it selects everything.
pub fn build_clause_for_filter(filter: &EntitySearchFilter) -> Option<String> {
    join_clauses([
        build_contains_ic_clause("title", filter.title_contains.as_deref()),
        build_list_clause("id", ListOperator::In, Some(filter.ids.as_slice())),
        build_is_clause("createdBy.id", filter.created_by.as_deref()),
        build_list_clause("tags", ListOperator::In, Some(filter.tags.as_slice())),
        build_list_clause("tags", ListOperator::Out, Some(filter.exclude_tags.as_slice())),
        build_is_null_clause("deletedAt", filter.is_deleted.map(|deleted| !deleted)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_backslash_before_quote() {
        assert_eq!(escape_value(r#"a\"b"#), r#"a\\\"b"#);
        assert_eq!(escape_value(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(format_value(r"C:\dir"), r#""C:\\dir""#);
    }

    #[test]
    fn list_clause_quotes_every_value() {
        assert_eq!(
            build_list_clause("id", ListOperator::In, Some(&["a", "b\"c"][..])),
            Some(r#"id=in=("a","b\"c")"#.to_string())
        );
        assert_eq!(
            build_list_clause("tags", ListOperator::Out, Some(&["x"][..])),
            Some(r#"tags=out=("x")"#.to_string())
        );
        assert_eq!(build_list_clause::<&str>("id", ListOperator::In, None), None);
        assert_eq!(build_list_clause::<&str>("id", ListOperator::In, Some(&[][..])), None);
    }

    #[test]
    fn is_clauses_skip_empty_values() {
        assert_eq!(build_is_clause("title", Some("x")), Some(r#"title=="x""#.to_string()));
        assert_eq!(build_is_clause("title", Some("")), None);
        assert_eq!(build_is_clause("title", None), None);
        assert_eq!(
            build_is_null_clause("deletedAt", Some(true)),
            Some("deletedAt=isnull=true".to_string())
        );
        assert_eq!(
            build_contains_ic_clause("title", Some("Sales")),
            Some(r#"title=containsic="Sales""#.to_string())
        );
    }

    #[test]
    fn join_never_leaves_dangling_separators() {
        assert_eq!(
            join_clauses([
                None,
                Some(r#"a=="1""#.to_string()),
                Some(String::new()),
                Some("b=isnull=false".to_string()),
            ]),
            Some(r#"a=="1";b=isnull=false"#.to_string())
        );
        assert_eq!(join_clauses([None, Some(String::new())]), None);
        assert_eq!(join_clauses(Vec::<Option<String>>::new()), None);
    }

    #[test]
    fn search_filter_builds_combined_clause() {
        let filter = EntitySearchFilter {
            title_contains: Some("revenue".to_string()),
            tags: vec!["finance".to_string()],
            exclude_tags: vec!["draft".to_string()],
            is_deleted: Some(false),
            ..Default::default()
        };
        assert_eq!(
            build_clause_for_filter(&filter),
            Some(
                r#"title=containsic="revenue";tags=in=("finance");tags=out=("draft");deletedAt=isnull=true"#
                    .to_string()
            )
        );
        assert_eq!(build_clause_for_filter(&EntitySearchFilter::default()), None);
    }
}
