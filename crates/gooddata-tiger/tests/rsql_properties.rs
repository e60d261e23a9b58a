use gooddata_tiger::{build_list_clause, escape_value, format_value, ListOperator};
use proptest::prelude::*;
use regex::Regex;

fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn three_backslash_fixture() {
    // a, backslash, quote, b
    let input = "a\\\"b";
    assert_eq!(escape_value(input), "a\\\\\\\"b");
    assert_eq!(unescape(&escape_value(input)), input);
}

#[test]
fn list_clause_is_absent_without_values() {
    assert_eq!(build_list_clause::<String>("id", ListOperator::In, None), None);
    assert_eq!(build_list_clause::<String>("id", ListOperator::Out, Some(&[])), None);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn escape_round_trips(s in any::<String>()) {
        prop_assert_eq!(unescape(&escape_value(&s)), s);
    }

    #[test]
    fn formatted_value_has_no_bare_quotes(s in "[a-z\"\\\\ ]{0,16}") {
        let formatted = format_value(&s);
        let inner = &formatted[1..formatted.len() - 1];
        let bare_quote = Regex::new(r#"(^|[^\\])(\\\\)*""#).unwrap();
        prop_assert!(!bare_quote.is_match(inner), "bare quote in {}", formatted);
    }

    #[test]
    fn non_empty_list_clause_has_list_shape(
        values in proptest::collection::vec(any::<String>(), 1..8),
        out in any::<bool>(),
    ) {
        let operator = if out { ListOperator::Out } else { ListOperator::In };
        let clause = build_list_clause("field", operator, Some(values.as_slice()));
        let shape = Regex::new(r"(?s)^field=(in|out)=\(.*\)$").unwrap();
        prop_assert!(clause.as_deref().is_some_and(|clause| shape.is_match(clause)));
    }
}
