//! Property-based round-trip tests.
//!
//! Random JSON values are generated with `proptest`, serialized through
//! `serde_json`, and pushed through the pipeline to check the crate's core
//! guarantees on inputs no hand-written test would think of:
//!
//! - every valid JSON document parses with no messages (JSON superset);
//! - token lexemes always reconstruct the input exactly;
//! - `format` is idempotent in each style;
//! - re-parsing formatted output yields the same abstract value.

use kson_core::{format, parse, FormatOptions, IndentStyle, Style};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,12}").unwrap(),
        prop::string::string_regex("[a-z ]{1,10}").unwrap(),
        Just("$ref".to_string()),
        Just("true".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("true".to_string()),
        Just("null".to_string()),
        Just("yes".to_string()),
        Just("05".to_string()),
        Just("-dash".to_string()),
        Just("it's quoted".to_string()),
        Just("both ' and \"".to_string()),
        Just("line\nbreak\ttab".to_string()),
        Just("café 你好".to_string()),
        Just("a: b, c".to_string()),
        Just("%% not an embed".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e9f64..1.0e9f64).prop_filter_map("finite fraction", |f| {
            serde_json::Number::from_f64(f).map(Value::Number)
        }),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number(),
        arb_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6).prop_map(|pairs| {
                let mut map = Map::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn styles() -> [FormatOptions; 3] {
    [
        FormatOptions {
            indent: IndentStyle::Spaces(2),
            style: Style::Plain,
        },
        FormatOptions {
            indent: IndentStyle::Spaces(2),
            style: Style::Delimited,
        },
        FormatOptions {
            indent: IndentStyle::Spaces(2),
            style: Style::Compact,
        },
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn json_documents_parse_clean(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let result = parse(&text);
        prop_assert!(result.messages.is_empty(), "messages: {:?}", result.messages);
        prop_assert!(result.value.is_some());
    }

    #[test]
    fn token_coverage_reconstructs_input(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let result = parse(&text);
        let joined: String = result.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn parsed_value_matches_serde(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let parsed = parse(&text).value.unwrap();
        prop_assert_eq!(parsed.to_serde_json(), value);
    }

    #[test]
    fn format_is_idempotent(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        for options in styles() {
            let once = format(&text, &options);
            let twice = format(&once, &options);
            prop_assert_eq!(&once, &twice, "style {:?}", options.style);
        }
    }

    #[test]
    fn formatted_output_reparses_to_the_same_value(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let original = parse(&text).value.unwrap();
        for options in styles() {
            let formatted = format(&text, &options);
            let reparsed = parse(&formatted).value;
            prop_assert!(reparsed.is_some(), "style {:?} output unparseable:\n{}", options.style, formatted);
            prop_assert!(
                original.structural_eq(reparsed.as_ref().unwrap()),
                "style {:?} changed the value:\n{}",
                options.style,
                formatted
            );
        }
    }

    #[test]
    fn to_json_round_trips_through_serde(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let json = kson_core::to_json(&text).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, value);
    }
}
