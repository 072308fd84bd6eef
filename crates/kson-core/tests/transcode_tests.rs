use kson_core::{to_json, to_yaml};

/// Compare through `serde_json` so formatting differences don't matter.
fn assert_json_eq(actual: &str, expected: &str) {
    let va: serde_json::Value = serde_json::from_str(actual).expect("actual parses as JSON");
    let vb: serde_json::Value = serde_json::from_str(expected).expect("expected parses as JSON");
    assert_eq!(va, vb, "JSON mismatch:\n  actual:   {actual}\n  expected: {expected}");
}

// ============================================================================
// JSON superset
// ============================================================================

#[test]
fn valid_json_passes_through() {
    let docs = [
        "null",
        "true",
        "42",
        "-7",
        "3.14",
        r#""hello world""#,
        "[]",
        "{}",
        r#"{"a": 1, "b": [true, null, "x"], "c": {"d": 0.5}}"#,
        r#"["nested", ["deep", ["deeper"]]]"#,
        r#"{"escaped": "line\nbreak \"quoted\" slash\/tab\t"}"#,
        r#"{"unicode": "café"}"#,
    ];
    for doc in docs {
        let result = kson_core::parse(doc);
        assert!(
            result.messages.is_empty(),
            "JSON doc produced messages: {doc:?} -> {:?}",
            result.messages
        );
        assert_json_eq(&to_json(doc).expect("transcodes"), doc);
    }
}

#[test]
fn plain_kson_transcodes() {
    assert_eq!(to_json("name: test\nvalue: 123").unwrap(), r#"{"name":"test","value":123}"#);
    assert_eq!(to_json("list:\n  - 1\n  - 2").unwrap(), r#"{"list":[1,2]}"#);
    assert_eq!(to_json("flag: yes").unwrap(), r#"{"flag":"yes"}"#);
}

#[test]
fn numbers_emit_normalized() {
    assert_eq!(to_json("a: 007").unwrap(), r#"{"a":7}"#);
    assert_eq!(to_json("a: 01.50").unwrap(), r#"{"a":1.50}"#);
    assert_eq!(to_json("a: -0").unwrap(), r#"{"a":-0}"#);
}

#[test]
fn embed_blocks_become_json_strings() {
    let json = to_json("x: %\n  has %\\% literal\n  %%").unwrap();
    assert_eq!(json, "{\"x\":\"has %% literal\\n\"}");
}

#[test]
fn embed_tag_does_not_leak_into_json() {
    let json = to_json("x: %sql: meta\n  select 1\n  %%").unwrap();
    assert_eq!(json, "{\"x\":\"select 1\\n\"}");
}

#[test]
fn parse_errors_refuse_to_transcode() {
    let err = to_json("a: 'unterminated").unwrap_err();
    assert!(err.to_string().contains("line 1"), "{err}");
}

// ============================================================================
// YAML
// ============================================================================

#[test]
fn yaml_block_structure() {
    let yaml = to_yaml("a: 1\nb:\n  - x\n  - y").unwrap();
    assert_eq!(yaml, "a: 1\nb:\n  - x\n  - y");
}

#[test]
fn yaml_nested_objects_indent() {
    let yaml = to_yaml(r#"{"outer": {"inner": 1}}"#).unwrap();
    assert_eq!(yaml, "outer:\n  inner: 1");
}

#[test]
fn yaml_embeds_become_block_scalars() {
    let yaml = to_yaml("x: %\n  line1\n  line2\n  %%").unwrap();
    assert_eq!(yaml, "x: |\n  line1\n  line2");
}

#[test]
fn yaml_strings_never_escape_slashes() {
    let yaml = to_yaml(r#"{"path": "a\/b"}"#).unwrap();
    assert_eq!(yaml, "path: \"a/b\"");
}

#[test]
fn yaml_quotes_ambiguous_scalars() {
    let yaml = to_yaml(r#"{"a": "true", "b": "05", "c": "plain"}"#).unwrap();
    assert_eq!(yaml, "a: \"true\"\nb: \"05\"\nc: plain");
}

#[test]
fn yaml_objects_in_lists() {
    let yaml = to_yaml(r#"{"list": [{"a": 1, "b": 2}, {"c": 3}]}"#).unwrap();
    assert_eq!(yaml, "list:\n  - a: 1\n    b: 2\n  - c: 3");
}
