use kson_core::{analyze, parse, MessageKind, TokenKind};

// ============================================================================
// Token coverage
// ============================================================================

#[test]
fn token_lexemes_reconstruct_the_input() {
    let docs = [
        r#"{"a": 1, "b": [true, null]}"#,
        "key: value # comment\nlist:\n  - 1\n  - 2",
        "x: %tag: meta\n  body %\\% text\n  %%",
        "broken: 'no close",
        "nums: [007, 1.5e3, -0, 12abc]",
    ];
    for doc in docs {
        let result = parse(doc);
        let joined: String = result.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(joined, doc, "coverage failed for {doc:?}");
        assert_eq!(result.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}

// ============================================================================
// Duplicate keys
// ============================================================================

#[test]
fn duplicate_key_detected_at_second_occurrence() {
    let result = analyze("key1: v1\nkey2: v2\nkey1: v3");
    let dups: Vec<_> = result
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::ObjectDuplicateKey)
        .collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].params, vec!["key1".to_string()]);
    // Located at the second `key1`, line 2.
    assert_eq!(dups[0].location.start.line, 2);
    assert_eq!(dups[0].location.start.column, 0);
}

#[test]
fn duplicates_are_retained_in_the_tree() {
    let result = analyze("a: 1\na: 2");
    let value = result.value.expect("tree survives duplicates");
    let obj = value.as_object().expect("object");
    assert_eq!(obj.properties.len(), 2);
    // The lookup answers with the first occurrence.
    assert_eq!(obj.get("a").and_then(kson_core::Kson::as_i64), Some(1));
}

#[test]
fn plain_parse_does_not_report_duplicates() {
    let result = parse("a: 1\na: 2");
    assert!(result.messages.is_empty());
}

// ============================================================================
// Indent validation through analyze
// ============================================================================

#[test]
fn deceptive_indent_yields_one_nesting_issue() {
    let text = "key:\n   nested1: 80\n   nested2: 80000 nested3: 10000\n   nested4: 12000 nested5:\n   doubleNested: 14000";
    let result = analyze(text);
    let issues: Vec<_> = result
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::ObjectPropertyNestingIssue)
        .collect();
    assert_eq!(issues.len(), 1, "{:?}", result.messages);
    assert_eq!(issues[0].location.start.line, 4);
    // And nothing else fires on this input.
    assert_eq!(result.messages.len(), 1);
}

#[test]
fn clean_documents_analyze_clean() {
    let result = analyze("a: 1\nb:\n  c: 2\n  d: 3\nlist:\n  - 1\n  - 2");
    assert!(result.messages.is_empty(), "{:?}", result.messages);
}

#[test]
fn scalar_value_on_the_next_line_is_not_a_nesting_issue() {
    // Only a nested plain object is held to the strictly-deeper rule; a
    // bare scalar after `key:` has no structure to misrepresent.
    let result = analyze("a:\nb");
    assert!(result.messages.is_empty(), "{:?}", result.messages);
}

#[test]
fn misaligned_plain_siblings_are_reported() {
    let result = analyze("a: 1\n   b: 2");
    assert!(result
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::ObjectPropertiesMisaligned));
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn extra_content_keeps_the_prefix_tree() {
    let result = parse("a: 1\n]]");
    assert!(result.value.is_some());
    assert!(result
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::ExtraContent));
}

#[test]
fn bad_numbers_report_specific_kinds() {
    let kinds = [
        ("a: 12abc", MessageKind::InvalidDigits),
        ("a: 1.", MessageKind::DanglingDecimal),
        ("a: 1e", MessageKind::DanglingExpIndicator),
        ("a: 9223372036854775808", MessageKind::IntegerOverflow),
    ];
    for (doc, kind) in kinds {
        let result = parse(doc);
        assert!(
            result.messages.iter().any(|m| m.kind == kind),
            "expected {kind:?} for {doc:?}, got {:?}",
            result.messages
        );
    }
}

#[test]
fn unclosed_delimiters_recover() {
    let result = parse("{a: 1");
    assert!(result.value.is_some());
    assert!(result
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::UnclosedDelimiter));
}

#[test]
fn embed_without_close_reports_and_keeps_content() {
    let result = parse("x: %\n  body text");
    assert!(result
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::EmbedBlockNoClose));
    let value = result.value.expect("tree");
    let obj = value.as_object().expect("object");
    assert_eq!(obj.get("x").and_then(kson_core::Kson::as_str), Some("body text"));
}
