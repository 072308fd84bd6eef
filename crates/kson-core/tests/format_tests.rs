use kson_core::{format, parse, FormatOptions, IndentStyle, Style};

fn plain() -> FormatOptions {
    FormatOptions {
        indent: IndentStyle::Spaces(2),
        style: Style::Plain,
    }
}

fn delimited() -> FormatOptions {
    FormatOptions {
        indent: IndentStyle::Spaces(2),
        style: Style::Delimited,
    }
}

fn compact() -> FormatOptions {
    FormatOptions {
        indent: IndentStyle::Spaces(2),
        style: Style::Compact,
    }
}

/// The abstract values of two texts are the same.
fn assert_same_value(a: &str, b: &str) {
    let va = parse(a).value.expect("left value");
    let vb = parse(b).value.expect("right value");
    assert!(
        va.structural_eq(&vb),
        "values differ:\n  left:  {a:?}\n  right: {b:?}"
    );
}

fn assert_idempotent(text: &str, options: &FormatOptions) {
    let once = format(text, options);
    let twice = format(&once, options);
    assert_eq!(once, twice, "not idempotent for {text:?}");
}

// ============================================================================
// Style basics
// ============================================================================

#[test]
fn plain_format_basics() {
    let out = format(r#"{"name": "test", "value": 123}"#, &plain());
    assert_eq!(out, "name: test\nvalue: 123");
}

#[test]
fn delimited_format_of_a_list() {
    let out = format(r#"{"name": "test", "list": [1, 2, 3]}"#, &delimited());
    assert_eq!(out, "{\n  name: test\n  list: <\n    - 1\n    - 2\n    - 3\n  >\n}");
}

#[test]
fn compact_format_of_nested_structure() {
    let out = format(r#"{"list":[1,2,[3,4]],"key":"value"}"#, &compact());
    assert_eq!(out, "list:[1 2 [3 4]]key:value");
}

#[test]
fn plain_nested_object_indents() {
    let out = format(r#"{"a": {"b": 1}, "c": 2}"#, &plain());
    assert_eq!(out, "a:\n  b: 1\n  .\nc: 2");
}

#[test]
fn plain_trailing_container_needs_no_terminator() {
    let out = format(r#"{"c": 2, "a": {"b": 1}}"#, &plain());
    assert_eq!(out, "c: 2\na:\n  b: 1");
}

#[test]
fn plain_list_under_key() {
    let out = format(r#"{"list": [1, 2], "next": "ok"}"#, &plain());
    assert_eq!(out, "list:\n  - 1\n  - 2\n  =\nnext: ok");
}

#[test]
fn plain_array_of_arrays_hangs_dashes() {
    let out = format("[[1, 2], [3]]", &plain());
    assert_eq!(out, "- - 1\n  - 2\n  =\n- - 3");
}

#[test]
fn empty_containers_stay_inline() {
    assert_eq!(format(r#"{"a": {}, "b": []}"#, &plain()), "a: {}\nb: []");
    assert_eq!(format("[]", &delimited()), "<>");
    assert_eq!(format("{}", &compact()), "{}");
}

#[test]
fn top_level_primitives_stay_bare() {
    assert_eq!(format("42", &plain()), "42");
    assert_eq!(format("hello", &delimited()), "hello");
    assert_eq!(format("true", &compact()), "true");
}

// ============================================================================
// String quoting
// ============================================================================

#[test]
fn simple_strings_drop_quotes() {
    assert_eq!(format(r#"{"a": "word"}"#, &plain()), "a: word");
}

#[test]
fn reserved_words_stay_quoted() {
    for word in ["true", "False", "null", "yes", "NO", "y", "n"] {
        let out = format(&format!(r#"{{"a": "{word}"}}"#), &plain());
        assert_eq!(out, format!("a: '{word}'"), "reserved {word}");
    }
}

#[test]
fn digit_initial_strings_stay_quoted() {
    // "025" must not round-trip into a number.
    let out = format(r#"{"a": "025"}"#, &plain());
    assert_eq!(out, "a: '025'");
    assert_same_value(r#"{"a": "025"}"#, &out);
}

#[test]
fn strings_with_single_quotes_switch_to_double() {
    let out = format(r#"{"a": "it's"}"#, &plain());
    assert_eq!(out, "a: \"it's\"");
}

#[test]
fn number_forms_are_normalized() {
    assert_eq!(format("a: 007", &plain()), "a: 7");
    assert_eq!(format("a: 1.50", &plain()), "a: 1.50");
    assert_eq!(format("a: -0", &plain()), "a: -0");
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn leading_comments_stay_with_their_construct() {
    let out = format("# header\na: 1\n# about b\nb: 2", &plain());
    assert_eq!(out, "# header\na: 1\n# about b\nb: 2");
}

#[test]
fn trailing_comments_float_above_their_value() {
    let out = format("a: 1 # note\nb: 2", &plain());
    assert_eq!(out, "# note\na: 1\nb: 2");
}

#[test]
fn blank_lines_between_comments_squeeze() {
    let out = format("# one\n\n\n# two\na: 1", &plain());
    assert_eq!(out, "# one\n# two\na: 1");
}

#[test]
fn document_trailing_comments_survive(){
    let out = format("a: 1\n# the end", &plain());
    assert_eq!(out, "a: 1\n# the end");
}

#[test]
fn comments_survive_delimited_style() {
    let out = format("# top\na: 1", &delimited());
    assert_eq!(out, "# top\n{\n  a: 1\n}");
}

// ============================================================================
// Embed blocks
// ============================================================================

#[test]
fn embed_blocks_round_trip_textually() {
    let text = "x: %\n  has %\\% literal\n  %%";
    assert_eq!(format(text, &plain()), text);
}

#[test]
fn embed_delimiter_normalizes_to_percent() {
    let out = format("x: $sql: meta\n  select 1\n  $$", &plain());
    assert_eq!(out, "x: %sql: meta\n  select 1\n  %%");
}

#[test]
fn embed_preserves_tag_with_empty_metadata() {
    let out = format("x: %sql:\n  select 1\n  %%", &plain());
    assert_eq!(out, "x: %sql:\n  select 1\n  %%");
}

#[test]
fn embed_content_reindents_with_the_style() {
    let out = format(
        "wrapper:\n  x: %\n        deep\n        %%",
        &plain(),
    );
    assert_eq!(out, "wrapper:\n  x: %\n    deep\n    %%");
    assert_same_value("wrapper:\n  x: %\n        deep\n        %%", &out);
}

// ============================================================================
// Idempotence and value round-trips
// ============================================================================

#[test]
fn formatting_is_idempotent_per_style() {
    let samples = [
        r#"{"name": "test", "value": 123}"#,
        r#"{"a": {"b": 1}, "c": [1, 2, [3]], "d": "x y"}"#,
        "x: %tag: meta\n  body %\\% here\n  %%",
        "# comment\na: 1 # trailing\nlist:\n  - 1\n  - q: 2\n",
        "[]",
        "null",
    ];
    for text in samples {
        for options in [plain(), delimited(), compact()] {
            assert_idempotent(text, &options);
        }
    }
}

#[test]
fn cross_style_round_trip_preserves_the_value() {
    let samples = [
        r#"{"name": "test", "list": [1, 2, 3], "nested": {"deep": [true, null]}}"#,
        "x: %\n  embed body\n  %%",
        r#"{"weird key": "-dash", "nums": [0.5, 1e3, -0]}"#,
    ];
    for text in samples {
        for options in [plain(), delimited(), compact()] {
            let formatted = format(text, &options);
            assert_same_value(text, &formatted);
        }
    }
}

#[test]
fn tabs_indent_also_works() {
    let options = FormatOptions {
        indent: IndentStyle::Tabs,
        style: Style::Plain,
    };
    let out = format(r#"{"a": {"b": 1}}"#, &options);
    assert_eq!(out, "a:\n\tb: 1");
    assert_same_value(r#"{"a": {"b": 1}}"#, &out);
}

#[test]
fn unparseable_input_comes_back_unchanged() {
    let text = "  # only a comment\n";
    assert_eq!(format(text, &plain()), text);
}
