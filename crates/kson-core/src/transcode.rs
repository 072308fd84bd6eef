//! Transcoding a KSON value tree to JSON and YAML text.
//!
//! Both emitters work off the tree's normalized number strings so source
//! fidelity survives (`007` emits as `7`, exponents keep their shape).
//! Strings prefer double quotes in JSON; embed blocks become JSON strings
//! and YAML block scalars. Forward-slash escapes never reappear: the tree
//! holds decoded text and neither emitter escapes `/`.

use crate::error::{KsonError, Result};
use crate::message::Severity;
use crate::parser::parse;
use crate::value::{Kson, ValueKind};

/// Transcode KSON text to compact JSON.
pub fn to_json(text: &str) -> Result<String> {
    let result = parse(text);
    let has_errors = result
        .messages
        .iter()
        .any(|m| m.severity == Severity::Error);
    match result.value {
        Some(v) if !has_errors => Ok(value_to_json(&v)),
        _ => Err(KsonError::from_messages(&result.messages)),
    }
}

/// Transcode KSON text to YAML.
pub fn to_yaml(text: &str) -> Result<String> {
    let result = parse(text);
    let has_errors = result
        .messages
        .iter()
        .any(|m| m.severity == Severity::Error);
    match result.value {
        Some(v) if !has_errors => Ok(value_to_yaml(&v)),
        _ => Err(KsonError::from_messages(&result.messages)),
    }
}

/// Emit a value tree as compact JSON text.
pub fn value_to_json(v: &Kson) -> String {
    let mut out = String::new();
    json_value(v, &mut out);
    out
}

fn json_value(v: &Kson, out: &mut String) {
    match &v.kind {
        ValueKind::Null => out.push_str("null"),
        ValueKind::Bool(true) => out.push_str("true"),
        ValueKind::Bool(false) => out.push_str("false"),
        ValueKind::Integer { normalized, .. } | ValueKind::Decimal { normalized, .. } => {
            out.push_str(normalized)
        }
        ValueKind::String(s) => json_string(&s.value, out),
        ValueKind::Embed(e) => json_string(&e.content, out),
        ValueKind::Array { elements, .. } => {
            out.push('[');
            for (i, e) in elements.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                json_value(e, out);
            }
            out.push(']');
        }
        ValueKind::Object(o) => {
            out.push('{');
            for (i, p) in o.properties.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                json_string(&p.key.text, out);
                out.push(':');
                json_value(&p.value, out);
            }
            out.push('}');
        }
    }
}

fn json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Emit a value tree as YAML block-style text.
pub fn value_to_yaml(v: &Kson) -> String {
    let mut out = String::new();
    yaml_value(v, "", true, &mut out);
    out
}

/// `own_line` is true when the value starts at a fresh line position (root
/// or after `key:` / `-` introducers have already decided the layout).
fn yaml_value(v: &Kson, indent: &str, _own_line: bool, out: &mut String) {
    match &v.kind {
        ValueKind::Object(o) if !o.is_empty() => {
            for (i, p) in o.properties.iter().enumerate() {
                if i > 0 || !out.is_empty() {
                    ensure_newline(out);
                }
                out.push_str(indent);
                yaml_scalar_key(&p.key.text, out);
                yaml_property_value(&p.value, indent, out);
            }
        }
        ValueKind::Array { elements, .. } if !elements.is_empty() => {
            for (i, e) in elements.iter().enumerate() {
                if i > 0 || !out.is_empty() {
                    ensure_newline(out);
                }
                out.push_str(indent);
                out.push_str("- ");
                yaml_item_value(e, indent, out);
            }
        }
        _ => yaml_scalar(v, indent, out),
    }
}

fn yaml_property_value(v: &Kson, indent: &str, out: &mut String) {
    let child = format!("{indent}  ");
    match &v.kind {
        ValueKind::Object(o) if !o.is_empty() => {
            out.push(':');
            for p in &o.properties {
                ensure_newline(out);
                out.push_str(&child);
                yaml_scalar_key(&p.key.text, out);
                yaml_property_value(&p.value, &child, out);
            }
        }
        ValueKind::Array { elements, .. } if !elements.is_empty() => {
            out.push(':');
            for e in elements {
                ensure_newline(out);
                out.push_str(&child);
                out.push_str("- ");
                yaml_item_value(e, &child, out);
            }
        }
        ValueKind::Embed(e) => {
            out.push_str(": ");
            yaml_block_scalar(&e.content, indent, out);
        }
        _ => {
            out.push_str(": ");
            yaml_scalar(v, indent, out);
        }
    }
}

fn yaml_item_value(v: &Kson, indent: &str, out: &mut String) {
    let child = format!("{indent}  ");
    match &v.kind {
        ValueKind::Object(o) if !o.is_empty() => {
            for (i, p) in o.properties.iter().enumerate() {
                if i > 0 {
                    ensure_newline(out);
                    out.push_str(&child);
                }
                yaml_scalar_key(&p.key.text, out);
                yaml_property_value(&p.value, &child, out);
            }
        }
        ValueKind::Array { elements, .. } if !elements.is_empty() => {
            for (i, e) in elements.iter().enumerate() {
                if i > 0 {
                    ensure_newline(out);
                    out.push_str(&child);
                }
                out.push_str("- ");
                yaml_item_value(e, &child, out);
            }
        }
        ValueKind::Embed(e) => yaml_block_scalar(&e.content, indent, out),
        _ => yaml_scalar(v, indent, out),
    }
}

fn yaml_scalar(v: &Kson, indent: &str, out: &mut String) {
    match &v.kind {
        ValueKind::Null => out.push_str("null"),
        ValueKind::Bool(true) => out.push_str("true"),
        ValueKind::Bool(false) => out.push_str("false"),
        ValueKind::Integer { normalized, .. } | ValueKind::Decimal { normalized, .. } => {
            out.push_str(normalized)
        }
        ValueKind::String(s) => yaml_string(&s.value, out),
        ValueKind::Embed(e) => yaml_block_scalar(&e.content, indent, out),
        ValueKind::Object(_) => out.push_str("{}"),
        ValueKind::Array { .. } => out.push_str("[]"),
    }
}

/// Plain scalar when clearly safe, double-quoted otherwise. YAML's
/// double-quoted escapes are JSON-compatible, so the JSON escaper is
/// reused; `/` stays bare.
fn yaml_string(s: &str, out: &mut String) {
    if crate::format::is_simple_string(s) {
        out.push_str(s);
    } else {
        json_string(s, out);
    }
}

fn yaml_scalar_key(key: &str, out: &mut String) {
    yaml_string(key, out);
}

/// Literal block scalar. The chomping indicator keeps trailing-newline
/// fidelity: `|` for one, `|-` for none, `|+` for several.
fn yaml_block_scalar(content: &str, indent: &str, out: &mut String) {
    if content.is_empty() {
        out.push_str("\"\"");
        return;
    }
    let header = if !content.ends_with('\n') {
        "|-"
    } else if content.ends_with("\n\n") {
        "|+"
    } else {
        "|"
    };
    out.push_str(header);
    let child = format!("{indent}  ");
    for line in crate::lexer::embed::split_keep_newlines(content) {
        ensure_newline(out);
        if line != "\n" {
            out.push_str(&child);
            out.push_str(line.trim_end_matches('\n'));
        }
    }
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
