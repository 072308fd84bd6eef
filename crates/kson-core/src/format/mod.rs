//! Formatter — re-emits a value tree in one of three styles.
//!
//! - **Plain**: un-delimited objects and dash lists, the everyday KSON
//!   shape. End-dot / end-dash terminators appear only where a plain nested
//!   container is followed by more outer siblings.
//! - **Delimited**: every object braced, every list `<`-angled with dash
//!   items, one item per line.
//! - **Compact**: minimal whitespace; newlines survive only where embed
//!   blocks and comments require them.
//!
//! Comments are mined from the originating token stream and reattached to
//! the next data construct; a comment trailing a value on its line attaches
//! to that value and floats above it. Embed content is preserved
//! byte-for-byte: the processed content is re-escaped (one backslash
//! inserted into every delimiter-shaped run, never unescape-then-re-escape)
//! and re-indented, and the delimiter is normalized to `%`.
//!
//! Formatting is idempotent within a style.

mod comments;

use crate::lexer::embed::{escape_content, split_keep_newlines};
use crate::lexer::Token;
use crate::parser::parse;
use crate::value::{EmbedValue, Kson, ObjectValue, Property, ValueKind};
use comments::CommentMap;
use serde::{Deserialize, Serialize};

/// Output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Plain,
    Delimited,
    Compact,
}

/// Indentation unit for the block styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    fn unit(self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub indent: IndentStyle,
    pub style: Style,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent: IndentStyle::Spaces(2),
            style: Style::Plain,
        }
    }
}

/// Parse and re-emit `text`. When no tree could be built the input comes
/// back unchanged (the diagnostics live on the parse, not here).
pub fn format(text: &str, options: &FormatOptions) -> String {
    let result = parse(text);
    match result.value {
        Some(value) => format_tree(&value, &result.tokens, options),
        None => text.to_string(),
    }
}

/// Emit an already-parsed tree. `tokens` is the originating token stream,
/// used to recover comments; pass an empty slice to drop them.
pub fn format_tree(value: &Kson, tokens: &[Token], options: &FormatOptions) -> String {
    let mut emitter = Emitter {
        out: String::new(),
        unit: options.indent.unit(),
        comments: CommentMap::build(value, tokens),
    };
    match options.style {
        Style::Plain => emitter.plain_root(value),
        Style::Delimited => emitter.delimited_root(value),
        Style::Compact => emitter.compact_root(value),
    }
    emitter.finish()
}

struct Emitter {
    out: String,
    unit: String,
    comments: CommentMap,
}

impl Emitter {
    fn finish(mut self) -> String {
        for line in self.comments.drain_remaining() {
            self.nl();
            self.out.push_str(&line);
        }
        self.out
    }

    /// Start a fresh line unless we are already at one (or at the very top).
    fn nl(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn flush_comments(&mut self, offset: usize, indent: &str) {
        for line in self.comments.take(offset) {
            self.nl();
            self.out.push_str(indent);
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    // ---- Plain style ------------------------------------------------------

    fn plain_root(&mut self, root: &Kson) {
        self.flush_comments(root.location.start.byte_offset, "");
        match &root.kind {
            ValueKind::Object(o) if !o.is_empty() => self.plain_properties(o, ""),
            ValueKind::Array { elements, .. } if !elements.is_empty() => {
                self.plain_dash_items(elements, "", false)
            }
            ValueKind::Embed(e) => self.embed(e, ""),
            _ => self.inline_primitive(root),
        }
    }

    fn plain_properties(&mut self, o: &ObjectValue, indent: &str) {
        let last = o.properties.len().saturating_sub(1);
        for (i, p) in o.properties.iter().enumerate() {
            self.flush_comments(p.key.location.start.byte_offset, indent);
            self.flush_comments(p.value.location.start.byte_offset, indent);
            self.nl();
            self.out.push_str(indent);
            self.plain_property_body(p, indent, i < last);
        }
    }

    /// Emit `key: value` assuming the cursor sits where the key starts.
    fn plain_property_body(&mut self, p: &Property, indent: &str, more_siblings: bool) {
        self.out.push_str(&quote_string(&p.key.text));
        let child = format!("{indent}{}", self.unit);
        match &p.value.kind {
            ValueKind::Object(obj) if !obj.is_empty() => {
                if self.unit.is_empty() {
                    // Zero-width indent cannot express plain nesting.
                    self.out.push_str(": ");
                    self.compact_value(&p.value);
                } else {
                    self.out.push(':');
                    self.plain_properties(obj, &child);
                    if more_siblings {
                        self.nl();
                        self.out.push_str(&child);
                        self.out.push('.');
                    }
                }
            }
            ValueKind::Array { elements, .. } if !elements.is_empty() => {
                if self.unit.is_empty() {
                    self.out.push_str(": ");
                    self.compact_value(&p.value);
                } else {
                    self.out.push(':');
                    self.plain_dash_items(elements, &child, false);
                    if more_siblings {
                        self.nl();
                        self.out.push_str(&child);
                        self.out.push('=');
                    }
                }
            }
            ValueKind::Embed(e) => {
                self.out.push_str(": ");
                self.embed(e, &child);
            }
            _ => {
                self.out.push_str(": ");
                self.inline_primitive(&p.value);
            }
        }
    }

    /// Emit dash items at `indent`. With `first_inline` the cursor already
    /// sits after a parent `- ` and the first item hangs off it.
    fn plain_dash_items(&mut self, elements: &[Kson], indent: &str, first_inline: bool) {
        let last = elements.len().saturating_sub(1);
        for (i, e) in elements.iter().enumerate() {
            if i == 0 && first_inline {
                // Hanging position, mid-line.
            } else {
                self.flush_comments(e.location.start.byte_offset, indent);
                self.nl();
                self.out.push_str(indent);
            }
            self.out.push_str("- ");
            // Content column sits under the dash's payload.
            let child = format!("{indent}  ");
            match &e.kind {
                ValueKind::Object(obj) if !obj.is_empty() => {
                    if self.unit.is_empty() {
                        self.compact_value(e);
                    } else {
                        self.plain_object_after_dash(obj, &child);
                    }
                }
                ValueKind::Array { elements: inner, .. } if !inner.is_empty() => {
                    if self.unit.is_empty() {
                        self.compact_value(e);
                    } else {
                        self.plain_dash_items(inner, &child, true);
                        if i < last {
                            self.nl();
                            self.out.push_str(&child);
                            self.out.push('=');
                        }
                    }
                }
                ValueKind::Embed(em) => self.embed(em, &child),
                _ => self.inline_primitive(e),
            }
        }
    }

    /// Object as a dash item: first property on the dash line, the rest
    /// aligned under it.
    fn plain_object_after_dash(&mut self, o: &ObjectValue, indent: &str) {
        let last = o.properties.len().saturating_sub(1);
        for (i, p) in o.properties.iter().enumerate() {
            if i > 0 {
                self.flush_comments(p.key.location.start.byte_offset, indent);
                self.flush_comments(p.value.location.start.byte_offset, indent);
                self.nl();
                self.out.push_str(indent);
            }
            self.plain_property_body(p, indent, i < last);
        }
    }

    // ---- Delimited style --------------------------------------------------

    fn delimited_root(&mut self, root: &Kson) {
        self.flush_comments(root.location.start.byte_offset, "");
        self.delimited_value(root, "");
    }

    /// Emit a value; `indent` is the indent of the line the value starts on.
    fn delimited_value(&mut self, v: &Kson, indent: &str) {
        let child = format!("{indent}{}", self.unit);
        match &v.kind {
            ValueKind::Object(o) if !o.is_empty() => {
                self.out.push('{');
                for p in &o.properties {
                    self.flush_comments(p.key.location.start.byte_offset, &child);
                    self.flush_comments(p.value.location.start.byte_offset, &child);
                    self.nl();
                    self.out.push_str(&child);
                    self.out.push_str(&quote_string(&p.key.text));
                    self.out.push_str(": ");
                    self.delimited_value(&p.value, &child);
                }
                self.nl();
                self.out.push_str(indent);
                self.out.push('}');
            }
            ValueKind::Object(_) => self.out.push_str("{}"),
            ValueKind::Array { elements, .. } if !elements.is_empty() => {
                self.out.push('<');
                for e in elements {
                    self.flush_comments(e.location.start.byte_offset, &child);
                    self.nl();
                    self.out.push_str(&child);
                    self.out.push_str("- ");
                    self.delimited_value(e, &child);
                }
                self.nl();
                self.out.push_str(indent);
                self.out.push('>');
            }
            ValueKind::Array { .. } => self.out.push_str("<>"),
            ValueKind::Embed(e) => self.embed(e, &child),
            _ => self.inline_primitive(v),
        }
    }

    // ---- Compact style ----------------------------------------------------

    fn compact_root(&mut self, root: &Kson) {
        self.flush_comments(root.location.start.byte_offset, "");
        match &root.kind {
            ValueKind::Object(o) if !o.is_empty() => self.compact_properties(o),
            _ => self.compact_value(root),
        }
    }

    fn compact_value(&mut self, v: &Kson) {
        match &v.kind {
            ValueKind::Object(o) if !o.is_empty() => {
                self.out.push('{');
                self.compact_properties(o);
                self.out.push('}');
            }
            ValueKind::Object(_) => self.out.push_str("{}"),
            ValueKind::Array { elements, .. } => {
                self.out.push('[');
                for e in elements {
                    self.flush_comments(e.location.start.byte_offset, "");
                    self.compact_separator();
                    self.compact_value(e);
                }
                self.out.push(']');
            }
            ValueKind::Embed(e) => self.embed(e, ""),
            _ => self.inline_primitive(v),
        }
    }

    fn compact_properties(&mut self, o: &ObjectValue) {
        for p in &o.properties {
            self.flush_comments(p.key.location.start.byte_offset, "");
            self.flush_comments(p.value.location.start.byte_offset, "");
            self.compact_separator();
            self.out.push_str(&quote_string(&p.key.text));
            self.out.push(':');
            self.compact_value(&p.value);
        }
    }

    /// One space between adjacent atoms; none after a closing delimiter,
    /// an opening position, or a fresh line.
    fn compact_separator(&mut self) {
        match self.out.chars().next_back() {
            None => {}
            Some('[' | '{' | ':' | '\n') => {}
            Some(']' | '}' | '>') => {}
            Some(_) => self.out.push(' '),
        }
    }

    // ---- Shared pieces ----------------------------------------------------

    fn inline_primitive(&mut self, v: &Kson) {
        match &v.kind {
            ValueKind::Null => self.out.push_str("null"),
            ValueKind::Bool(true) => self.out.push_str("true"),
            ValueKind::Bool(false) => self.out.push_str("false"),
            ValueKind::Integer { normalized, .. } | ValueKind::Decimal { normalized, .. } => {
                self.out.push_str(normalized)
            }
            ValueKind::String(s) => {
                let quoted = quote_string(&s.value);
                self.out.push_str(&quoted);
            }
            ValueKind::Object(_) => self.out.push_str("{}"),
            ValueKind::Array { .. } => self.out.push_str("[]"),
            ValueKind::Embed(_) => {}
        }
    }

    /// Emit an embed block with `%` delimiters, its content re-escaped and
    /// re-indented at `content_indent`.
    fn embed(&mut self, e: &EmbedValue, content_indent: &str) {
        self.out.push('%');
        if let Some(tag) = &e.tag {
            self.out.push_str(tag);
        }
        if let Some(meta) = &e.metadata {
            self.out.push(':');
            self.out.push_str(meta);
        }
        self.out.push('\n');
        let escaped = escape_content(&e.content, '%');
        for line in split_keep_newlines(&escaped) {
            if line == "\n" {
                self.out.push('\n');
            } else {
                self.out.push_str(content_indent);
                self.out.push_str(line);
            }
        }
        if !escaped.is_empty() && !escaped.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str(content_indent);
        self.out.push_str("%%");
    }
}

/// Emit a string with the lightest quoting that survives a round-trip:
/// unquoted when *simple* (letters, digits, underscores, not digit-initial,
/// not a reserved word), else single-quoted when the value contains no `'`,
/// else double-quoted. Escapes cover the quote, backslash and control
/// characters in either quoted form.
pub(crate) fn quote_string(s: &str) -> String {
    if is_simple_string(s) {
        return s.to_string();
    }
    if !s.contains('\'') {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        escape_into(s, '\'', &mut out);
        out.push('\'');
        out
    } else {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        escape_into(s, '"', &mut out);
        out.push('"');
        out
    }
}

/// A string that lexes back as a single unquoted token with the same value.
pub(crate) fn is_simple_string(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }
    !matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "yes" | "no" | "y" | "n"
    )
}

fn escape_into(s: &str, quote: char, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}
