//! Recursive-descent parser — tokens to a value tree.
//!
//! Lookahead is one token kind. Commas are optional separators and are
//! absorbed, never stored. Indentation is advisory: the only place it
//! steers the parser is the termination of un-delimited (plain) containers,
//! where a continuation item whose column is at or left of the enclosing
//! introducer's column belongs to an outer scope. The first value after a
//! `key:` or a bare dash is consumed unconditionally; lying indentation is
//! the indent validator's business, not a parse error.
//!
//! Errors are reported and recovered from so later analyses still run; a
//! parse that produced any tree keeps it, and content after the document
//! value is reported once as `ExtraContent` without poisoning the tree.

use crate::lexer::{lex, Token, TokenKind};
use crate::message::{Message, MessageKind, MessageSink};
use crate::position::Location;
use crate::value::{
    ArrayStyle, EmbedValue, KeyNode, Kson, ObjectStyle, ObjectValue, Property, QuoteStyle,
    StringValue, ValueKind,
};

/// Maximum container nesting before the parser gives up on a branch.
pub const MAX_DEPTH: usize = 256;

/// Everything a parse produces. `value` is present whenever any tree could
/// be built, even if `messages` contains errors.
#[derive(Debug)]
pub struct ParseResult {
    pub value: Option<Kson>,
    pub tokens: Vec<Token>,
    pub messages: Vec<Message>,
}

/// Lex and parse a complete document.
pub fn parse(text: &str) -> ParseResult {
    let lexed = lex(text);
    let mut parser = Parser {
        tokens: &lexed.tokens,
        idx: 0,
        sink: lexed.sink,
    };
    let value = parser.parse_document();
    let sink = parser.sink;
    ParseResult {
        value,
        tokens: lexed.tokens,
        messages: sink.into_messages(),
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    idx: usize,
    sink: MessageSink,
}

impl<'t> Parser<'t> {
    fn next_non_trivia(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.tokens.len() && self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        i.min(self.tokens.len() - 1)
    }

    fn peek_idx(&self) -> usize {
        self.next_non_trivia(self.idx)
    }

    fn tok(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    fn parse_document(&mut self) -> Option<Kson> {
        let i = self.peek_idx();
        if self.tok(i).kind == TokenKind::Eof {
            if !self.sink.has_errors() {
                self.sink
                    .error(MessageKind::BlankSource, self.tok(i).location);
            }
            return None;
        }

        let value = self.parse_value(None, 0);

        let extra_start = self.peek_idx();
        if self.tok(extra_start).kind != TokenKind::Eof {
            let mut last = extra_start;
            let mut j = extra_start;
            while self.tok(j).kind != TokenKind::Eof {
                last = j;
                j = self.next_non_trivia(j + 1);
                if j == last {
                    break;
                }
            }
            let location = self
                .tok(extra_start)
                .location
                .cover(self.tok(last).location);
            self.sink.error(MessageKind::ExtraContent, location);
        }

        Some(value)
    }

    fn parse_value(&mut self, enclosing_col: Option<u32>, depth: usize) -> Kson {
        let i = self.peek_idx();
        let t = self.tok(i);
        let loc = t.location;

        if depth > MAX_DEPTH {
            self.sink.error(MessageKind::DepthExceeded, loc);
            self.idx = i + 1;
            return Kson::new(ValueKind::Null, loc);
        }

        match t.kind {
            TokenKind::CurlyBraceL => self.parse_braced_object(depth),
            TokenKind::SquareBracketL => self.parse_bracket_array(depth),
            TokenKind::AngleBracketL => self.parse_angle_array(depth),
            TokenKind::ListDash => self.parse_plain_dash_list(enclosing_col, depth),
            TokenKind::EmbedOpenDelim => self.parse_embed(),
            TokenKind::True => {
                self.idx = i + 1;
                Kson::new(ValueKind::Bool(true), loc)
            }
            TokenKind::False => {
                self.idx = i + 1;
                Kson::new(ValueKind::Bool(false), loc)
            }
            TokenKind::Null => {
                self.idx = i + 1;
                Kson::new(ValueKind::Null, loc)
            }
            TokenKind::Number => {
                self.idx = i + 1;
                self.number_node(i)
            }
            TokenKind::UnquotedString | TokenKind::StringOpenQuote => {
                let end = self.string_group_end(i);
                let after = self.next_non_trivia(end);
                if self.tok(after).kind == TokenKind::Colon {
                    self.parse_plain_object(enclosing_col, depth)
                } else {
                    let (sv, loc) = self.consume_string();
                    Kson::new(ValueKind::String(sv), loc)
                }
            }
            other => {
                self.sink.error_with(
                    MessageKind::ExpectedValue,
                    loc,
                    vec![other.describe().to_string()],
                );
                self.idx = i + 1;
                Kson::new(ValueKind::Null, loc)
            }
        }
    }

    fn number_node(&mut self, i: usize) -> Kson {
        let t = self.tok(i);
        let loc = t.location;
        match &t.value {
            Some(normalized) => {
                if normalized.contains(['.', 'e', 'E']) {
                    Kson::new(
                        ValueKind::Decimal {
                            value: normalized.parse().unwrap_or(0.0),
                            normalized: normalized.clone(),
                        },
                        loc,
                    )
                } else {
                    Kson::new(
                        ValueKind::Integer {
                            value: normalized.parse().unwrap_or(0),
                            normalized: normalized.clone(),
                        },
                        loc,
                    )
                }
            }
            // The lexer already reported what is wrong with this number.
            None => Kson::new(ValueKind::Null, loc),
        }
    }

    /// Index just past the tokens of the string starting at `i`.
    fn string_group_end(&self, i: usize) -> usize {
        if self.tok(i).kind == TokenKind::UnquotedString {
            return i + 1;
        }
        let mut j = i + 1;
        while j < self.tokens.len() {
            match self.tok(j).kind {
                TokenKind::StringContent
                | TokenKind::StringEscape
                | TokenKind::StringUnicodeEscape
                | TokenKind::StringIllegalControlCharacter => j += 1,
                TokenKind::StringCloseQuote => return j + 1,
                _ => return j,
            }
        }
        j
    }

    /// Consume a string token group and decode it.
    fn consume_string(&mut self) -> (StringValue, Location) {
        let i = self.peek_idx();
        let t = self.tok(i);
        if t.kind == TokenKind::UnquotedString {
            let sv = StringValue {
                value: t.value.clone().unwrap_or_else(|| t.lexeme.clone()),
                raw: t.lexeme.clone(),
                quote: QuoteStyle::Unquoted,
            };
            let loc = t.location;
            self.idx = i + 1;
            return (sv, loc);
        }

        let quote = if t.lexeme.starts_with('\'') {
            QuoteStyle::Single
        } else {
            QuoteStyle::Double
        };
        let mut raw = t.lexeme.clone();
        let mut value = String::new();
        let mut loc = t.location;
        let mut j = i + 1;
        while j < self.tokens.len() {
            let part = self.tok(j);
            match part.kind {
                TokenKind::StringContent
                | TokenKind::StringEscape
                | TokenKind::StringUnicodeEscape => {
                    value.push_str(part.value.as_deref().unwrap_or(&part.lexeme));
                    raw.push_str(&part.lexeme);
                    loc = loc.cover(part.location);
                    j += 1;
                }
                TokenKind::StringIllegalControlCharacter => {
                    value.push_str(&part.lexeme);
                    raw.push_str(&part.lexeme);
                    loc = loc.cover(part.location);
                    j += 1;
                }
                TokenKind::StringCloseQuote => {
                    raw.push_str(&part.lexeme);
                    loc = loc.cover(part.location);
                    j += 1;
                    break;
                }
                _ => break,
            }
        }
        self.idx = j;
        (StringValue { value, raw, quote }, loc)
    }

    fn absorb_commas(&mut self) {
        loop {
            let k = self.peek_idx();
            if self.tok(k).kind == TokenKind::Comma {
                self.idx = k + 1;
            } else {
                return;
            }
        }
    }

    fn parse_plain_object(&mut self, enclosing_col: Option<u32>, depth: usize) -> Kson {
        let mut properties = Vec::new();
        let mut loc: Option<Location> = None;

        loop {
            let key_idx = self.peek_idx();
            let key_col = self.tok(key_idx).location.start.column;
            let (sv, key_loc) = self.consume_string();
            let key = KeyNode {
                text: sv.value,
                raw: sv.raw,
                quote: sv.quote,
                location: key_loc,
            };

            let j = self.peek_idx();
            if self.tok(j).kind == TokenKind::Colon {
                self.idx = j + 1;
            } else {
                self.sink.error(MessageKind::ExpectedColon, key_loc);
            }

            let value = self.parse_value(Some(key_col), depth + 1);
            let prop_loc = key_loc.cover(value.location);
            loc = Some(match loc {
                Some(l) => l.cover(prop_loc),
                None => prop_loc,
            });
            properties.push(Property { key, value });

            self.absorb_commas();

            let k = self.peek_idx();
            let t = self.tok(k);
            match t.kind {
                TokenKind::Dot => {
                    loc = Some(loc.expect("at least one property").cover(t.location));
                    self.idx = k + 1;
                    break;
                }
                TokenKind::UnquotedString | TokenKind::StringOpenQuote => {
                    if let Some(c) = enclosing_col {
                        if t.location.start.column <= c {
                            break;
                        }
                    }
                    let end = self.string_group_end(k);
                    let after = self.next_non_trivia(end);
                    if self.tok(after).kind != TokenKind::Colon {
                        break;
                    }
                }
                _ => break,
            }
        }

        let location = loc.expect("plain object has at least one property");
        Kson::new(
            ValueKind::Object(ObjectValue::new(properties, ObjectStyle::Plain)),
            location,
        )
    }

    fn parse_braced_object(&mut self, depth: usize) -> Kson {
        let open_idx = self.peek_idx();
        let open_loc = self.tok(open_idx).location;
        self.idx = open_idx + 1;
        let mut properties = Vec::new();
        let mut loc = open_loc;

        loop {
            self.absorb_commas();
            let k = self.peek_idx();
            let t = self.tok(k);
            match t.kind {
                TokenKind::CurlyBraceR => {
                    loc = loc.cover(t.location);
                    self.idx = k + 1;
                    break;
                }
                TokenKind::Eof => {
                    self.sink.error_with(
                        MessageKind::UnclosedDelimiter,
                        open_loc,
                        vec!["'{'".to_string()],
                    );
                    break;
                }
                TokenKind::UnquotedString | TokenKind::StringOpenQuote => {
                    let key_col = t.location.start.column;
                    let (sv, key_loc) = self.consume_string();
                    let key = KeyNode {
                        text: sv.value,
                        raw: sv.raw,
                        quote: sv.quote,
                        location: key_loc,
                    };
                    let j = self.peek_idx();
                    if self.tok(j).kind == TokenKind::Colon {
                        self.idx = j + 1;
                    } else {
                        self.sink.error(MessageKind::ExpectedColon, key_loc);
                    }
                    let value = self.parse_value(Some(key_col), depth + 1);
                    loc = loc.cover(value.location);
                    properties.push(Property { key, value });
                }
                other => {
                    self.sink.error_with(
                        MessageKind::UnexpectedToken,
                        t.location,
                        vec![other.describe().to_string()],
                    );
                    self.recover_inside(TokenKind::CurlyBraceR);
                }
            }
        }

        Kson::new(
            ValueKind::Object(ObjectValue::new(properties, ObjectStyle::Braces)),
            loc,
        )
    }

    fn parse_bracket_array(&mut self, depth: usize) -> Kson {
        let open_idx = self.peek_idx();
        let open_loc = self.tok(open_idx).location;
        self.idx = open_idx + 1;
        let mut elements = Vec::new();
        let mut loc = open_loc;

        loop {
            self.absorb_commas();
            let k = self.peek_idx();
            let t = self.tok(k);
            match t.kind {
                TokenKind::SquareBracketR => {
                    loc = loc.cover(t.location);
                    self.idx = k + 1;
                    break;
                }
                TokenKind::Eof => {
                    self.sink.error_with(
                        MessageKind::UnclosedDelimiter,
                        open_loc,
                        vec!["'['".to_string()],
                    );
                    break;
                }
                TokenKind::Colon | TokenKind::Dot | TokenKind::EndDash => {
                    self.sink.error_with(
                        MessageKind::UnexpectedToken,
                        t.location,
                        vec![t.kind.describe().to_string()],
                    );
                    self.recover_inside(TokenKind::SquareBracketR);
                }
                _ => {
                    let value = self.parse_value(None, depth + 1);
                    loc = loc.cover(value.location);
                    elements.push(value);
                }
            }
        }

        Kson::new(
            ValueKind::Array {
                elements,
                style: ArrayStyle::Brackets,
            },
            loc,
        )
    }

    fn parse_angle_array(&mut self, depth: usize) -> Kson {
        let open_idx = self.peek_idx();
        let open_loc = self.tok(open_idx).location;
        self.idx = open_idx + 1;
        let mut elements = Vec::new();
        let mut loc = open_loc;

        loop {
            self.absorb_commas();
            let k = self.peek_idx();
            let t = self.tok(k);
            match t.kind {
                TokenKind::AngleBracketR => {
                    loc = loc.cover(t.location);
                    self.idx = k + 1;
                    break;
                }
                TokenKind::Eof => {
                    self.sink.error_with(
                        MessageKind::UnclosedDelimiter,
                        open_loc,
                        vec!["'<'".to_string()],
                    );
                    break;
                }
                TokenKind::ListDash => {
                    let dash_col = t.location.start.column;
                    self.idx = k + 1;
                    let value = self.parse_value(Some(dash_col), depth + 1);
                    loc = loc.cover(value.location);
                    elements.push(value);
                }
                TokenKind::CurlyBraceL
                | TokenKind::SquareBracketL
                | TokenKind::AngleBracketL
                | TokenKind::EmbedOpenDelim
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Number
                | TokenKind::UnquotedString
                | TokenKind::StringOpenQuote => {
                    // A dash-less element is malformed but still a value.
                    self.sink.error_with(
                        MessageKind::UnexpectedToken,
                        t.location,
                        vec![t.kind.describe().to_string()],
                    );
                    let value = self.parse_value(None, depth + 1);
                    loc = loc.cover(value.location);
                    elements.push(value);
                }
                other => {
                    self.sink.error_with(
                        MessageKind::UnexpectedToken,
                        t.location,
                        vec![other.describe().to_string()],
                    );
                    self.recover_inside(TokenKind::AngleBracketR);
                }
            }
        }

        Kson::new(
            ValueKind::Array {
                elements,
                style: ArrayStyle::Angles,
            },
            loc,
        )
    }

    fn parse_plain_dash_list(&mut self, enclosing_col: Option<u32>, depth: usize) -> Kson {
        let mut elements = Vec::new();
        let mut loc: Option<Location> = None;

        loop {
            let d = self.peek_idx();
            let dash = self.tok(d);
            let dash_col = dash.location.start.column;
            let dash_loc = dash.location;
            self.idx = d + 1;

            let value = self.parse_value(Some(dash_col), depth + 1);
            let item_loc = dash_loc.cover(value.location);
            loc = Some(match loc {
                Some(l) => l.cover(item_loc),
                None => item_loc,
            });
            elements.push(value);

            self.absorb_commas();

            let k = self.peek_idx();
            let t = self.tok(k);
            match t.kind {
                TokenKind::EndDash => {
                    loc = Some(loc.expect("at least one item").cover(t.location));
                    self.idx = k + 1;
                    break;
                }
                TokenKind::ListDash => {
                    if let Some(c) = enclosing_col {
                        if t.location.start.column <= c {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }

        let location = loc.expect("plain dash list has at least one item");
        Kson::new(
            ValueKind::Array {
                elements,
                style: ArrayStyle::Plain,
            },
            location,
        )
    }

    fn parse_embed(&mut self) -> Kson {
        let i = self.peek_idx();
        let open = self.tok(i);
        let delimiter = open.lexeme.chars().next().unwrap_or('%');
        let mut loc = open.location;
        self.idx = i + 1;

        let mut tag = None;
        let mut metadata = None;
        let mut content = String::new();

        // Embed tokens are contiguous by construction.
        while self.idx < self.tokens.len() {
            let t = self.tok(self.idx);
            match t.kind {
                TokenKind::EmbedTag => {
                    let v = t.value.clone().unwrap_or_default();
                    if !v.is_empty() {
                        tag = Some(v);
                    }
                }
                TokenKind::EmbedMetadata => {
                    metadata = Some(t.value.clone().unwrap_or_default());
                }
                TokenKind::EmbedPreambleNewline => {}
                TokenKind::EmbedContent => {
                    content = t.value.clone().unwrap_or_default();
                }
                TokenKind::EmbedCloseDelim => {
                    loc = loc.cover(t.location);
                    self.idx += 1;
                    break;
                }
                _ => break,
            }
            loc = loc.cover(t.location);
            self.idx += 1;
        }

        Kson::new(
            ValueKind::Embed(EmbedValue {
                tag,
                metadata,
                content,
                delimiter,
            }),
            loc,
        )
    }

    /// Skip to a plausible continuation point inside a delimited container.
    fn recover_inside(&mut self, close: TokenKind) {
        let mut first = true;
        loop {
            let k = self.peek_idx();
            let kind = self.tok(k).kind;
            if kind == TokenKind::Eof
                || kind == close
                || (!first
                    && matches!(
                        kind,
                        TokenKind::Comma
                            | TokenKind::ListDash
                            | TokenKind::UnquotedString
                            | TokenKind::StringOpenQuote
                    ))
            {
                return;
            }
            self.idx = k + 1;
            first = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(text: &str) -> Kson {
        let result = parse(text);
        assert!(
            result.messages.is_empty(),
            "unexpected messages for {text:?}: {:?}",
            result.messages
        );
        result.value.expect("expected a value")
    }

    #[test]
    fn json_document_round_trips() {
        let v = value_of("{\"a\": 1, \"b\": [true, null, \"x\"]}");
        let o = v.as_object().expect("object");
        assert_eq!(o.get("a").and_then(Kson::as_i64), Some(1));
        assert_eq!(o.get("b").and_then(Kson::as_array).map(<[Kson]>::len), Some(3));
    }

    #[test]
    fn plain_object_with_nested_scope() {
        let v = value_of("key:\n  a: 1\n  b: 2\nother: 3");
        let o = v.as_object().expect("object");
        assert_eq!(o.properties.len(), 2);
        let nested = o.get("key").and_then(Kson::as_object).expect("nested");
        assert_eq!(nested.properties.len(), 2);
        assert_eq!(o.get("other").and_then(Kson::as_i64), Some(3));
    }

    #[test]
    fn end_dot_closes_innermost_object() {
        let v = value_of("a:\n  b: 1\n  .\nc: 2");
        let o = v.as_object().expect("object");
        assert_eq!(o.properties.len(), 2);
        assert!(o.get("c").is_some());
    }

    #[test]
    fn plain_dash_list_nested_under_key() {
        let v = value_of("list:\n  - 1\n  - 2\nnext: ok");
        let o = v.as_object().expect("object");
        let list = o.get("list").and_then(Kson::as_array).expect("list");
        assert_eq!(list.len(), 2);
        assert!(o.get("next").is_some());
    }

    #[test]
    fn extra_content_is_reported_but_tree_kept() {
        let result = parse("a: 1\n} stray");
        assert!(result.value.is_some());
        assert!(result
            .messages
            .iter()
            .any(|m| m.kind == MessageKind::ExtraContent));
    }

    #[test]
    fn blank_source() {
        let result = parse("  # nothing here\n");
        assert!(result.value.is_none());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].kind, MessageKind::BlankSource);
    }

    #[test]
    fn location_containment() {
        fn check(node: &Kson) {
            match &node.kind {
                ValueKind::Object(o) => {
                    for p in &o.properties {
                        assert!(node.location.contains(&p.key.location));
                        assert!(node.location.contains(&p.value.location));
                        check(&p.value);
                    }
                }
                ValueKind::Array { elements, .. } => {
                    for e in elements {
                        assert!(node.location.contains(&e.location));
                        check(e);
                    }
                }
                _ => {}
            }
        }
        let v = value_of("a:\n  b: [1, 2, {c: 3}]\nd: <\n  - x\n>");
        check(&v);
    }
}
