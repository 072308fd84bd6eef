//! KSON lexer — character stream to tokens.
//!
//! The lexer never aborts: every malformed construct produces a specific
//! message and a token that still covers its source bytes, so the token
//! stream always reconstructs the input exactly and downstream analyses
//! keep running. Trivia (whitespace, comments) stays in the stream; the
//! parser skips it and the formatter mines it for comments.

pub mod embed;
pub mod number;
pub mod token;

pub use token::{Token, TokenKind};

use crate::message::{MessageKind, MessageSink};
use crate::position::{Location, Position};

/// Tokens plus everything the lexer had to say about them.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub sink: MessageSink,
}

/// Lex a complete source text. The token list always ends with `Eof`.
pub fn lex(source: &str) -> LexResult {
    Lexer::new(source).run()
}

struct Lexer<'src> {
    source: &'src str,
    rest: &'src str,
    pos: Position,
    tokens: Vec<Token>,
    sink: MessageSink,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Lexer {
            source,
            rest: source,
            pos: Position::zero(),
            tokens: Vec::new(),
            sink: MessageSink::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest.chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 0;
        } else {
            self.pos.column += 1;
        }
        self.pos.byte_offset += c.len_utf8();
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    /// Advance over `n` bytes, keeping line/column bookkeeping exact.
    fn bump_bytes(&mut self, n: usize) {
        let mut remaining = n;
        while remaining > 0 {
            let c = self.bump().expect("bump_bytes past end of input");
            remaining -= c.len_utf8();
        }
    }

    fn lexeme_from(&self, start: Position) -> String {
        self.source[start.byte_offset..self.pos.byte_offset].to_string()
    }

    fn location_from(&self, start: Position) -> Location {
        Location::new(start, self.pos)
    }

    fn push(&mut self, kind: TokenKind, start: Position) {
        let token = Token::new(kind, self.lexeme_from(start), self.location_from(start));
        self.tokens.push(token);
    }

    fn push_with_value(&mut self, kind: TokenKind, start: Position, value: String) {
        let token = Token::new(kind, self.lexeme_from(start), self.location_from(start))
            .with_value(value);
        self.tokens.push(token);
    }

    fn run(mut self) -> LexResult {
        loop {
            let start = self.pos;
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    self.tokens
                        .push(Token::new(TokenKind::Eof, String::new(), Location::at(self.pos)));
                    break;
                }
            };
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
                        self.bump();
                    }
                    self.push(TokenKind::Whitespace, start);
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    self.push(TokenKind::Comment, start);
                }
                '"' | '\'' => self.lex_string(c),
                '%' | '$' => self.lex_embed(c),
                '{' => self.single(TokenKind::CurlyBraceL),
                '}' => self.single(TokenKind::CurlyBraceR),
                '[' => self.single(TokenKind::SquareBracketL),
                ']' => self.single(TokenKind::SquareBracketR),
                '<' => self.single(TokenKind::AngleBracketL),
                '>' => self.single(TokenKind::AngleBracketR),
                ':' => self.single(TokenKind::Colon),
                ',' => self.single(TokenKind::Comma),
                '.' => self.single(TokenKind::Dot),
                '=' => self.single(TokenKind::EndDash),
                '-' => match self.peek_second() {
                    Some(d) if d.is_ascii_digit() => self.lex_number(),
                    None | Some(' ' | '\t' | '\n' | '\r') => {
                        self.bump();
                        self.push(TokenKind::ListDash, start);
                    }
                    Some(_) => self.lex_number(),
                },
                d if d.is_ascii_digit() => self.lex_number(),
                a if a.is_alphabetic() || a == '_' => self.lex_word(),
                other => {
                    self.bump();
                    self.sink.error_with(
                        MessageKind::IllegalChar,
                        self.location_from(start),
                        vec![other.to_string()],
                    );
                    self.push(TokenKind::IllegalChar, start);
                }
            }
        }
        LexResult {
            tokens: self.tokens,
            sink: self.sink,
        }
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.bump();
        self.push(kind, start);
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let lexeme = self.lexeme_from(start);
        let kind = match lexeme.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::UnquotedString,
        };
        if kind == TokenKind::UnquotedString {
            self.push_with_value(kind, start, lexeme);
        } else {
            self.push(kind, start);
        }
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let scan = number::scan_number(self.rest);
        self.bump_bytes(scan.len);
        match scan.result {
            Ok(parsed) => self.push_with_value(TokenKind::Number, start, parsed.normalized),
            Err(kind) => {
                let lexeme = self.lexeme_from(start);
                self.sink
                    .error_with(kind, self.location_from(start), vec![lexeme]);
                self.push(TokenKind::Number, start);
            }
        }
    }

    fn lex_string(&mut self, quote: char) {
        let open = self.pos;
        self.bump();
        self.push(TokenKind::StringOpenQuote, open);

        loop {
            let start = self.pos;
            match self.peek() {
                None => {
                    self.sink
                        .error(MessageKind::StringNoClose, Location::at(open));
                    break;
                }
                Some(c) if c == quote => {
                    self.bump();
                    self.push(TokenKind::StringCloseQuote, start);
                    break;
                }
                Some('\\') => self.lex_escape(start),
                Some(c) if (c as u32) < 0x20 && !matches!(c, '\n' | '\t' | '\r') => {
                    self.bump();
                    self.sink.error_with(
                        MessageKind::StringIllegalControlCharacter,
                        self.location_from(start),
                        vec![format!("U+{:04X}", c as u32)],
                    );
                    self.push(TokenKind::StringIllegalControlCharacter, start);
                }
                Some(_) => {
                    while let Some(c) = self.peek() {
                        if c == quote
                            || c == '\\'
                            || ((c as u32) < 0x20 && !matches!(c, '\n' | '\t' | '\r'))
                        {
                            break;
                        }
                        self.bump();
                    }
                    let lexeme = self.lexeme_from(start);
                    self.push_with_value(TokenKind::StringContent, start, lexeme);
                }
            }
        }
    }

    fn lex_escape(&mut self, start: Position) {
        self.bump(); // backslash
        match self.peek() {
            Some('u') => {
                self.bump();
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 4 {
                    match self.peek().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            self.bump();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 4 {
                    let decoded = char::from_u32(code).unwrap_or('\u{FFFD}');
                    self.push_with_value(
                        TokenKind::StringUnicodeEscape,
                        start,
                        decoded.to_string(),
                    );
                } else {
                    self.sink.error_with(
                        MessageKind::StringIllegalControlCharacter,
                        self.location_from(start),
                        vec![self.lexeme_from(start)],
                    );
                    self.push(TokenKind::StringIllegalControlCharacter, start);
                }
            }
            Some(c) if matches!(c, '"' | '\'' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                self.bump();
                let decoded = match c {
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                };
                self.push_with_value(TokenKind::StringEscape, start, decoded.to_string());
            }
            Some(_) => {
                self.bump();
                self.sink.error_with(
                    MessageKind::StringIllegalControlCharacter,
                    self.location_from(start),
                    vec![self.lexeme_from(start)],
                );
                self.push(TokenKind::StringIllegalControlCharacter, start);
            }
            None => {
                self.sink.error_with(
                    MessageKind::StringIllegalControlCharacter,
                    self.location_from(start),
                    vec![self.lexeme_from(start)],
                );
                self.push(TokenKind::StringIllegalControlCharacter, start);
            }
        }
    }

    fn lex_embed(&mut self, delim: char) {
        let open = self.pos;
        self.bump();
        self.push(TokenKind::EmbedOpenDelim, open);

        // Preamble: everything up to the required newline.
        let preamble_end = self.rest.find('\n');
        let preamble = match preamble_end {
            Some(n) => self.rest[..n].to_string(),
            None => {
                let text = self.rest.to_string();
                if !text.is_empty() {
                    let start = self.pos;
                    self.bump_bytes(text.len());
                    let value = text.trim().to_string();
                    self.push_with_value(TokenKind::EmbedTag, start, value);
                }
                self.sink
                    .error(MessageKind::EmbedBlockDanglingTick, Location::at(open));
                return;
            }
        };

        match preamble.find(':') {
            Some(colon) => {
                let tag_part = preamble[..colon].to_string();
                if !tag_part.is_empty() {
                    self.lex_embed_tag(&tag_part, delim);
                }
                let meta_start = self.pos;
                self.bump_bytes(preamble.len() - colon);
                let value = preamble[colon + 1..].to_string();
                self.push_with_value(TokenKind::EmbedMetadata, meta_start, value);
            }
            None => {
                if !preamble.is_empty() {
                    self.lex_embed_tag(&preamble, delim);
                }
            }
        }

        let nl_start = self.pos;
        self.bump();
        self.push(TokenKind::EmbedPreambleNewline, nl_start);

        // Content: up to the first unescaped close delimiter.
        match embed::find_close(self.rest, delim) {
            Some(p) => {
                let full = self.rest[..p].to_string();
                let line_start = full.rfind('\n').map(|n| n + 1).unwrap_or(0);
                let closing_prefix = &full[line_start..];
                let processed = if closing_prefix.chars().all(|c| c == ' ' || c == '\t') {
                    embed::process_content(&full[..line_start], Some(closing_prefix), delim)
                } else {
                    embed::process_content(&full, None, delim)
                };
                if !full.is_empty() {
                    let start = self.pos;
                    self.bump_bytes(full.len());
                    self.push_with_value(TokenKind::EmbedContent, start, processed.content);
                }
                let close_start = self.pos;
                self.bump_bytes(delim.len_utf8() * 2);
                self.push(TokenKind::EmbedCloseDelim, close_start);
            }
            None => {
                self.sink
                    .error(MessageKind::EmbedBlockNoClose, Location::at(open));
                let full = self.rest.to_string();
                let processed = embed::process_content(&full, None, delim);
                if !full.is_empty() {
                    let start = self.pos;
                    self.bump_bytes(full.len());
                    self.push_with_value(TokenKind::EmbedContent, start, processed.content);
                }
            }
        }
    }

    /// Emit the tag token; a tag with interior whitespace or a stray
    /// delimiter character is a malformed preamble.
    fn lex_embed_tag(&mut self, raw: &str, delim: char) {
        let start = self.pos;
        self.bump_bytes(raw.len());
        let trimmed = raw.trim();
        if trimmed.chars().any(|c| c.is_whitespace() || c == delim) {
            self.sink
                .error(MessageKind::EmbedBlockBadStart, self.location_from(start));
        }
        self.push_with_value(TokenKind::EmbedTag, start, trimmed.to_string());
    }
}
