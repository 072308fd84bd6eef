//! Token kinds and the token record.

use crate::position::Location;
use serde::Serialize;
use std::fmt;

/// Every kind of token the lexer can produce.
///
/// Quoted strings are tokenized fine-grained (open quote, content runs,
/// escapes, close quote) so editor clients can highlight escape sequences
/// without re-lexing. Trivia (whitespace, comments) is kept in the stream;
/// concatenating every token's lexeme in order reconstructs the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    UnquotedString,
    StringOpenQuote,
    StringContent,
    StringCloseQuote,
    StringEscape,
    StringUnicodeEscape,
    StringIllegalControlCharacter,
    Number,
    True,
    False,
    Null,
    Colon,
    Comma,
    /// End-dot `.` closing a plain object.
    Dot,
    /// End-dash `=` closing a plain dash list.
    EndDash,
    /// `-` introducing a dash-list item (followed by whitespace or EOL).
    ListDash,
    CurlyBraceL,
    CurlyBraceR,
    SquareBracketL,
    SquareBracketR,
    AngleBracketL,
    AngleBracketR,
    Comment,
    EmbedOpenDelim,
    EmbedTag,
    EmbedMetadata,
    EmbedPreambleNewline,
    EmbedContent,
    EmbedCloseDelim,
    Whitespace,
    IllegalChar,
    Eof,
}

impl TokenKind {
    /// Tokens the parser skips over.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::IllegalChar
        )
    }

    /// Human name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::UnquotedString => "unquoted string",
            TokenKind::StringOpenQuote
            | TokenKind::StringContent
            | TokenKind::StringCloseQuote
            | TokenKind::StringEscape
            | TokenKind::StringUnicodeEscape
            | TokenKind::StringIllegalControlCharacter => "string",
            TokenKind::Number => "number",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::EndDash => "'='",
            TokenKind::ListDash => "'-'",
            TokenKind::CurlyBraceL => "'{'",
            TokenKind::CurlyBraceR => "'}'",
            TokenKind::SquareBracketL => "'['",
            TokenKind::SquareBracketR => "']'",
            TokenKind::AngleBracketL => "'<'",
            TokenKind::AngleBracketR => "'>'",
            TokenKind::Comment => "comment",
            TokenKind::EmbedOpenDelim
            | TokenKind::EmbedTag
            | TokenKind::EmbedMetadata
            | TokenKind::EmbedPreambleNewline
            | TokenKind::EmbedContent
            | TokenKind::EmbedCloseDelim => "embed block",
            TokenKind::Whitespace => "whitespace",
            TokenKind::IllegalChar => "illegal character",
            TokenKind::Eof => "end of input",
        }
    }
}

/// One lexed token.
///
/// `lexeme` is the exact source slice. `value` carries the decoded payload
/// where one exists: the decoded fragment for string pieces, the normalized
/// form for numbers, the processed (unescaped, dedented) text for embed
/// content, and the metadata text for embed metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: Option<String>,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, location: Location) -> Self {
        Token {
            kind,
            lexeme,
            value: None,
            location,
        }
    }

    pub fn with_value(mut self, value: String) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.lexeme)
    }
}
