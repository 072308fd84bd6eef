//! Diagnostics as values.
//!
//! Nothing in this crate throws for a malformed document: the lexer, parser,
//! indent validator and schema validator all append [`Message`]s to a
//! [`MessageSink`] and keep going. Human-readable text is rendered from
//! `kind` + `params` by the `Display` impl, separate from the data itself.

use crate::position::Location;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Closed enumeration of everything this crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    // Lexer
    BlankSource,
    StringNoClose,
    StringIllegalControlCharacter,
    EmbedBlockBadStart,
    EmbedBlockNoClose,
    EmbedBlockDanglingTick,
    DanglingExpIndicator,
    IllegalMinusSign,
    InvalidDigits,
    DanglingDecimal,
    IntegerOverflow,
    IllegalChar,

    // Parser
    UnexpectedToken,
    ExpectedColon,
    ExpectedPropertyKey,
    ExpectedValue,
    UnclosedDelimiter,
    ExtraContent,
    DepthExceeded,
    ObjectDuplicateKey,

    // Indent validator
    ObjectPropertiesMisaligned,
    DashListItemsMisaligned,
    ObjectPropertyNestingIssue,
    DashListItemsNestingIssue,

    // Schema validator
    SchemaTypeMismatch,
    SchemaEnumMismatch,
    SchemaConstMismatch,
    SchemaMinimumViolation,
    SchemaMaximumViolation,
    SchemaExclusiveMinimumViolation,
    SchemaExclusiveMaximumViolation,
    SchemaMultipleOfViolation,
    SchemaMinLengthViolation,
    SchemaMaxLengthViolation,
    SchemaPatternMismatch,
    SchemaFormatMismatch,
    SchemaMinItemsViolation,
    SchemaMaxItemsViolation,
    SchemaUniqueItemsViolation,
    SchemaContainsViolation,
    SchemaAdditionalItemsForbidden,
    SchemaRequiredPropertyMissing,
    SchemaAdditionalPropertyForbidden,
    SchemaPropertyNamesViolation,
    SchemaMinPropertiesViolation,
    SchemaMaxPropertiesViolation,
    SchemaDependencyMissing,
    SchemaAnyOfNoMatch,
    SchemaOneOfMultipleMatches,
    SchemaNotMatched,
    SchemaNeverValid,
    SchemaRefUnresolved,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub kind: MessageKind,
    pub location: Location,
    pub params: Vec<String>,
}

impl Message {
    pub fn new(severity: Severity, kind: MessageKind, location: Location) -> Self {
        Message {
            severity,
            kind,
            location,
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MessageKind::*;
        let p = |i: usize| self.params.get(i).map(String::as_str).unwrap_or("?");
        let text: String = match self.kind {
            BlankSource => "source contains no value".into(),
            StringNoClose => "string is never closed".into(),
            StringIllegalControlCharacter => {
                format!("illegal character or escape in string: {}", p(0))
            }
            EmbedBlockBadStart => "embed block preamble contains unexpected content".into(),
            EmbedBlockNoClose => "embed block is never closed".into(),
            EmbedBlockDanglingTick => "embed block delimiter at end of input".into(),
            DanglingExpIndicator => "number has an exponent indicator with no digits".into(),
            IllegalMinusSign => "minus sign is not followed by digits".into(),
            InvalidDigits => format!("invalid characters in number: {}", p(0)),
            DanglingDecimal => "number has a decimal point with no digits".into(),
            IntegerOverflow => format!("integer does not fit in 64 bits: {}", p(0)),
            IllegalChar => format!("illegal character: {}", p(0)),
            UnexpectedToken => format!("unexpected {}", p(0)),
            ExpectedColon => "expected ':' after property key".into(),
            ExpectedPropertyKey => format!("expected a property key, found {}", p(0)),
            ExpectedValue => format!("expected a value, found {}", p(0)),
            UnclosedDelimiter => format!("unclosed {}", p(0)),
            ExtraContent => "additional content after the document value".into(),
            DepthExceeded => "nesting exceeds the maximum depth".into(),
            ObjectDuplicateKey => format!("duplicate key: {}", p(0)),
            ObjectPropertiesMisaligned => {
                format!("property is not aligned with its siblings (expected column {})", p(0))
            }
            DashListItemsMisaligned => {
                format!("list item is not aligned with its siblings (expected column {})", p(0))
            }
            ObjectPropertyNestingIssue => {
                "nested value must be indented past its property key".into()
            }
            DashListItemsNestingIssue => {
                "nested list must be indented past its parent dash".into()
            }
            SchemaTypeMismatch => format!("expected {} but found {}", p(0), p(1)),
            SchemaEnumMismatch => "value is not one of the allowed values".into(),
            SchemaConstMismatch => "value does not equal the required constant".into(),
            SchemaMinimumViolation => format!("value is less than the minimum {}", p(0)),
            SchemaMaximumViolation => format!("value is greater than the maximum {}", p(0)),
            SchemaExclusiveMinimumViolation => {
                format!("value must be strictly greater than {}", p(0))
            }
            SchemaExclusiveMaximumViolation => {
                format!("value must be strictly less than {}", p(0))
            }
            SchemaMultipleOfViolation => format!("value is not a multiple of {}", p(0)),
            SchemaMinLengthViolation => format!("string is shorter than {} characters", p(0)),
            SchemaMaxLengthViolation => format!("string is longer than {} characters", p(0)),
            SchemaPatternMismatch => format!("string does not match pattern {}", p(0)),
            SchemaFormatMismatch => format!("string is not a valid {}", p(0)),
            SchemaMinItemsViolation => format!("array has fewer than {} items", p(0)),
            SchemaMaxItemsViolation => format!("array has more than {} items", p(0)),
            SchemaUniqueItemsViolation => "array items are not unique".into(),
            SchemaContainsViolation => "array contains no matching item".into(),
            SchemaAdditionalItemsForbidden => "additional array items are not allowed".into(),
            SchemaRequiredPropertyMissing => format!("missing required property: {}", p(0)),
            SchemaAdditionalPropertyForbidden => {
                format!("additional property is not allowed: {}", p(0))
            }
            SchemaPropertyNamesViolation => format!("property name is not allowed: {}", p(0)),
            SchemaMinPropertiesViolation => format!("object has fewer than {} properties", p(0)),
            SchemaMaxPropertiesViolation => format!("object has more than {} properties", p(0)),
            SchemaDependencyMissing => {
                format!("property {} requires property {}", p(0), p(1))
            }
            SchemaAnyOfNoMatch => "value matches none of the allowed schemas".into(),
            SchemaOneOfMultipleMatches => {
                format!("value matches {} schemas where exactly one is allowed", p(0))
            }
            SchemaNotMatched => "value matches a schema it must not match".into(),
            SchemaNeverValid => "schema allows no value here".into(),
            SchemaRefUnresolved => format!("unresolved schema reference: {}", p(0)),
        };
        write!(
            f,
            "{}:{}: {}",
            self.location.start.line + 1,
            self.location.start.column + 1,
            text
        )
    }
}

/// Ordered collector shared by all pipeline stages.
#[derive(Debug, Default)]
pub struct MessageSink {
    messages: Vec<Message>,
}

impl MessageSink {
    pub fn new() -> Self {
        MessageSink::default()
    }

    pub fn error(&mut self, kind: MessageKind, location: Location) {
        self.messages.push(Message::new(Severity::Error, kind, location));
    }

    pub fn error_with(&mut self, kind: MessageKind, location: Location, params: Vec<String>) {
        self.messages
            .push(Message::new(Severity::Error, kind, location).with_params(params));
    }

    pub fn warning_with(&mut self, kind: MessageKind, location: Location, params: Vec<String>) {
        self.messages
            .push(Message::new(Severity::Warning, kind, location).with_params(params));
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: Vec<Message>) {
        self.messages.extend(messages);
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
