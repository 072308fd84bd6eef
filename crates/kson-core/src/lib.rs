//! # kson-core
//!
//! Parser, formatter, transcoder and JSON Schema (Draft-07) validator for
//! **KSON** — a superset of JSON with unquoted values, indentation-guided
//! (but not indentation-significant) plain objects and dash lists, embed
//! blocks for literal inline text, and three formatting styles.
//!
//! ## Quick start
//!
//! ```rust
//! use kson_core::{format, parse, to_json, FormatOptions};
//!
//! let result = parse("name: test\nvalue: 123");
//! assert!(result.messages.is_empty());
//!
//! // KSON → JSON
//! let json = to_json("name: test\nvalue: 123").unwrap();
//! assert_eq!(json, r#"{"name":"test","value":123}"#);
//!
//! // JSON is valid KSON; the plain style drops the braces
//! let plain = format(r#"{"name": "test", "value": 123}"#, &FormatOptions::default());
//! assert_eq!(plain, "name: test\nvalue: 123");
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — characters to tokens, embed-block extraction included
//! - [`parser`] — tokens to a located value tree
//! - [`indent`] — detects indentation that lies about structure
//! - [`format`] — plain / delimited / compact re-emission
//! - [`transcode`] — KSON → JSON and KSON → YAML
//! - [`schema`] — Draft-07 validation with `$ref`/`$id` resolution
//! - [`editor`] — hover, completion and goto services for tooling

pub mod editor;
pub mod error;
pub mod format;
pub mod indent;
pub mod lexer;
pub mod message;
pub mod parser;
pub mod position;
pub mod schema;
pub mod transcode;
pub mod value;

pub use error::{KsonError, Result};
pub use format::{format, format_tree, FormatOptions, IndentStyle, Style};
pub use lexer::{Token, TokenKind};
pub use message::{Message, MessageKind, MessageSink, Severity};
pub use parser::{parse, ParseResult};
pub use position::{Location, Position};
pub use schema::{parse_schema, SchemaParseResult, SchemaValidator};
pub use transcode::{to_json, to_yaml};
pub use value::{Kson, ValueKind};

/// Parse plus every static analysis tooling wants in one list: lexer and
/// parser messages, retained-duplicate-key errors, and indent validation.
pub fn analyze(text: &str) -> ParseResult {
    let mut result = parse(text);
    if let Some(v) = &result.value {
        result.messages.extend(value::duplicate_key_messages(v));
        result
            .messages
            .extend(indent::validate_indent(v, text, &result.tokens));
    }
    result
}
