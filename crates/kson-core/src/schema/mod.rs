//! JSON Schema (Draft-07) validation over KSON value trees.
//!
//! A schema is itself a KSON document; any KSON document that is a valid
//! Draft-07 schema is accepted. [`parse_schema`] parses the schema text,
//! checks it against the embedded meta-schema, and hands back a
//! [`SchemaValidator`] that can be run over any number of documents.

pub mod id_lookup;
pub mod meta;
pub mod navigate;
pub mod pointer;
pub mod uri;
mod validators;

pub use id_lookup::{Registered, SchemaIdLookup};
pub use navigate::{schemas_at_path, PathToken, ResolutionKind, ResolvedSchema};

use crate::message::{Message, MessageSink};
use crate::parser::parse;
use crate::value::Kson;
use validators::{validate_node, Ctx};

/// A parsed, meta-checked schema ready to validate documents.
#[derive(Debug)]
pub struct SchemaValidator {
    schema: Kson,
}

impl SchemaValidator {
    pub fn new(schema: Kson) -> Self {
        SchemaValidator { schema }
    }

    pub fn schema(&self) -> &Kson {
        &self.schema
    }

    /// Parse `document` and validate it. Parse messages come first,
    /// schema messages after; validation only runs when a tree exists.
    pub fn validate(&self, document: &str) -> Vec<Message> {
        let result = parse(document);
        let mut messages = result.messages;
        if let Some(value) = &result.value {
            messages.extend(self.validate_value(value));
        }
        messages
    }

    /// Validate an already-parsed document value.
    pub fn validate_value(&self, value: &Kson) -> Vec<Message> {
        let lookup = SchemaIdLookup::build(&self.schema);
        let mut ctx = Ctx {
            lookup: &lookup,
            active_refs: Vec::new(),
        };
        let mut sink = MessageSink::new();
        let base = lookup.root_base().to_string();
        validate_node(&self.schema, &base, value, 0, &mut ctx, &mut sink);
        sink.into_messages()
    }
}

/// Outcome of [`parse_schema`]: the validator is present whenever the text
/// parsed into a tree, even if the meta-check found problems.
#[derive(Debug)]
pub struct SchemaParseResult {
    pub validator: Option<SchemaValidator>,
    pub messages: Vec<Message>,
}

/// Parse a schema document and check it against the Draft-07 meta-schema.
pub fn parse_schema(text: &str) -> SchemaParseResult {
    let result = parse(text);
    let mut messages = result.messages;
    match result.value {
        Some(schema) => {
            let meta = meta::meta_schema();
            let meta_validator = SchemaValidator::new(meta.clone());
            messages.extend(meta_validator.validate_value(&schema));
            SchemaParseResult {
                validator: Some(SchemaValidator::new(schema)),
                messages,
            }
        }
        None => SchemaParseResult {
            validator: None,
            messages,
        },
    }
}
