//! The KSON value tree.
//!
//! Nodes are immutable once the parser builds them: owned by the parse
//! result, borrowed by the validators and the formatter. Every node carries
//! its source [`Location`]; a parent's location spans all of its children.

use crate::message::{Message, MessageKind, Severity};
use crate::position::Location;
use std::collections::HashMap;

/// How a string was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Unquoted,
    Single,
    Double,
}

/// How an array was written. This is layout information for the indent
/// validator and formatter; it does not participate in value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStyle {
    /// `[ ... ]`
    Brackets,
    /// `< - ... >`
    Angles,
    /// Un-delimited dash list.
    Plain,
}

/// How an object was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStyle {
    /// `{ ... }`
    Braces,
    /// Un-delimited property list.
    Plain,
}

/// A decoded string plus how it appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct StringValue {
    pub value: String,
    pub raw: String,
    pub quote: QuoteStyle,
}

/// An object property key. Keys are always strings.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyNode {
    pub text: String,
    pub raw: String,
    pub quote: QuoteStyle,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: KeyNode,
    pub value: Kson,
}

/// An ordered property list plus a first-occurrence lookup. Duplicate keys
/// are retained; `get` always answers with the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub properties: Vec<Property>,
    pub style: ObjectStyle,
    lookup: HashMap<String, usize>,
}

impl ObjectValue {
    pub fn new(properties: Vec<Property>, style: ObjectStyle) -> Self {
        let mut lookup = HashMap::with_capacity(properties.len());
        for (i, p) in properties.iter().enumerate() {
            lookup.entry(p.key.text.clone()).or_insert(i);
        }
        ObjectValue {
            properties,
            style,
            lookup,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Kson> {
        self.lookup.get(key).map(|&i| &self.properties[i].value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn distinct_len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// The metadata and processed content of an embed block.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedValue {
    pub tag: Option<String>,
    pub metadata: Option<String>,
    pub content: String,
    /// The delimiter character the block was written with (`%` or `$`).
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Null,
    Bool(bool),
    Integer { value: i64, normalized: String },
    Decimal { value: f64, normalized: String },
    String(StringValue),
    Array { elements: Vec<Kson>, style: ArrayStyle },
    Object(ObjectValue),
    Embed(EmbedValue),
}

/// One node of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Kson {
    pub kind: ValueKind,
    pub location: Location,
}

impl Kson {
    pub fn new(kind: ValueKind, location: Location) -> Self {
        Kson { kind, location }
    }

    /// JSON Schema type name for this value. Integers are also numbers;
    /// this returns the narrower name.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Null => "null",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Integer { .. } => "integer",
            ValueKind::Decimal { .. } => "number",
            ValueKind::String(_) | ValueKind::Embed(_) => "string",
            ValueKind::Array { .. } => "array",
            ValueKind::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match &self.kind {
            ValueKind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Kson]> {
        match &self.kind {
            ValueKind::Array { elements, .. } => Some(elements),
            _ => None,
        }
    }

    /// Decoded string content; embed blocks read as their content.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(&s.value),
            ValueKind::Embed(e) => Some(&e.content),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match &self.kind {
            ValueKind::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Numeric value as f64, for either number flavor.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Integer { value, .. } => Some(*value as f64),
            ValueKind::Decimal { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Whether this numeric node counts as a JSON Schema `integer`:
    /// losslessly representable as i64 with no fractional part in its
    /// source form.
    pub fn is_schema_integer(&self) -> bool {
        match &self.kind {
            ValueKind::Integer { .. } => true,
            ValueKind::Decimal { value, normalized } => {
                value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value <= i64::MAX as f64
                    && !normalized.contains(['.', 'e', 'E'])
            }
            _ => false,
        }
    }

    /// Structural equality as used by `uniqueItems`, `enum` and `const`:
    /// array order matters, object property order does not, numbers compare
    /// by normalized representation.
    pub fn structural_eq(&self, other: &Kson) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (
                ValueKind::Integer { normalized: a, .. },
                ValueKind::Integer { normalized: b, .. },
            ) => a == b,
            (
                ValueKind::Decimal { normalized: a, .. },
                ValueKind::Decimal { normalized: b, .. },
            ) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a.value == b.value,
            (ValueKind::String(a), ValueKind::Embed(b)) => a.value == b.content,
            (ValueKind::Embed(a), ValueKind::String(b)) => a.content == b.value,
            (ValueKind::Embed(a), ValueKind::Embed(b)) => a.content == b.content,
            (
                ValueKind::Array { elements: a, .. },
                ValueKind::Array { elements: b, .. },
            ) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y)),
            (ValueKind::Object(a), ValueKind::Object(b)) => {
                a.distinct_len() == b.distinct_len()
                    && a.properties.iter().all(|p| {
                        match b.get(&p.key.text) {
                            Some(v) => a
                                .get(&p.key.text)
                                .is_some_and(|first| first.structural_eq(v)),
                            None => false,
                        }
                    })
            }
            _ => false,
        }
    }

    /// Bridge into `serde_json` for interop and testing. Number fidelity
    /// follows the normalized form: integers stay integral, decimals go
    /// through f64.
    pub fn to_serde_json(&self) -> serde_json::Value {
        match &self.kind {
            ValueKind::Null => serde_json::Value::Null,
            ValueKind::Bool(b) => serde_json::Value::Bool(*b),
            ValueKind::Integer { value, .. } => serde_json::Value::Number((*value).into()),
            ValueKind::Decimal { value, .. } => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ValueKind::String(s) => serde_json::Value::String(s.value.clone()),
            ValueKind::Embed(e) => serde_json::Value::String(e.content.clone()),
            ValueKind::Array { elements, .. } => {
                serde_json::Value::Array(elements.iter().map(Kson::to_serde_json).collect())
            }
            ValueKind::Object(o) => {
                let mut map = serde_json::Map::new();
                for p in &o.properties {
                    // First occurrence wins, matching the lookup semantics.
                    if !map.contains_key(&p.key.text) {
                        map.insert(p.key.text.clone(), p.value.to_serde_json());
                    }
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Walk the tree and report retained duplicate keys, one message per
/// repeated occurrence, located at the repeated key.
pub fn duplicate_key_messages(root: &Kson) -> Vec<Message> {
    let mut out = Vec::new();
    collect_duplicates(root, &mut out);
    out
}

fn collect_duplicates(node: &Kson, out: &mut Vec<Message>) {
    match &node.kind {
        ValueKind::Object(o) => {
            let mut seen: HashMap<&str, ()> = HashMap::new();
            for p in &o.properties {
                if seen.insert(p.key.text.as_str(), ()).is_some() {
                    out.push(
                        Message::new(
                            Severity::Error,
                            MessageKind::ObjectDuplicateKey,
                            p.key.location,
                        )
                        .with_params(vec![p.key.text.clone()]),
                    );
                }
                collect_duplicates(&p.value, out);
            }
        }
        ValueKind::Array { elements, .. } => {
            for e in elements {
                collect_duplicates(e, out);
            }
        }
        _ => {}
    }
}
