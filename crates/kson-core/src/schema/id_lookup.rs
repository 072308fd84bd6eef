//! `$id` registration and `$ref` resolution.
//!
//! One walk over the schema builds a flat `URI → node` map. Nested `$id`s
//! resolve against the enclosing base; fragment-only `$id`s register named
//! anchors. Keeping the map flat (and resolving refs each time) is what
//! lets recursive schemas exist without in-memory cycles — the validator's
//! active-chain set handles re-entry instead.

use crate::schema::{meta, pointer, uri};
use crate::value::{Kson, ValueKind};
use std::collections::HashMap;

/// A schema node plus the base URI in force where it was found.
#[derive(Debug, Clone)]
pub struct Registered<'a> {
    pub node: &'a Kson,
    pub base_uri: String,
}

#[derive(Debug)]
pub struct SchemaIdLookup<'a> {
    map: HashMap<String, Registered<'a>>,
    root_base: String,
}

impl<'a> SchemaIdLookup<'a> {
    /// Walk `root` once and register every `$id`. The root registers under
    /// its own `$id` or the empty string; the Draft-07 meta-schema is
    /// always pre-registered.
    pub fn build(root: &'a Kson) -> SchemaIdLookup<'a> {
        let root_base = root
            .as_object()
            .and_then(|o| o.get("$id"))
            .and_then(Kson::as_str)
            .map(|s| uri::normalize(s).to_string())
            .unwrap_or_default();

        let mut lookup = SchemaIdLookup {
            map: HashMap::new(),
            root_base: root_base.clone(),
        };

        let meta_root = meta::meta_schema();
        lookup.map.insert(
            meta::DRAFT7_URI.to_string(),
            Registered {
                node: meta_root,
                base_uri: meta::DRAFT7_URI.to_string(),
            },
        );

        lookup.map.insert(
            root_base.clone(),
            Registered {
                node: root,
                base_uri: root_base.clone(),
            },
        );
        if !root_base.is_empty() {
            // Refs inside an id-less consumer still resolve via "".
            lookup.map.entry(String::new()).or_insert(Registered {
                node: root,
                base_uri: root_base.clone(),
            });
        }

        lookup.register_children(root, &root_base);
        lookup
    }

    pub fn root_base(&self) -> &str {
        &self.root_base
    }

    fn register_children(&mut self, node: &'a Kson, base: &str) {
        match &node.kind {
            ValueKind::Object(o) => {
                let mut current_base = base.to_string();
                if let Some(id) = o.get("$id").and_then(Kson::as_str) {
                    if let Some(anchor) = id.strip_prefix('#') {
                        let key = format!("{}#{}", uri::normalize(base), anchor);
                        self.map.insert(
                            key,
                            Registered {
                                node,
                                base_uri: base.to_string(),
                            },
                        );
                    } else {
                        let full = uri::resolve_reference(base, id);
                        let full = uri::normalize(&full).to_string();
                        current_base = full.clone();
                        self.map.insert(
                            full.clone(),
                            Registered {
                                node,
                                base_uri: full,
                            },
                        );
                    }
                }
                for p in &o.properties {
                    // Constants are data, not schemas; their $ids are inert.
                    if p.key.text == "enum" || p.key.text == "const" {
                        continue;
                    }
                    self.register_children(&p.value, &current_base);
                }
            }
            ValueKind::Array { elements, .. } => {
                for e in elements {
                    self.register_children(e, base);
                }
            }
            _ => {}
        }
    }

    /// Resolve a `$ref` against the base URI in force: direct registration
    /// first, then a JSON-Pointer fragment navigated through the owning
    /// document, then a named anchor.
    pub fn resolve(&self, reference: &str, base: &str) -> Option<Registered<'a>> {
        let full = uri::resolve_reference(base, reference);
        let full_norm = uri::normalize(&full);
        if let Some(hit) = self.map.get(full_norm) {
            return Some(hit.clone());
        }

        let (doc, fragment) = uri::split_fragment(&full);
        let owner = self.map.get(uri::normalize(doc))?;
        let fragment = match fragment {
            None | Some("") => return Some(owner.clone()),
            Some(f) => pointer::decode_fragment(f),
        };

        if let Some(tokens) = pointer::parse_pointer(&fragment) {
            let node = pointer::navigate(owner.node, &tokens)?;
            return Some(Registered {
                node,
                base_uri: owner.base_uri.clone(),
            });
        }

        self.map
            .get(&format!("{}#{}", uri::normalize(doc), fragment))
            .cloned()
    }

    /// The canonical URI a resolution of `reference` would have; used for
    /// cycle bookkeeping.
    pub fn canonical_uri(&self, reference: &str, base: &str) -> String {
        let full = uri::resolve_reference(base, reference);
        uri::normalize(&full).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn pointer_refs_resolve_through_the_root() {
        let schema = parse("{definitions: {a: {type: string}}, '$ref': '#/definitions/a'}")
            .value
            .unwrap();
        let lookup = SchemaIdLookup::build(&schema);
        let hit = lookup.resolve("#/definitions/a", "").unwrap();
        assert_eq!(
            hit.node
                .as_object()
                .and_then(|o| o.get("type"))
                .and_then(Kson::as_str),
            Some("string")
        );
    }

    #[test]
    fn nested_ids_register_against_the_base() {
        let schema = parse(
            "{'$id': 'http://example.com/root.json', definitions: {a: {'$id': 'other.json', type: number}}}",
        )
        .value
        .unwrap();
        let lookup = SchemaIdLookup::build(&schema);
        let hit = lookup
            .resolve("http://example.com/other.json", "")
            .expect("nested $id registered");
        assert_eq!(
            hit.node
                .as_object()
                .and_then(|o| o.get("type"))
                .and_then(Kson::as_str),
            Some("number")
        );
        // Relative refs join the base's directory too.
        assert!(lookup
            .resolve("other.json", "http://example.com/root.json")
            .is_some());
    }

    #[test]
    fn named_anchor_resolves() {
        let schema = parse("{definitions: {a: {'$id': '#mine', type: boolean}}}")
            .value
            .unwrap();
        let lookup = SchemaIdLookup::build(&schema);
        assert!(lookup.resolve("#mine", "").is_some());
    }

    #[test]
    fn meta_schema_is_preregistered() {
        let schema = parse("{type: object}").value.unwrap();
        let lookup = SchemaIdLookup::build(&schema);
        assert!(lookup
            .resolve("http://json-schema.org/draft-07/schema#", "")
            .is_some());
    }
}
