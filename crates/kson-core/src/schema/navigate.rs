//! Document-to-schema path navigation.
//!
//! Editor services hand in a path through the *document* (property names
//! and array indices) and get back every schema node that governs that
//! position — a list, because combinators and pattern properties can match
//! more than once. `$ref`s are resolved eagerly after each step and the
//! `$id` base is tracked so nested refs stay sound.

use crate::schema::id_lookup::SchemaIdLookup;
use crate::schema::uri;
use crate::value::{Kson, ValueKind};

/// How a schema node was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    Root,
    Property,
    PatternProperty,
    AdditionalProperty,
    Items,
    AdditionalItems,
    AllOfBranch,
    AnyOfBranch,
    OneOfBranch,
    Ref,
}

/// A schema node tagged with the base URI in force when it was reached.
#[derive(Debug, Clone)]
pub struct ResolvedSchema<'a> {
    pub node: &'a Kson,
    pub base_uri: String,
    pub resolution: ResolutionKind,
}

/// One step of a document path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

/// All schema nodes applying at `path` below `root`.
pub fn schemas_at_path<'a>(
    root: &'a Kson,
    lookup: &SchemaIdLookup<'a>,
    path: &[PathToken],
) -> Vec<ResolvedSchema<'a>> {
    let mut frontier = vec![ResolvedSchema {
        node: root,
        base_uri: lookup.root_base().to_string(),
        resolution: ResolutionKind::Root,
    }];
    frontier = expand(frontier, lookup);

    for token in path {
        let mut next = Vec::new();
        for schema in &frontier {
            descend(schema, token, &mut next);
        }
        frontier = expand(next, lookup);
    }
    frontier
}

/// Close a frontier over `$ref` and combinator branches. Each expanded
/// node remains in the set (its own keywords still apply) alongside its
/// branches and targets.
fn expand<'a>(
    seed: Vec<ResolvedSchema<'a>>,
    lookup: &SchemaIdLookup<'a>,
) -> Vec<ResolvedSchema<'a>> {
    let mut out: Vec<ResolvedSchema<'a>> = Vec::new();
    let mut queue = seed;
    let mut visited: Vec<*const Kson> = Vec::new();

    while let Some(mut current) = queue.pop() {
        let ptr = current.node as *const Kson;
        if visited.contains(&ptr) {
            continue;
        }
        visited.push(ptr);

        if let Some(obj) = current.node.as_object() {
            if let Some(id) = obj.get("$id").and_then(Kson::as_str) {
                if !id.starts_with('#') {
                    let full = uri::resolve_reference(&current.base_uri, id);
                    current.base_uri = uri::normalize(&full).to_string();
                }
            }
            if let Some(reference) = obj.get("$ref").and_then(Kson::as_str) {
                if let Some(target) = lookup.resolve(reference, &current.base_uri) {
                    queue.push(ResolvedSchema {
                        node: target.node,
                        base_uri: target.base_uri,
                        resolution: ResolutionKind::Ref,
                    });
                }
            }
            for (name, kind) in [
                ("allOf", ResolutionKind::AllOfBranch),
                ("anyOf", ResolutionKind::AnyOfBranch),
                ("oneOf", ResolutionKind::OneOfBranch),
            ] {
                if let Some(branches) = obj.get(name).and_then(Kson::as_array) {
                    for b in branches {
                        queue.push(ResolvedSchema {
                            node: b,
                            base_uri: current.base_uri.clone(),
                            resolution: kind,
                        });
                    }
                }
            }
        }
        out.push(current);
    }
    out
}

fn descend<'a>(schema: &ResolvedSchema<'a>, token: &PathToken, out: &mut Vec<ResolvedSchema<'a>>) {
    let obj = match schema.node.as_object() {
        Some(o) => o,
        None => return,
    };
    match token {
        PathToken::Key(name) => {
            if let Some(sub) = obj
                .get("properties")
                .and_then(Kson::as_object)
                .and_then(|m| m.get(name))
            {
                out.push(ResolvedSchema {
                    node: sub,
                    base_uri: schema.base_uri.clone(),
                    resolution: ResolutionKind::Property,
                });
                return;
            }
            let mut matched = false;
            if let Some(patterns) = obj.get("patternProperties").and_then(Kson::as_object) {
                for pat in &patterns.properties {
                    if let Ok(re) = regex::Regex::new(&pat.key.text) {
                        if re.is_match(name) {
                            out.push(ResolvedSchema {
                                node: &pat.value,
                                base_uri: schema.base_uri.clone(),
                                resolution: ResolutionKind::PatternProperty,
                            });
                            matched = true;
                        }
                    }
                }
            }
            if matched {
                return;
            }
            if let Some(additional) = obj.get("additionalProperties") {
                if !matches!(additional.kind, ValueKind::Bool(false)) {
                    out.push(ResolvedSchema {
                        node: additional,
                        base_uri: schema.base_uri.clone(),
                        resolution: ResolutionKind::AdditionalProperty,
                    });
                }
            }
        }
        PathToken::Index(i) => match obj.get("items").map(|n| &n.kind) {
            Some(ValueKind::Array { elements, .. }) => match elements.get(*i) {
                Some(sub) => out.push(ResolvedSchema {
                    node: sub,
                    base_uri: schema.base_uri.clone(),
                    resolution: ResolutionKind::Items,
                }),
                None => {
                    if let Some(additional) = obj.get("additionalItems") {
                        if !matches!(additional.kind, ValueKind::Bool(false)) {
                            out.push(ResolvedSchema {
                                node: additional,
                                base_uri: schema.base_uri.clone(),
                                resolution: ResolutionKind::AdditionalItems,
                            });
                        }
                    }
                }
            },
            Some(_) => {
                if let Some(items) = obj.get("items") {
                    out.push(ResolvedSchema {
                        node: items,
                        base_uri: schema.base_uri.clone(),
                        resolution: ResolutionKind::Items,
                    });
                }
            }
            None => {}
        },
    }
}
