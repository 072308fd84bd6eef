//! Editor services: hover, completion and goto-definition over a document
//! plus its schema.
//!
//! These are pure functions — text and a cursor in, markdown/ranges out —
//! consumed by an external language server. Position-to-path resolution is
//! an index-based traversal of the value tree; nodes stay immutable and
//! carry no parent pointers.

use crate::parser::parse;
use crate::position::Location;
use crate::schema::{schemas_at_path, PathToken, ResolvedSchema, SchemaIdLookup};
use crate::value::{Kson, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Property,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
}

/// Where in the document the cursor landed.
#[derive(Debug, Clone, PartialEq)]
enum CursorTarget {
    /// On a property key; the path includes that key.
    Key,
    /// On a value node.
    Value,
    /// Inside a container but on none of its members.
    Container,
}

/// Markdown hover text for the schema governing the cursor position.
pub fn schema_info_at(document: &str, schema: &str, line: u32, column: u32) -> Option<String> {
    let doc = parse(document).value?;
    let schema_root = parse(schema).value?;
    let (path, _) = path_at(&doc, line, column)?;
    let lookup = SchemaIdLookup::build(&schema_root);
    let resolved = schemas_at_path(&schema_root, &lookup, &path);

    let mut sections = Vec::new();
    for r in &resolved {
        if let Some(text) = describe_schema(r) {
            if !sections.contains(&text) {
                sections.push(text);
            }
        }
    }
    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n---\n\n"))
    }
}

/// Property and value completions for the cursor position.
pub fn completions_at(
    document: &str,
    schema: &str,
    line: u32,
    column: u32,
) -> Vec<CompletionItem> {
    let doc = match parse(document).value {
        Some(v) => v,
        None => return Vec::new(),
    };
    let schema_root = match parse(schema).value {
        Some(v) => v,
        None => return Vec::new(),
    };
    let (mut path, target) = match path_at(&doc, line, column) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let lookup = SchemaIdLookup::build(&schema_root);

    let mut items = Vec::new();
    match target {
        CursorTarget::Key | CursorTarget::Container => {
            if target == CursorTarget::Key {
                path.pop();
            }
            let object = node_at_path(&doc, &path);
            let existing: Vec<String> = object
                .and_then(Kson::as_object)
                .map(|o| o.properties.iter().map(|p| p.key.text.clone()).collect())
                .unwrap_or_default();
            for r in schemas_at_path(&schema_root, &lookup, &path) {
                property_completions(&r, &existing, &mut items);
            }
        }
        CursorTarget::Value => {
            for r in schemas_at_path(&schema_root, &lookup, &path) {
                value_completions(&r, &mut items);
            }
        }
    }
    items.dedup_by(|a, b| a.label == b.label && a.kind == b.kind);
    items
}

/// Source ranges of every schema node governing the cursor position.
pub fn schema_locations_at(
    document: &str,
    schema: &str,
    line: u32,
    column: u32,
) -> Vec<Location> {
    let doc = match parse(document).value {
        Some(v) => v,
        None => return Vec::new(),
    };
    let schema_root = match parse(schema).value {
        Some(v) => v,
        None => return Vec::new(),
    };
    let (path, _) = match path_at(&doc, line, column) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let lookup = SchemaIdLookup::build(&schema_root);
    schemas_at_path(&schema_root, &lookup, &path)
        .into_iter()
        .map(|r| r.node.location)
        .collect()
}

/// Resolve a `$ref` under the cursor in a schema document to the location
/// of its target.
pub fn ref_targets_at(schema: &str, line: u32, column: u32) -> Vec<Location> {
    let schema_root = match parse(schema).value {
        Some(v) => v,
        None => return Vec::new(),
    };
    let lookup = SchemaIdLookup::build(&schema_root);
    let root_base = lookup.root_base().to_string();
    let mut out = Vec::new();
    if let Some((reference, base)) = find_ref_at(&schema_root, &root_base, line, column) {
        if let Some(target) = lookup.resolve(&reference, &base) {
            out.push(target.node.location);
        }
    }
    out
}

// ---- helpers --------------------------------------------------------------

fn describe_schema(r: &ResolvedSchema<'_>) -> Option<String> {
    let obj = r.node.as_object()?;
    let mut parts = Vec::new();
    if let Some(title) = obj.get("title").and_then(Kson::as_str) {
        parts.push(format!("**{title}**"));
    }
    if let Some(ty) = obj.get("type") {
        match &ty.kind {
            ValueKind::String(s) => parts.push(format!("`{}`", s.value)),
            ValueKind::Array { elements, .. } => {
                let names: Vec<&str> = elements.iter().filter_map(Kson::as_str).collect();
                if !names.is_empty() {
                    parts.push(format!("`{}`", names.join(" | ")));
                }
            }
            _ => {}
        }
    }
    if let Some(desc) = obj.get("description").and_then(Kson::as_str) {
        parts.push(desc.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn property_completions(
    r: &ResolvedSchema<'_>,
    existing: &[String],
    items: &mut Vec<CompletionItem>,
) {
    let props = match r
        .node
        .as_object()
        .and_then(|o| o.get("properties"))
        .and_then(Kson::as_object)
    {
        Some(p) => p,
        None => return,
    };
    for p in &props.properties {
        if existing.iter().any(|e| e == &p.key.text) {
            continue;
        }
        let sub = p.value.as_object();
        items.push(CompletionItem {
            label: p.key.text.clone(),
            kind: CompletionKind::Property,
            detail: sub
                .and_then(|o| o.get("type"))
                .and_then(Kson::as_str)
                .map(str::to_string),
            documentation: sub
                .and_then(|o| o.get("description"))
                .and_then(Kson::as_str)
                .map(str::to_string),
        });
    }
}

fn value_completions(r: &ResolvedSchema<'_>, items: &mut Vec<CompletionItem>) {
    let obj = match r.node.as_object() {
        Some(o) => o,
        None => return,
    };
    let detail = obj.get("type").and_then(Kson::as_str).map(str::to_string);
    if let Some(values) = obj.get("enum").and_then(Kson::as_array) {
        for v in values {
            items.push(CompletionItem {
                label: crate::transcode::value_to_json(v),
                kind: CompletionKind::Value,
                detail: detail.clone(),
                documentation: None,
            });
        }
    }
    if let Some(c) = obj.get("const") {
        items.push(CompletionItem {
            label: crate::transcode::value_to_json(c),
            kind: CompletionKind::Value,
            detail: detail.clone(),
            documentation: None,
        });
    }
    if detail.as_deref() == Some("boolean") {
        for label in ["true", "false"] {
            items.push(CompletionItem {
                label: label.to_string(),
                kind: CompletionKind::Value,
                detail: detail.clone(),
                documentation: None,
            });
        }
    }
}

/// The document path to the cursor, plus what the cursor is on.
fn path_at(doc: &Kson, line: u32, column: u32) -> Option<(Vec<PathToken>, CursorTarget)> {
    if !doc.location.contains_point(line, column) {
        return None;
    }
    let mut path = Vec::new();
    let mut current = doc;
    loop {
        match &current.kind {
            ValueKind::Object(o) => {
                let mut descended = false;
                for p in &o.properties {
                    if p.key.location.contains_point(line, column) {
                        path.push(PathToken::Key(p.key.text.clone()));
                        return Some((path, CursorTarget::Key));
                    }
                    if p.value.location.contains_point(line, column) {
                        path.push(PathToken::Key(p.key.text.clone()));
                        current = &p.value;
                        descended = true;
                        break;
                    }
                }
                if !descended {
                    return Some((path, CursorTarget::Container));
                }
            }
            ValueKind::Array { elements, .. } => {
                let mut descended = false;
                for (i, e) in elements.iter().enumerate() {
                    if e.location.contains_point(line, column) {
                        path.push(PathToken::Index(i));
                        current = e;
                        descended = true;
                        break;
                    }
                }
                if !descended {
                    return Some((path, CursorTarget::Container));
                }
            }
            _ => return Some((path, CursorTarget::Value)),
        }
    }
}

fn node_at_path<'a>(doc: &'a Kson, path: &[PathToken]) -> Option<&'a Kson> {
    let mut current = doc;
    for token in path {
        current = match (token, &current.kind) {
            (PathToken::Key(k), ValueKind::Object(o)) => o.get(k)?,
            (PathToken::Index(i), ValueKind::Array { elements, .. }) => elements.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Find a `$ref` string under the cursor, tracking the `$id` base on the
/// way down.
fn find_ref_at(node: &Kson, base: &str, line: u32, column: u32) -> Option<(String, String)> {
    let obj = node.as_object()?;
    let base_owned;
    let base = match obj.get("$id").and_then(Kson::as_str) {
        Some(id) if !id.starts_with('#') => {
            base_owned = crate::schema::uri::resolve_reference(base, id);
            crate::schema::uri::normalize(&base_owned)
        }
        _ => base,
    };
    for p in &obj.properties {
        if p.key.text == "$ref" {
            let on_it = p.key.location.contains_point(line, column)
                || p.value.location.contains_point(line, column);
            if on_it {
                if let Some(r) = p.value.as_str() {
                    return Some((r.to_string(), base.to_string()));
                }
            }
        }
        if let Some(found) = find_ref_at(&p.value, base, line, column) {
            return Some(found);
        }
        if let ValueKind::Array { elements, .. } = &p.value.kind {
            for e in elements {
                if let Some(found) = find_ref_at(e, base, line, column) {
                    return Some(found);
                }
            }
        }
    }
    None
}
