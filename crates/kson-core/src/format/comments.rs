//! Comment recovery for the formatter.
//!
//! The value tree carries no trivia, so comments are mined from the token
//! stream and assigned to an *anchor*: a property (keyed by its key's start
//! offset) or a value node (keyed by its own start offset). A comment that
//! trails a construct on the same line attaches to that construct and is
//! floated above it; any other comment attaches to the next construct in
//! source order; comments after the last construct trail the document.
//! Blank lines between comments disappear because attached comments are
//! emitted as a contiguous run.

use crate::lexer::{Token, TokenKind};
use crate::value::{Kson, ValueKind};
use std::collections::HashMap;

/// Anchor offset used for comments that follow every construct.
const DOC_TRAILING: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Anchor {
    start: usize,
    end_byte: usize,
    end_line: u32,
}

#[derive(Debug, Default)]
pub(crate) struct CommentMap {
    by_anchor: HashMap<usize, Vec<String>>,
}

impl CommentMap {
    pub(crate) fn build(root: &Kson, tokens: &[Token]) -> CommentMap {
        let mut anchors = Vec::new();
        collect_anchors(root, &mut anchors);
        anchors.sort_by_key(|a| a.start);

        let mut map = CommentMap::default();
        for t in tokens.iter().filter(|t| t.kind == TokenKind::Comment) {
            let text = t.lexeme.trim_end().to_string();
            let c_line = t.location.start.line;
            let c_start = t.location.start.byte_offset;
            let c_end = t.location.end.byte_offset;

            let trailing = anchors
                .iter()
                .filter(|a| a.end_line == c_line && a.end_byte <= c_start)
                .min_by_key(|a| a.start);
            if let Some(a) = trailing {
                map.by_anchor.entry(a.start).or_default().push(text);
                continue;
            }

            let leading = anchors
                .iter()
                .filter(|a| a.start >= c_end)
                .min_by_key(|a| a.start);
            let key = leading.map(|a| a.start).unwrap_or(DOC_TRAILING);
            map.by_anchor.entry(key).or_default().push(text);
        }
        map
    }

    /// Remove and return the comments attached at `offset`.
    pub(crate) fn take(&mut self, offset: usize) -> Vec<String> {
        self.by_anchor.remove(&offset).unwrap_or_default()
    }

    /// Whatever was never flushed, document-trailing comments last,
    /// in source order.
    pub(crate) fn drain_remaining(&mut self) -> Vec<String> {
        let mut keys: Vec<usize> = self.by_anchor.keys().copied().collect();
        keys.sort_unstable();
        let mut out = Vec::new();
        for k in keys {
            if let Some(lines) = self.by_anchor.remove(&k) {
                out.extend(lines);
            }
        }
        out
    }
}

fn collect_anchors(node: &Kson, anchors: &mut Vec<Anchor>) {
    anchors.push(Anchor {
        start: node.location.start.byte_offset,
        end_byte: node.location.end.byte_offset,
        end_line: node.location.end.line,
    });
    match &node.kind {
        ValueKind::Object(o) => {
            for p in &o.properties {
                anchors.push(Anchor {
                    start: p.key.location.start.byte_offset,
                    end_byte: p.value.location.end.byte_offset,
                    end_line: p.value.location.end.line,
                });
                collect_anchors(&p.value, anchors);
            }
        }
        ValueKind::Array { elements, .. } => {
            for e in elements {
                collect_anchors(e, anchors);
            }
        }
        _ => {}
    }
}
