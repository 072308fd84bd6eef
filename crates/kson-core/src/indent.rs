//! Indent and alignment validation.
//!
//! Structure in KSON comes from delimiters and colons, not indentation, so
//! indentation can lie about the tree the parser actually built. This pass
//! runs over a successful parse and flags the lies. It introduces no parse
//! errors and changes nothing.
//!
//! Rules, each with its own message kind:
//! - siblings of a plain object share a starting column;
//! - dash items of a plain list share the dash column;
//! - a nested plain object introduced by `key:` + newline must sit
//!   strictly right of its key; a nested dash list introduced below a
//!   dash must sit strictly right of that dash;
//! - delimited containers (`{`, `[`, `<`) reset the frame, and an item that
//!   starts mid-line is never measured.

use crate::lexer::{Token, TokenKind};
use crate::message::{Message, MessageKind, Severity};
use crate::position::Location;
use crate::value::{ArrayStyle, Kson, ObjectStyle, ValueKind};

/// Validate the tree's indentation against the structure it produced.
pub fn validate_indent(root: &Kson, source: &str, tokens: &[Token]) -> Vec<Message> {
    let checker = Checker {
        line_first_col: first_columns(source),
        dash_locations: tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ListDash)
            .map(|t| t.location)
            .collect(),
    };
    let mut out = Vec::new();
    checker.walk(root, &mut out);
    out
}

struct Checker {
    line_first_col: Vec<u32>,
    dash_locations: Vec<Location>,
}

/// Column of the first non-blank character on each line.
fn first_columns(source: &str) -> Vec<u32> {
    source
        .split('\n')
        .map(|line| {
            line.chars()
                .take_while(|&c| c == ' ' || c == '\t')
                .count() as u32
        })
        .collect()
}

impl Checker {
    fn is_leading(&self, loc: &Location) -> bool {
        self.line_first_col
            .get(loc.start.line as usize)
            .is_some_and(|&c| c == loc.start.column)
    }

    /// The dash introducing the item that starts at `item_start_offset`.
    fn dash_before(&self, item_start_offset: usize) -> Option<Location> {
        let i = self
            .dash_locations
            .partition_point(|d| d.start.byte_offset < item_start_offset);
        i.checked_sub(1).map(|i| self.dash_locations[i])
    }

    fn walk(&self, node: &Kson, out: &mut Vec<Message>) {
        match &node.kind {
            ValueKind::Object(o) => {
                if o.style == ObjectStyle::Plain {
                    self.check_object_alignment(node, out);
                }
                for p in &o.properties {
                    self.check_property_nesting(&p.key.location, &p.value, out);
                    self.walk(&p.value, out);
                }
            }
            ValueKind::Array { elements, style } => {
                if *style == ArrayStyle::Plain {
                    self.check_dash_alignment(elements, out);
                    self.check_dash_nesting(elements, out);
                }
                for e in elements {
                    self.walk(e, out);
                }
            }
            _ => {}
        }
    }

    fn check_object_alignment(&self, node: &Kson, out: &mut Vec<Message>) {
        let o = match &node.kind {
            ValueKind::Object(o) => o,
            _ => return,
        };
        let mut anchor: Option<u32> = None;
        for p in &o.properties {
            if !self.is_leading(&p.key.location) {
                continue;
            }
            let col = p.key.location.start.column;
            match anchor {
                None => anchor = Some(col),
                Some(a) if a == col => {}
                Some(a) => out.push(
                    Message::new(
                        Severity::Warning,
                        MessageKind::ObjectPropertiesMisaligned,
                        p.key.location,
                    )
                    .with_params(vec![(a + 1).to_string()]),
                ),
            }
        }
    }

    /// A nested plain object introduced by `key:` + newline must be
    /// indented past the key column. Other value kinds imply no nesting,
    /// and delimited containers hang off their own delimiter.
    fn check_property_nesting(&self, key: &Location, value: &Kson, out: &mut Vec<Message>) {
        match &value.kind {
            ValueKind::Object(o) if o.style == ObjectStyle::Plain => {}
            _ => return,
        }
        if value.location.start.line <= key.start.line {
            return;
        }
        if value.location.start.column <= key.start.column {
            out.push(Message::new(
                Severity::Warning,
                MessageKind::ObjectPropertyNestingIssue,
                value.location,
            ));
        }
    }

    fn check_dash_alignment(&self, elements: &[Kson], out: &mut Vec<Message>) {
        let mut anchor: Option<u32> = None;
        for e in elements {
            let dash = match self.dash_before(e.location.start.byte_offset) {
                Some(d) => d,
                None => continue,
            };
            if !self.is_leading(&dash) {
                continue;
            }
            let col = dash.start.column;
            match anchor {
                None => anchor = Some(col),
                Some(a) if a == col => {}
                Some(a) => out.push(
                    Message::new(
                        Severity::Warning,
                        MessageKind::DashListItemsMisaligned,
                        dash,
                    )
                    .with_params(vec![(a + 1).to_string()]),
                ),
            }
        }
    }

    /// A dash list nested below a bare dash must be indented past it.
    fn check_dash_nesting(&self, elements: &[Kson], out: &mut Vec<Message>) {
        for e in elements {
            let nested = match &e.kind {
                ValueKind::Array {
                    style: ArrayStyle::Plain,
                    ..
                } => e,
                _ => continue,
            };
            let parent_dash = match self.dash_before(e.location.start.byte_offset) {
                Some(d) => d,
                None => continue,
            };
            let child_start = nested.location.start;
            if child_start.line > parent_dash.start.line
                && child_start.column <= parent_dash.start.column
            {
                out.push(Message::new(
                    Severity::Warning,
                    MessageKind::DashListItemsNestingIssue,
                    nested.location,
                ));
            }
        }
    }
}
