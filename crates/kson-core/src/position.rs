//! Source positions and spans.
//!
//! Every token and every value node carries a [`Location`]. Positions are
//! zero-based; lines are split on `\n` and columns count Unicode scalar
//! values, not bytes, so editor clients can use them directly.

use serde::Serialize;

/// A point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, byte_offset: usize) -> Self {
        Position {
            line,
            column,
            byte_offset,
        }
    }

    /// The origin position (start of the document).
    pub fn zero() -> Self {
        Position::new(0, 0, 0)
    }
}

/// A half-open span of source text: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Location { start, end }
    }

    /// A zero-width location at a single point.
    pub fn at(pos: Position) -> Self {
        Location {
            start: pos,
            end: pos,
        }
    }

    /// Smallest location covering both `self` and `other`.
    pub fn cover(self, other: Location) -> Location {
        let start = if other.start.byte_offset < self.start.byte_offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.byte_offset > self.end.byte_offset {
            other.end
        } else {
            self.end
        };
        Location { start, end }
    }

    /// Whether the (line, column) point falls inside this span.
    /// The end position counts as inside so a cursor sitting just past the
    /// last character of a value still resolves to it.
    pub fn contains_point(&self, line: u32, column: u32) -> bool {
        let p = (line, column);
        let s = (self.start.line, self.start.column);
        let e = (self.end.line, self.end.column);
        p >= s && p <= e
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Location) -> bool {
        self.start.byte_offset <= other.start.byte_offset
            && other.end.byte_offset <= self.end.byte_offset
    }
}
