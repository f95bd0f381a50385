//! Source positions.
//!
//! The checker pipeline never re-derives positions from source text: every
//! AST node is handed a line number (and, optionally, a byte span) by the
//! external parser. This module only defines the shapes those positions take.

use serde::Serialize;

/// A 1-based source line number. `UNKNOWN` mirrors the `-1` sentinel used
/// for synthetic nodes that have no source position (e.g. nodes built for
/// error messages).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Line(pub i32);

impl Line {
    pub const UNKNOWN: Line = Line(-1);

    pub fn is_known(self) -> bool {
        self.0 >= 0
    }
}

impl Default for Line {
    fn default() -> Self {
        Line::UNKNOWN
    }
}

/// A byte range within a single source file, used only for positioning error
/// underlines; never consulted by the type algebra itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}
