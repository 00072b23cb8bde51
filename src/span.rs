//! Source-location tracking shared by every compilation phase.

use std::fmt;

/// A location in the source text, used to attribute compile errors and,
/// once compiled, to reconstruct the bytecode line table (spec §3.2's
/// `lines` side table only keeps the line; `Span` carries the extra detail
/// the lexer and parser need before that point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
