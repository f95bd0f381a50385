//! The dependency-injection seam for lexing and parsing: out of scope for
//! this crate, supplied by the caller.

use veritype_ast::{Ast, NodeId};
use veritype_common::Line;

/// A parse failure reported against a specific line of the file being
/// parsed; carried separately from `Errors` since parsing happens before
/// a file has semantic context (enclosing class/function) to attach.
#[derive(Clone, Debug)]
pub struct ParseDiagnostic {
    pub line: Line,
    pub message: String,
}

/// The result of successfully parsing one file: its node arena and the
/// root `File` node.
pub struct ParsedModule {
    pub ast: Ast,
    pub root: NodeId,
}

/// Implemented by whatever lexer/parser front end the caller wires in.
/// The build manager only ever calls this once per file, at the
/// `Unprocessed` -> `Parsed` transition.
pub trait Parser {
    fn parse(&mut self, source: &str, path: &str) -> Result<ParsedModule, Vec<ParseDiagnostic>>;
}
