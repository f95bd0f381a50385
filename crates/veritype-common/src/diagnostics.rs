//! Diagnostic categories shared between the binder, solver and checker.
//!
//! The actual message text and the accumulator live in `veritype-errors`;
//! this crate only defines the vocabulary so that lower layers (which must
//! not depend on `veritype-errors`, to keep the dependency graph acyclic)
//! can still classify what kind of problem they are describing.

/// The kind of problem a diagnostic describes.
///
/// This is a classification, not a stable error code: unlike TypeScript's
/// `TSxxxx` codes, the source compiler this is modeled on reports plain
/// messages, so we keep categories as documentation/filtering only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    NameResolution,
    Annotation,
    Override,
    Assignment,
    Call,
    Operator,
    Flow,
    Indexing,
    Cast,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}
