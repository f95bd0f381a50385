//! AST node shapes consumed by the veritype checker pipeline.
//!
//! The lexer and the parser that produce these trees are external
//! collaborators, out of scope for this crate; what lives here is the
//! *contract* those components must satisfy — the node shapes — plus the
//! arena that stores them.
//!
//! Every node lives in a flat `Ast` arena and is referenced by `NodeId`
//! rather than owned inline: this keeps identity stable so the checker can
//! key a side-table of inferred types by node identity instead of mutating
//! the tree.

pub mod arena;
pub mod node;

pub use arena::{Ast, NodeId};
pub use node::*;
