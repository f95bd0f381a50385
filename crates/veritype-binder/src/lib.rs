//! Semantic analyzer for the veritype checker.
//!
//! Builds the scope chain, resolves `Unbound` type-annotation syntax, and
//! constructs `TypeInfo` for each class. Depends on `veritype-types` for
//! the `Type`/`ClassHierarchy` vocabulary; the binder is where
//! `ClassHierarchy` gets a concrete implementation (`TypeInfoTable`).

pub mod annotation;
pub mod import;
pub mod scope;
pub mod symbol;
pub mod type_info;

pub use annotation::{resolve_annotation, AnnotationError, TypeVarLookup};
pub use import::{discover_imports, ImportEdge};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{Symbol, SymbolArena, SymbolDef, SymbolId, SymbolKind};
pub use type_info::{TypeInfo, TypeInfoTable};
