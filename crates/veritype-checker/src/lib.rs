//! Bidirectional type checker for resolved ASTs.
//!
//! This crate is organized into several submodules:
//! - `state` - `CheckerState`, the node -> type map and context stacks shared
//!   by every check
//! - `actuals` - maps call-site arguments onto a callable's formal parameters
//! - `call` - call resolution: overloads, generic inference, arity/subtype
//!   verification
//! - `expr` - expression type checking
//! - `stmt` - statement and declaration type checking
//! - `override_check` - method override compatibility

pub mod actuals;
pub mod call;
pub mod expr;
pub mod override_check;
pub mod state;
pub mod stmt;

pub use actuals::{actuals_to_formals, ActualArg};
pub use call::check_call;
pub use expr::check_expr;
pub use override_check::{check_override, OverrideError};
pub use state::{Builtins, CheckerState, FunctionContext};
pub use stmt::{check_block, check_stmt};

use rustc_hash::FxHashMap;

use veritype_ast::Ast;
use veritype_binder::{ScopeTree, SymbolArena, TypeInfoTable};
use veritype_common::CheckerOptions;
use veritype_errors::Errors;
use veritype_types::{BasicTypes, ClassId};

/// Checks every top-level definition in a file's `FileNode` in order,
/// threading one `CheckerState` (and its accumulated diagnostics) through
/// the whole pass.
pub fn check_file(
    ast: &Ast,
    scopes: &ScopeTree,
    symbols: &SymbolArena,
    classes: &TypeInfoTable,
    class_names: &FxHashMap<String, ClassId>,
    basic: BasicTypes,
    builtins: Builtins,
    options: &CheckerOptions,
    errors: &mut Errors,
    defs: &[veritype_ast::NodeId],
) {
    let mut state = CheckerState::new(ast, scopes, symbols, classes, class_names, basic, builtins, options, errors);
    for &def in defs {
        check_stmt(&mut state, def);
    }
}
