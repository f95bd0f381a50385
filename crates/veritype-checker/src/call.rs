//! Call resolution: callee classification, argument mapping, two-pass
//! generic inference, and the final arity/subtype verification.

use rustc_hash::FxHashMap;

use veritype_ast::{CallArg, CallExprNode, Node, NodeId};
use veritype_common::{DiagnosticCategory, DiagnosticKind, Line};
use veritype_errors::message;
use veritype_solver::{infer_constraints, solve_constraints};
use veritype_types::algebra::{erase, expand, is_subtype};
use veritype_types::{Callable, Overloaded, Type};

use crate::actuals::{actuals_to_formals, ActualArg};
use crate::expr;
use crate::state::CheckerState;

pub fn check_call(state: &mut CheckerState, call: &CallExprNode, line: Line) -> Type {
    let callee_ty = expr::check_expr(state, call.callee);
    resolve_call(state, &callee_ty, &call.args, line)
}

#[tracing::instrument(level = "debug", skip(state, args), fields(line = line.0, args = args.len()))]
fn resolve_call(state: &mut CheckerState, callee_ty: &Type, args: &[CallArg], line: Line) -> Type {
    if matches!(callee_ty, Type::Any) || state.is_dynamic() {
        tracing::trace!("callee is Any or checker is in dynamic mode, skipping call resolution");
        for arg in args {
            expr::check_expr(state, arg.value);
        }
        return Type::Any;
    }

    match callee_ty {
        Type::Overloaded(o) => check_overloaded_call(state, o, args, line),
        Type::Callable(c) => check_callable_call(state, c, args, line),
        _ => {
            tracing::debug!(?callee_ty, "callee is not callable");
            state.errors.report(line, message::NOT_CALLABLE, DiagnosticKind::Call, DiagnosticCategory::Error);
            Type::Any
        }
    }
}

/// Type-check arguments once with reporting disabled, pick the first
/// variant whose erased signature accepts the naive argument types, and
/// recurse into it for real.
fn check_overloaded_call(state: &mut CheckerState, overloaded: &Overloaded, args: &[CallArg], line: Line) -> Type {
    state.errors.disable_errors();
    let naive_types: Vec<Type> = args.iter().map(|a| expr::check_expr(state, a.value)).collect();
    state.errors.enable_errors();

    for item in &overloaded.items {
        if erased_signature_matches(state, item, args, &naive_types) {
            return check_callable_call(state, item, args, line);
        }
    }

    state.errors.report(line, message::NO_OVERLOAD_VARIANT_MATCHES, DiagnosticKind::Call, DiagnosticCategory::Error);
    Type::Any
}

fn erased_signature_matches(state: &CheckerState, item: &Callable, args: &[CallArg], naive_types: &[Type]) -> bool {
    let actuals: Vec<ActualArg> = args
        .iter()
        .zip(naive_types)
        .map(|(a, t)| ActualArg { kind: a.kind, name: a.name.clone(), ty: t.clone() })
        .collect();
    let mapping = actuals_to_formals(item, &actuals);

    let mut bound = vec![false; actuals.len()];
    for indices in &mapping {
        for &i in indices {
            bound[i] = true;
        }
    }
    if bound.iter().any(|b| !b) {
        return false;
    }

    for (formal_idx, kind) in item.arg_kinds.iter().enumerate() {
        let required = matches!(kind, veritype_common::ArgKind::PositionalRequired) && formal_idx < item.min_args;
        if required && mapping[formal_idx].is_empty() {
            return false;
        }
    }

    for (formal_idx, indices) in mapping.iter().enumerate() {
        let formal_erased = erase(&item.arg_types[formal_idx], &state.basic);
        for &i in indices {
            let actual_erased = erase(&actuals[i].ty, &state.basic);
            if !is_subtype(state.classes, &actual_erased, &formal_erased) {
                return false;
            }
        }
    }
    true
}

fn check_callable_call(state: &mut CheckerState, callee: &Callable, args: &[CallArg], line: Line) -> Type {
    state.errors.disable_errors();
    let naive_types: Vec<Type> = args.iter().map(|a| expr::check_expr(state, a.value)).collect();
    state.errors.enable_errors();

    let actuals: Vec<ActualArg> = args
        .iter()
        .zip(&naive_types)
        .map(|(a, t)| ActualArg { kind: a.kind, name: a.name.clone(), ty: t.clone() })
        .collect();
    let mapping = actuals_to_formals(callee, &actuals);

    let resolved_callee = if callee.is_generic() {
        infer_generic_callee(state, callee, &mapping, args, &naive_types, line)
    } else {
        callee.clone()
    };

    check_arg_counts_and_names(state, &resolved_callee, &mapping, args, line);

    for (formal_idx, indices) in mapping.iter().enumerate() {
        let Some(formal_ty) = resolved_callee.arg_types.get(formal_idx).cloned() else {
            continue;
        };
        for &i in indices {
            state.push_expected(formal_ty.clone());
            let actual_ty = expr::check_expr(state, args[i].value);
            state.pop_expected();

            let arg_line = state.ast.line(args[i].value);
            if actual_ty.is_void() {
                state.errors.report(arg_line, message::NO_RETURN_VALUE_EXPECTED, DiagnosticKind::Call, DiagnosticCategory::Error);
            } else if !is_subtype(state.classes, &actual_ty, &formal_ty) {
                state.errors.report(
                    arg_line,
                    format!(
                        "{}: expected {}, got {}",
                        message::INCOMPATIBLE_TYPES,
                        message::format(state.classes, &formal_ty),
                        message::format(state.classes, &actual_ty),
                    ),
                    DiagnosticKind::Call,
                    DiagnosticCategory::Error,
                );
            }
        }
    }

    (*resolved_callee.ret_type).clone()
}

fn check_arg_counts_and_names(
    state: &mut CheckerState,
    callee: &Callable,
    mapping: &[Vec<usize>],
    args: &[CallArg],
    line: Line,
) {
    for (formal_idx, kind) in callee.arg_kinds.iter().enumerate() {
        let required = matches!(kind, veritype_common::ArgKind::PositionalRequired) && formal_idx < callee.min_args;
        if required && mapping[formal_idx].is_empty() {
            state.errors.report(line, message::TOO_FEW_ARGUMENTS, DiagnosticKind::Call, DiagnosticCategory::Error);
        }
        if matches!(kind, veritype_common::ArgKind::Named) && mapping[formal_idx].len() > 1 {
            let name = callee.arg_names[formal_idx].clone().unwrap_or_default();
            state.errors.report(
                line,
                format!("{}: \"{name}\"", message::DUPLICATE_KEYWORD_ARGUMENT),
                DiagnosticKind::Call,
                DiagnosticCategory::Error,
            );
        }
    }

    let mut bound = vec![false; args.len()];
    for indices in mapping {
        for &i in indices {
            bound[i] = true;
        }
    }
    for (i, arg) in args.iter().enumerate() {
        if bound[i] {
            continue;
        }
        let arg_line = state.ast.line(arg.value);
        match arg.kind {
            veritype_common::ArgKind::Named => {
                let name = arg.name.clone().unwrap_or_default();
                state.errors.report(
                    arg_line,
                    format!("{}: \"{name}\"", message::UNEXPECTED_KEYWORD_ARGUMENT),
                    DiagnosticKind::Call,
                    DiagnosticCategory::Error,
                );
            }
            _ => {
                state.errors.report(arg_line, message::TOO_MANY_ARGUMENTS, DiagnosticKind::Call, DiagnosticCategory::Error);
            }
        }
    }
}

fn is_context_sensitive(state: &CheckerState, node: NodeId) -> bool {
    matches!(state.ast.get(node), Node::LambdaExpr(_))
}

/// Pass one infers from every non-lambda argument plus the enclosing
/// expected-return context; pass two re-checks lambda arguments against the
/// partially-solved callee and folds their constraints back in.
#[tracing::instrument(level = "debug", skip_all, fields(variables = ?callee.variables, line = line.0))]
fn infer_generic_callee(
    state: &mut CheckerState,
    callee: &Callable,
    mapping: &[Vec<usize>],
    args: &[CallArg],
    naive_types: &[Type],
    line: Line,
) -> Callable {
    let mut constraints = Vec::new();

    for (formal_idx, indices) in mapping.iter().enumerate() {
        let Some(formal_ty) = callee.arg_types.get(formal_idx) else {
            continue;
        };
        for &i in indices {
            if is_context_sensitive(state, args[i].value) {
                tracing::trace!(arg = i, "deferring lambda argument to pass two");
                continue;
            }
            constraints.extend(infer_constraints(state.classes, formal_ty, &naive_types[i]));
        }
    }

    if let Some(expected) = state.expected().cloned() {
        constraints.extend(infer_constraints(state.classes, &callee.ret_type, &expected));
    }

    tracing::debug!(constraints = constraints.len(), "solving pass one constraints");
    let partial_solved = solve_constraints(&callee.variables, &constraints, state.classes, &state.basic);
    let mut partial_map = FxHashMap::default();
    for (&var, ty) in &partial_solved {
        if let Some(t) = ty {
            partial_map.insert(var, t.clone());
        }
    }
    let Type::Callable(partial_callable) = expand(&Type::callable(callee.clone()), &partial_map) else {
        unreachable!("expand preserves the Callable shape")
    };

    for (formal_idx, indices) in mapping.iter().enumerate() {
        let Some(formal_ty) = partial_callable.arg_types.get(formal_idx).cloned() else {
            continue;
        };
        for &i in indices {
            if !is_context_sensitive(state, args[i].value) {
                continue;
            }
            state.push_expected(formal_ty.clone());
            let refined = expr::check_expr(state, args[i].value);
            state.pop_expected();
            if let Some(template) = callee.arg_types.get(formal_idx) {
                constraints.extend(infer_constraints(state.classes, template, &refined));
            }
        }
    }

    let solved = solve_constraints(&callee.variables, &constraints, state.classes, &state.basic);
    let mut map = FxHashMap::default();
    for &var in &callee.variables {
        match solved.get(&var).cloned().flatten() {
            Some(ty) => {
                map.insert(var, ty);
            }
            None => {
                tracing::debug!(var, "type variable left unresolved after both inference passes");
                if state.options.warn_unresolved_generics {
                    state.errors.report(
                        line,
                        "Cannot infer type argument",
                        DiagnosticKind::Call,
                        DiagnosticCategory::Warning,
                    );
                }
                map.insert(var, Type::Any);
            }
        }
    }

    let Type::Callable(resolved) = expand(&Type::callable(callee.clone()), &map) else {
        unreachable!("expand preserves the Callable shape")
    };
    *resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_ast::{Ast, NameExprNode};
    use veritype_binder::{ScopeTree, SymbolArena, TypeInfo, TypeInfoTable};
    use veritype_common::{ArgKind, CheckerOptions, Line};
    use veritype_errors::Errors;
    use veritype_types::{BasicTypes, ClassId};

    fn basic() -> BasicTypes {
        BasicTypes { object: ClassId(0), std_type: ClassId(0), tuple: ClassId(0), function: ClassId(0) }
    }

    fn builtins() -> crate::state::Builtins {
        crate::state::Builtins {
            int: ClassId(1),
            float: ClassId(2),
            str_: ClassId(3),
            bytes: ClassId(4),
            bool_: ClassId(5),
            list: ClassId(6),
            dict: ClassId(7),
            set: ClassId(8),
            iterator: ClassId(9),
        }
    }

    #[test]
    fn calling_any_accepts_anything_and_returns_any() {
        let mut ast = Ast::new();
        let arg = ast.alloc(Node::IntExpr(1), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let args = vec![CallArg { kind: ArgKind::PositionalRequired, name: None, value: arg }];
        let result = resolve_call(&mut state, &Type::Any, &args, Line(1));
        assert!(matches!(result, Type::Any));
    }

    #[test]
    fn calling_a_non_callable_reports_not_callable() {
        let ast = Ast::new();
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let int_ty = Type::instance(ClassId(1), vec![]);
        let result = resolve_call(&mut state, &int_ty, &[], Line(1));
        assert!(matches!(result, Type::Any));
        assert_eq!(state.errors.num_messages(), 1);
    }

    #[test]
    fn too_few_arguments_is_reported() {
        let mut ast = Ast::new();
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let callee = Callable {
            arg_types: vec![Type::instance(ClassId(1), vec![])],
            arg_kinds: vec![ArgKind::PositionalRequired],
            arg_names: vec![None],
            min_args: 1,
            is_var_arg: false,
            ret_type: Box::new(Type::NoneType),
            is_type_obj: false,
            name: None,
            variables: vec![],
            bound_vars: vec![],
        };
        let _ = ast.alloc(Node::NameExpr(NameExprNode { name: "f".into() }), Line(1));
        let result = resolve_call(&mut state, &Type::callable(callee), &[], Line(1));
        assert!(matches!(result, Type::NoneType));
        assert_eq!(state.errors.num_messages(), 1);
    }
}
