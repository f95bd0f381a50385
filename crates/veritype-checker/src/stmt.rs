//! Statement checker: walks a function/module body, type-checking each
//! statement and binding the context (enclosing function return type,
//! enclosing class) that expression checking and override verification
//! need along the way.

use veritype_ast::{FuncDefNode, Node, NodeId, VarDefNode};
use veritype_binder::{resolve_annotation, SymbolId};
use veritype_common::{DiagnosticCategory, DiagnosticKind, Line};
use veritype_errors::message;
use veritype_types::algebra::is_subtype;
use veritype_types::{ClassId, Type};

use crate::expr;
use crate::override_check::{check_override, OverrideError};
use crate::state::{CheckerState, FunctionContext};

pub fn check_block(state: &mut CheckerState, block: NodeId) {
    if block.is_none() {
        return;
    }
    if let Node::Block(b) = state.ast.get(block).clone() {
        for stmt in b.stmts {
            check_stmt(state, stmt);
        }
    } else {
        check_stmt(state, block);
    }
}

pub fn check_stmt(state: &mut CheckerState, node: NodeId) {
    let line = state.ast.line(node);
    match state.ast.get(node).clone() {
        Node::VarDef(v) => check_var_def(state, &v, line),
        Node::AssignmentStmt(a) => check_assignment(state, &a.targets, a.rvalue, line),
        Node::ExpressionStmt(e) => {
            expr::check_expr(state, e);
        }
        Node::ReturnStmt(e) => check_return(state, e, line),
        Node::IfStmt(i) => {
            for (&cond, &body) in i.conditions.iter().zip(&i.bodies) {
                check_bool_context(state, cond, message::BOOLEAN_EXPECTED_FOR_IF);
                check_block(state, body);
            }
            check_block(state, i.else_body);
        }
        Node::WhileStmt(w) => {
            check_bool_context(state, w.condition, message::BOOLEAN_EXPECTED_FOR_WHILE);
            check_block(state, w.body);
            check_block(state, w.else_body);
        }
        Node::ForStmt(f) => check_for(state, f.index, f.iterable, f.body, f.else_body, line),
        Node::TryStmt(t) => {
            check_block(state, t.body);
            for (exc_ty, _bound, handler) in &t.handlers {
                if !exc_ty.is_none() {
                    let ty = expr::check_expr(state, *exc_ty);
                    if !is_exception_like(&ty) {
                        state.errors.report(line, message::INVALID_EXCEPTION_TYPE, DiagnosticKind::Flow, DiagnosticCategory::Error);
                    }
                }
                check_block(state, *handler);
            }
            check_block(state, t.else_body);
            check_block(state, t.finally_body);
        }
        Node::WithStmt(w) => {
            for (ctx_expr, _name) in &w.items {
                expr::check_expr(state, *ctx_expr);
            }
            check_block(state, w.body);
        }
        Node::RaiseStmt(e) => {
            if !e.is_none() {
                let ty = expr::check_expr(state, e);
                if !is_exception_like(&ty) {
                    state.errors.report(line, message::INVALID_EXCEPTION_TYPE, DiagnosticKind::Flow, DiagnosticCategory::Error);
                }
            }
        }
        Node::Pass | Node::Break | Node::Continue => {}
        Node::Block(b) => {
            for stmt in b.stmts {
                check_stmt(state, stmt);
            }
        }
        Node::FuncDef(f) => check_func_def(state, &f, line),
        Node::OverloadedFuncDef(o) => {
            for &item in &o.items {
                check_stmt(state, item);
            }
        }
        Node::ClassDef(c) => {
            let class_id = state.class_names.get(&c.name).copied();
            if let Some(class_id) = class_id {
                state.enter_class(class_id);
                for &member in &c.body {
                    check_stmt(state, member);
                }
                check_overrides_for_class(state, class_id, line);
                state.exit_class();
            }
        }
        _ => {}
    }
}

fn is_exception_like(ty: &Type) -> bool {
    !matches!(ty, Type::NoneType | Type::Void(_))
}

fn check_bool_context(state: &mut CheckerState, cond: NodeId, message: &str) {
    let line = state.ast.line(cond);
    let ty = expr::check_expr(state, cond);
    if matches!(ty, Type::NoneType | Type::Void(_)) {
        state.errors.report(line, message, DiagnosticKind::Flow, DiagnosticCategory::Error);
    }
}

fn check_var_def(state: &mut CheckerState, v: &VarDefNode, line: Line) {
    let declared = if v.annotation.is_none() {
        None
    } else {
        match resolve_annotation(state.ast, v.annotation, state.class_names, state.classes, state.type_vars()) {
            Ok(t) => Some(t),
            Err(_) => Some(Type::Any),
        }
    };

    if !v.initializer.is_none() {
        if let Some(t) = &declared {
            state.push_expected(t.clone());
        }
        let init_ty = expr::check_expr(state, v.initializer);
        if declared.is_some() {
            state.pop_expected();
        }
        if let Some(t) = &declared {
            if !is_subtype(state.classes, &init_ty, t) {
                state.errors.report(line, message::INCOMPATIBLE_TYPES_IN_ASSIGNMENT, DiagnosticKind::Assignment, DiagnosticCategory::Error);
            }
        }
    } else if declared.is_none() {
        state.errors.report(line, message::NEED_ANNOTATION_FOR_VAR, DiagnosticKind::Annotation, DiagnosticCategory::Error);
    }
}

fn check_assignment(state: &mut CheckerState, targets: &[NodeId], rvalue: NodeId, line: Line) {
    let rvalue_ty = expr::check_expr(state, rvalue);
    for &target in targets {
        check_assign_target(state, target, &rvalue_ty, line);
    }
}

/// Binds `target` (a name, or a tuple for destructuring) against `value_ty`;
/// a name target must already be declared (the binder resolves it) and is
/// checked for subtype-compatibility, a tuple target destructures a `Tuple`
/// value positionally or falls back to checking every sub-target against
/// `Any` when the value's shape isn't statically known.
fn check_assign_target(state: &mut CheckerState, target: NodeId, value_ty: &Type, line: Line) {
    match state.ast.get(target).clone() {
        Node::NameExpr(n) => {
            if let Some(id) = state.lookup_name(&n.name) {
                let declared = state.symbol_type(id);
                if !matches!(declared, Type::Any) && !is_subtype(state.classes, value_ty, &declared) {
                    state.errors.report(line, message::INCOMPATIBLE_TYPES_IN_ASSIGNMENT, DiagnosticKind::Assignment, DiagnosticCategory::Error);
                }
            }
        }
        Node::TupleExpr(items) => match value_ty {
            Type::Tuple(t) if t.items.len() == items.len() => {
                for (&sub_target, item_ty) in items.iter().zip(&t.items) {
                    check_assign_target(state, sub_target, item_ty, line);
                }
            }
            _ => {
                for &sub_target in &items {
                    check_assign_target(state, sub_target, &Type::Any, line);
                }
            }
        },
        _ => {
            expr::check_expr(state, target);
        }
    }
}

fn check_return(state: &mut CheckerState, expr_node: NodeId, line: Line) {
    let return_ty = state.return_type().cloned();

    if expr_node.is_none() {
        if let Some(t) = &return_ty {
            if !matches!(t, Type::NoneType | Type::Void(_) | Type::Any) {
                state.errors.report(line, message::RETURN_VALUE_EXPECTED, DiagnosticKind::Flow, DiagnosticCategory::Error);
            }
        }
        return;
    }

    if let Some(t) = &return_ty {
        state.push_expected(t.clone());
    }
    let actual = expr::check_expr(state, expr_node);
    if return_ty.is_some() {
        state.pop_expected();
    }

    match &return_ty {
        Some(Type::Void(_)) => {
            state.errors.report(line, message::NO_RETURN_VALUE_EXPECTED, DiagnosticKind::Flow, DiagnosticCategory::Error);
        }
        Some(t) if !matches!(t, Type::Any) && !is_subtype(state.classes, &actual, t) => {
            state.errors.report(line, message::INCOMPATIBLE_RETURN_VALUE_TYPE, DiagnosticKind::Flow, DiagnosticCategory::Error);
        }
        _ => {}
    }
}

fn check_for(state: &mut CheckerState, index: NodeId, iterable: NodeId, body: NodeId, else_body: NodeId, line: Line) {
    let iterable_ty = expr::check_expr(state, iterable);
    let elem_ty = match &iterable_ty {
        Type::Any => Type::Any,
        Type::Instance(i) if i.args.len() == 1 => i.args[0].clone(),
        Type::Tuple(t) => t.items.first().cloned().unwrap_or(Type::Any),
        _ => {
            state.errors.report(line, message::ITERABLE_EXPECTED, DiagnosticKind::Flow, DiagnosticCategory::Error);
            Type::Any
        }
    };
    check_assign_target(state, index, &elem_ty, line);
    check_block(state, body);
    check_block(state, else_body);
}

fn check_func_def(state: &mut CheckerState, f: &FuncDefNode, line: Line) {
    let return_ty = if f.return_annotation.is_none() {
        None
    } else {
        resolve_annotation(state.ast, f.return_annotation, state.class_names, state.classes, state.type_vars()).ok()
    };

    state.enter_function(FunctionContext { return_type: return_ty, is_dynamic: f.is_dynamically_typed });
    check_block(state, f.body);
    state.exit_function();
    let _ = line;
}

fn check_overrides_for_class(state: &mut CheckerState, class_id: ClassId, line: Line) {
    let Some(superclass) = state.classes.get(class_id).superclass else {
        return;
    };
    let methods: Vec<(String, SymbolId)> = state
        .classes
        .get(class_id)
        .methods
        .iter()
        .map(|(name, id)| (name.clone(), *id))
        .collect();

    for (name, sub_id) in methods {
        let Some(sup_id) = state.find_member(superclass, &name) else {
            continue;
        };
        let sub_ty = state.symbol_type(sub_id);
        let sup_ty = state.symbol_type(sup_id);
        if let (Type::Callable(sub_c), Type::Callable(sup_c)) = (&sub_ty, &sup_ty) {
            if let Err(err) = check_override(state.classes, sub_c, sup_c) {
                state.errors.report(line, override_error_message(&name, &err), DiagnosticKind::Override, DiagnosticCategory::Error);
            }
        }
    }
}

fn override_error_message(name: &str, err: &OverrideError) -> String {
    match err {
        OverrideError::ArgumentNotContravariant { formal } => {
            format!("Argument {} of \"{name}\" incompatible with supertype", formal + 1)
        }
        OverrideError::ReturnNotCovariant => format!("Return type of \"{name}\" incompatible with supertype"),
        OverrideError::ArityMismatch => format!("Signature of \"{name}\" incompatible with supertype"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use veritype_ast::{Ast, AssignmentStmtNode, NameExprNode};
    use veritype_binder::{ScopeTree, SymbolArena, TypeInfo, TypeInfoTable};
    use veritype_common::CheckerOptions;
    use veritype_errors::Errors;
    use veritype_types::BasicTypes;

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
    fn return_without_value_in_non_void_function_is_reported() {
        let mut ast = Ast::new();
        let ret = ast.alloc(Node::ReturnStmt(NodeId::NONE), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);
        state.enter_function(FunctionContext { return_type: Some(Type::instance(ClassId(1), vec![])), is_dynamic: false });

        check_stmt(&mut state, ret);
        assert_eq!(state.errors.num_messages(), 1);
    }

    #[test]
    fn assignment_to_undeclared_name_is_silently_skipped() {
        let mut ast = Ast::new();
        let rhs = ast.alloc(Node::IntExpr(1), Line(1));
        let target = ast.alloc(Node::NameExpr(NameExprNode { name: "x".into() }), Line(1));
        let stmt = ast.alloc(Node::AssignmentStmt(AssignmentStmtNode { targets: vec![target], rvalue: rhs }), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        check_stmt(&mut state, stmt);
        assert_eq!(state.errors.num_messages(), 0);
    }
}
