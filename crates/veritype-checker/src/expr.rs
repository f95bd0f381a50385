//! Bidirectional expression checker: every `Node` expression variant maps
//! to a `Type`, consulting `state.expected()` where the spec calls for
//! context-driven inference (lambdas, container literals with no
//! annotation) and pushing it further down for the rest.

use veritype_binder::{resolve_annotation, AnnotationError};
use veritype_common::{DiagnosticCategory, DiagnosticKind};
use veritype_errors::message;
use veritype_types::algebra::{is_subtype, join_types};
use veritype_types::{Callable, Type};

use veritype_ast::{BinaryOp, Node, NodeId, UnaryOp};

use crate::call;
use crate::state::{CheckerState, FunctionContext};

pub fn check_expr(state: &mut CheckerState, node: NodeId) -> Type {
    let ty = compute(state, node);
    state.set_type(node, ty.clone());
    ty
}

fn compute(state: &mut CheckerState, node: NodeId) -> Type {
    let line = state.ast.line(node);
    match state.ast.get(node).clone() {
        Node::NameExpr(n) => check_name(state, &n.name, line),
        Node::MemberExpr(m) => check_member(state, m.base, &m.member, line),
        Node::CallExpr(c) => call::check_call(state, &c, line),
        Node::IndexExpr(i) => check_index(state, i.base, i.index, line),
        Node::SliceExpr(s) => check_slice(state, s.lower, s.upper, s.step, line),

        Node::IntExpr(_) => Type::instance(state.builtins.int, vec![]),
        Node::FloatExpr(_) => Type::instance(state.builtins.float, vec![]),
        Node::StrExpr(_) => Type::instance(state.builtins.str_, vec![]),
        Node::BytesExpr(_) => Type::instance(state.builtins.bytes, vec![]),
        Node::NoneExpr => Type::NoneType,

        Node::ParenExpr(inner) => check_expr(state, inner),
        Node::TupleExpr(items) => {
            Type::tuple(items.iter().map(|&i| check_expr(state, i)).collect())
        }
        Node::ListExpr(items) => check_container(state, &items, state.builtins.list),
        Node::SetExpr(items) => check_container(state, &items, state.builtins.set),
        Node::DictExpr(entries) => check_dict(state, &entries),

        Node::GeneratorExpr(c) | Node::ListComprehension(c) => check_comprehension(state, &c),
        Node::LambdaExpr(l) => check_lambda(state, &l.params, l.body),
        Node::CastExpr(c) => check_cast(state, c.target_type, c.expr, line),
        Node::TypeApplication(t) => check_expr(state, t.base),
        Node::UnaryExpr(u) => check_unary(state, u.op, u.operand, line),
        Node::BinaryExpr(b) => check_binary(state, b.op, b.left, b.right, line),
        Node::ConditionalExpr(c) => check_conditional(state, c.condition, c.if_expr, c.else_expr),
        Node::SuperExpr(s) => check_super(state, s.enclosing_class.as_deref(), line),

        _ => Type::Any,
    }
}

fn check_name(state: &mut CheckerState, name: &str, line: veritype_common::Line) -> Type {
    match state.lookup_name(name) {
        Some(id) => state.symbol_type(id),
        None => {
            state.errors.report(line, format!("Name \"{name}\" is not defined"), DiagnosticKind::NameResolution, DiagnosticCategory::Error);
            Type::Any
        }
    }
}

fn check_member(state: &mut CheckerState, base: NodeId, member: &str, line: veritype_common::Line) -> Type {
    let base_ty = check_expr(state, base);
    match &base_ty {
        Type::Any => Type::Any,
        Type::Instance(inst) => match state.find_member(inst.class, member) {
            Some(id) => state.symbol_type(id),
            None => {
                state.errors.report(
                    line,
                    format!("{} has no attribute \"{member}\"", message::format(state.classes, &base_ty)),
                    DiagnosticKind::NameResolution,
                    DiagnosticCategory::Error,
                );
                Type::Any
            }
        },
        _ => Type::Any,
    }
}

fn check_index(state: &mut CheckerState, base: NodeId, index: NodeId, line: veritype_common::Line) -> Type {
    let base_ty = check_expr(state, base);
    if let Type::Tuple(t) = &base_ty {
        let lit = if let Node::IntExpr(v) = state.ast.get(index) {
            Some(*v)
        } else {
            None
        };
        let Some(v) = lit else {
            state.errors.report(line, message::TUPLE_INDEX_MUST_BE_AN_INT_LITERAL, DiagnosticKind::Indexing, DiagnosticCategory::Error);
            return Type::Any;
        };
        return match usize::try_from(v).ok().and_then(|i| t.items.get(i)) {
            Some(item) => item.clone(),
            None => {
                state.errors.report(line, message::TUPLE_INDEX_OUT_OF_RANGE, DiagnosticKind::Indexing, DiagnosticCategory::Error);
                Type::Any
            }
        };
    }

    let index_ty = check_expr(state, index);
    dispatch_dunder(state, &base_ty, "__getitem__", &[index_ty], line)
}

fn check_slice(state: &mut CheckerState, lower: NodeId, upper: NodeId, step: NodeId, line: veritype_common::Line) -> Type {
    for part in [lower, upper, step] {
        if part.is_none() {
            continue;
        }
        let ty = check_expr(state, part);
        let ok = matches!(ty, Type::NoneType) || is_subtype(state.classes, &ty, &Type::instance(state.builtins.int, vec![]));
        if !ok {
            state.errors.report(line, message::INVALID_SLICE_INDEX, DiagnosticKind::Indexing, DiagnosticCategory::Error);
        }
    }
    Type::Any
}

/// List/set literals are conceptually a call to a synthetic generic
/// `(T*) -> list<T>`/`(T*) -> set<T>` constructor; since `solve_constraints`
/// just folds lower bounds with `join_types`, the element type of an
/// unannotated literal can be computed directly as the join of its items
/// without materializing that call.
fn check_container(state: &mut CheckerState, items: &[NodeId], class: veritype_types::ClassId) -> Type {
    if items.is_empty() {
        return Type::instance(class, vec![Type::Any]);
    }
    let mut elem = Type::Erased;
    for &item in items {
        let item_ty = check_expr(state, item);
        elem = if matches!(elem, Type::Erased) {
            item_ty
        } else {
            join_types(state.classes, &state.basic, &elem, &item_ty)
        };
    }
    Type::instance(class, vec![elem])
}

fn check_dict(state: &mut CheckerState, entries: &[(NodeId, NodeId)]) -> Type {
    if entries.is_empty() {
        return Type::instance(state.builtins.dict, vec![Type::Any, Type::Any]);
    }
    let mut key = Type::Erased;
    let mut value = Type::Erased;
    for &(k, v) in entries {
        let k_ty = check_expr(state, k);
        let v_ty = check_expr(state, v);
        key = if matches!(key, Type::Erased) { k_ty } else { join_types(state.classes, &state.basic, &key, &k_ty) };
        value = if matches!(value, Type::Erased) { v_ty } else { join_types(state.classes, &state.basic, &value, &v_ty) };
    }
    Type::instance(state.builtins.dict, vec![key, value])
}

fn check_comprehension(state: &mut CheckerState, c: &veritype_ast::ComprehensionNode) -> Type {
    check_expr(state, c.iterable);
    check_expr(state, c.target);
    for &cond in &c.conditions {
        check_expr(state, cond);
    }
    let elem = check_expr(state, c.element);
    if c.value.is_none() {
        Type::instance(state.builtins.list, vec![elem])
    } else {
        let value = check_expr(state, c.value);
        Type::instance(state.builtins.dict, vec![elem, value])
    }
}

/// With a `Callable` expected context of matching arity, a lambda's
/// parameters inherit the context's argument types; otherwise they default
/// to `Any`.
fn check_lambda(state: &mut CheckerState, params: &[veritype_ast::ParamNode], body: NodeId) -> Type {
    let ctx = state.expected().cloned();
    let arg_types: Vec<Type> = match &ctx {
        Some(Type::Callable(c)) if c.arg_types.len() == params.len() => c.arg_types.clone(),
        _ => vec![Type::Any; params.len()],
    };

    state.enter_function(FunctionContext { return_type: None, is_dynamic: true });
    let ret = check_expr(state, body);
    state.exit_function();

    Type::callable(Callable {
        arg_types,
        arg_kinds: params.iter().map(|p| p.kind).collect(),
        arg_names: params.iter().map(|p| Some(p.name.clone())).collect(),
        min_args: params.len(),
        is_var_arg: false,
        ret_type: Box::new(ret),
        is_type_obj: false,
        name: None,
        variables: vec![],
        bound_vars: vec![],
    })
}

fn check_cast(state: &mut CheckerState, target: NodeId, expr_node: NodeId, line: veritype_common::Line) -> Type {
    let source_ty = check_expr(state, expr_node);
    match resolve_annotation(state.ast, target, state.class_names, state.classes, state.type_vars()) {
        Ok(target_ty) => {
            let compatible = is_subtype(state.classes, &source_ty, &target_ty)
                || is_subtype(state.classes, &target_ty, &source_ty)
                || involves_interface(state, &source_ty)
                || involves_interface(state, &target_ty);
            if !compatible {
                state.errors.report(
                    line,
                    format!("Cannot cast from {} to {}", message::format(state.classes, &source_ty), message::format(state.classes, &target_ty)),
                    DiagnosticKind::Cast,
                    DiagnosticCategory::Error,
                );
            }
            target_ty
        }
        Err(AnnotationError::UnknownName(name)) => {
            state.errors.report(line, format!("Name \"{name}\" is not defined"), DiagnosticKind::Cast, DiagnosticCategory::Error);
            Type::Any
        }
        Err(_) => Type::Any,
    }
}

fn involves_interface(state: &CheckerState, ty: &Type) -> bool {
    matches!(ty, Type::Instance(i) if state.classes.get(i.class).is_interface)
}

fn check_unary(state: &mut CheckerState, op: UnaryOp, operand: NodeId, line: veritype_common::Line) -> Type {
    let operand_ty = check_expr(state, operand);
    match op {
        UnaryOp::Not => Type::instance(state.builtins.bool_, vec![]),
        UnaryOp::Neg => dispatch_dunder(state, &operand_ty, "__neg__", &[], line),
        UnaryOp::Invert => dispatch_dunder(state, &operand_ty, "__invert__", &[], line),
    }
}

fn check_binary(state: &mut CheckerState, op: BinaryOp, left: NodeId, right: NodeId, line: veritype_common::Line) -> Type {
    let left_ty = check_expr(state, left);

    match op {
        BinaryOp::And | BinaryOp::Or => {
            let right_ty = check_expr(state, right);
            join_types(state.classes, &state.basic, &left_ty, &right_ty)
        }
        BinaryOp::Is | BinaryOp::IsNot => {
            check_expr(state, right);
            Type::instance(state.builtins.bool_, vec![])
        }
        BinaryOp::In | BinaryOp::NotIn => {
            let right_ty = check_expr(state, right);
            dispatch_dunder(state, &right_ty, "__contains__", &[left_ty], line);
            Type::instance(state.builtins.bool_, vec![])
        }
        _ => {
            let right_ty = check_expr(state, right);
            dispatch_dunder(state, &left_ty, dunder_name(op), &[right_ty], line)
        }
    }
}

fn dunder_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "__add__",
        BinaryOp::Sub => "__sub__",
        BinaryOp::Mul => "__mul__",
        BinaryOp::Div => "__truediv__",
        BinaryOp::FloorDiv => "__floordiv__",
        BinaryOp::Mod => "__mod__",
        BinaryOp::Pow => "__pow__",
        BinaryOp::LShift => "__lshift__",
        BinaryOp::RShift => "__rshift__",
        BinaryOp::BitAnd => "__and__",
        BinaryOp::BitOr => "__or__",
        BinaryOp::BitXor => "__xor__",
        BinaryOp::Eq => "__eq__",
        BinaryOp::Ne => "__ne__",
        BinaryOp::Lt => "__lt__",
        BinaryOp::Le => "__le__",
        BinaryOp::Gt => "__gt__",
        BinaryOp::Ge => "__ge__",
        BinaryOp::And | BinaryOp::Or | BinaryOp::Is | BinaryOp::IsNot | BinaryOp::In | BinaryOp::NotIn => {
            unreachable!("handled by dedicated branches in check_binary")
        }
    }
}

/// Resolves `name` as a method on `receiver` and type-checks it as a
/// regular call against `extra_args`; a non-method attribute of that name is
/// an error, matching the original's "has no attribute" message for
/// unsupported operators.
fn dispatch_dunder(state: &mut CheckerState, receiver: &Type, name: &str, extra_args: &[Type], line: veritype_common::Line) -> Type {
    if matches!(receiver, Type::Any) {
        return Type::Any;
    }
    let Type::Instance(inst) = receiver else {
        return Type::Any;
    };
    let Some(id) = state.find_member(inst.class, name) else {
        state.errors.report(
            line,
            format!("{} has no attribute \"{name}\"", message::format(state.classes, receiver)),
            DiagnosticKind::Operator,
            DiagnosticCategory::Error,
        );
        return Type::Any;
    };
    let method_ty = state.symbol_type(id);
    let Type::Callable(callable) = method_ty else {
        state.errors.report(
            line,
            format!("\"{name}\" {}", message::UNSUPPORTED_OPERAND_ATTRIBUTE),
            DiagnosticKind::Operator,
            DiagnosticCategory::Error,
        );
        return Type::Any;
    };
    for (formal_ty, actual_ty) in callable.arg_types.iter().zip(extra_args) {
        if !is_subtype(state.classes, actual_ty, formal_ty) {
            state.errors.report(
                line,
                format!("{}: expected {}, got {}", message::INCOMPATIBLE_TYPES, message::format(state.classes, formal_ty), message::format(state.classes, actual_ty)),
                DiagnosticKind::Operator,
                DiagnosticCategory::Error,
            );
        }
    }
    (*callable.ret_type).clone()
}

fn check_conditional(state: &mut CheckerState, condition: NodeId, if_expr: NodeId, else_expr: NodeId) -> Type {
    check_expr(state, condition);
    let if_ty = check_expr(state, if_expr);
    let else_ty = check_expr(state, else_expr);
    join_types(state.classes, &state.basic, &if_ty, &else_ty)
}

fn check_super(state: &mut CheckerState, enclosing_class: Option<&str>, line: veritype_common::Line) -> Type {
    let Some(name) = enclosing_class else {
        state.errors.report(line, "super() used outside of a class", DiagnosticKind::NameResolution, DiagnosticCategory::Error);
        return Type::Any;
    };
    match state.class_names.get(name).and_then(|&c| state.classes.get(c).superclass) {
        Some(sup) => Type::instance(sup, vec![]),
        None => Type::Any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_ast::{Ast, Node};
    use veritype_binder::{ScopeTree, SymbolArena, TypeInfo, TypeInfoTable};
    use veritype_common::{CheckerOptions, Line};
    use veritype_errors::Errors;
    use veritype_types::{BasicTypes, ClassId};
    use rustc_hash::FxHashMap;

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
    fn int_literal_has_builtin_int_type() {
        let mut ast = Ast::new();
        let n = ast.alloc(Node::IntExpr(5), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let ty = check_expr(&mut state, n);
        assert!(matches!(ty, Type::Instance(i) if i.class == ClassId(1)));
    }

    #[test]
    fn list_literal_infers_join_of_item_types() {
        let mut ast = Ast::new();
        let a = ast.alloc(Node::IntExpr(1), Line(1));
        let b = ast.alloc(Node::IntExpr(2), Line(1));
        let list = ast.alloc(Node::ListExpr(vec![a, b]), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let ty = check_expr(&mut state, list);
        match ty {
            Type::Instance(i) => {
                assert_eq!(i.class, ClassId(6));
                assert!(matches!(i.args[0], Type::Instance(ref e) if e.class == ClassId(1)));
            }
            other => panic!("expected list instance, got {other:?}"),
        }
    }

    #[test]
    fn undefined_name_reports_an_error_and_returns_any() {
        let mut ast = Ast::new();
        let n = ast.alloc(Node::NameExpr(veritype_ast::NameExprNode { name: "missing".into() }), Line(1));
        let scopes = ScopeTree::new();
        let symbols = SymbolArena::new();
        let (classes, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let mut state = CheckerState::new(&ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors);

        let ty = check_expr(&mut state, n);
        assert!(matches!(ty, Type::Any));
        assert_eq!(state.errors.num_messages(), 1);
    }
}
