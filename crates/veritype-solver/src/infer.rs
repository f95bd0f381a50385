//! Constraint generation: `infer_constraints` walks a generic template type
//! against a concrete actual; `infer_constraints_for_callable` does the
//! same for a whole call's argument list.

use veritype_common::ArgKind;
use veritype_types::algebra::map_instance_to_supertype;
use veritype_types::{Callable, ClassHierarchy, Type};

use crate::constraint::{Constraint, ConstraintOp};

/// Walk `template`, emitting a constraint each time a `TypeVar` is found,
/// bounded below by the corresponding position in `actual`.
pub fn infer_constraints(hierarchy: &dyn ClassHierarchy, template: &Type, actual: &Type) -> Vec<Constraint> {
    if let Type::Any = actual {
        return type_var_ids(template)
            .into_iter()
            .flat_map(|id| {
                [
                    Constraint::new(id, ConstraintOp::SupertypeOf, Type::Any),
                    Constraint::new(id, ConstraintOp::SubtypeOf, Type::Any),
                ]
            })
            .collect();
    }

    match template {
        Type::TypeVar(tv) => vec![Constraint::new(tv.id, ConstraintOp::SupertypeOf, actual.clone())],

        Type::Instance(t_inst) => {
            let Type::Instance(a_inst) = actual else {
                return Vec::new();
            };
            if !hierarchy.has_base(a_inst.class, hierarchy.full_name(t_inst.class)) {
                return Vec::new();
            }
            let mapped = map_instance_to_supertype(hierarchy, a_inst, t_inst.class);
            if mapped.args.len() != t_inst.args.len() {
                return Vec::new();
            }
            let mut result = Vec::new();
            for (t_arg, a_arg) in t_inst.args.iter().zip(&mapped.args) {
                let normal = infer_constraints(hierarchy, t_arg, a_arg);
                let negated: Vec<_> = normal.iter().map(Constraint::negated).collect();
                result.extend(normal);
                result.extend(negated);
            }
            result
        }

        Type::Callable(t_call) => {
            let Type::Callable(a_call) = actual else {
                return Vec::new();
            };
            let mut result = Vec::new();
            for (t_arg, a_arg) in t_call.arg_types.iter().zip(&a_call.arg_types) {
                let contravariant = infer_constraints(hierarchy, t_arg, a_arg);
                result.extend(contravariant.iter().map(Constraint::negated));
            }
            result.extend(infer_constraints(hierarchy, &t_call.ret_type, &a_call.ret_type));
            result
        }

        Type::Tuple(t_tuple) => {
            let Type::Tuple(a_tuple) = actual else {
                return Vec::new();
            };
            if t_tuple.items.len() != a_tuple.items.len() {
                return Vec::new();
            }
            t_tuple
                .items
                .iter()
                .zip(&a_tuple.items)
                .flat_map(|(t, a)| infer_constraints(hierarchy, t, a))
                .collect()
        }

        _ => Vec::new(),
    }
}

fn type_var_ids(ty: &Type) -> Vec<i32> {
    let mut ids = Vec::new();
    collect_type_var_ids(ty, &mut ids);
    ids
}

fn collect_type_var_ids(ty: &Type, out: &mut Vec<i32>) {
    match ty {
        Type::TypeVar(tv) => out.push(tv.id),
        Type::Instance(inst) => inst.args.iter().for_each(|a| collect_type_var_ids(a, out)),
        Type::Callable(c) => {
            c.arg_types.iter().for_each(|a| collect_type_var_ids(a, out));
            collect_type_var_ids(&c.ret_type, out);
        }
        Type::Overloaded(o) => o
            .items
            .iter()
            .for_each(|c| collect_type_var_ids(&Type::Callable(Box::new(c.clone())), out)),
        Type::Tuple(t) => t.items.iter().for_each(|i| collect_type_var_ids(i, out)),
        _ => {}
    }
}

/// Expand star-actuals against `callee`'s fixed parameters and emit one
/// constraint set per matched pair plus one for the vararg tail. `actuals`
/// pairs each actual's type with whether it was passed with `*` spread
/// syntax.
pub fn infer_constraints_for_callable(
    hierarchy: &dyn ClassHierarchy,
    callee: &Callable,
    actuals: &[(Type, ArgKind)],
) -> Vec<Constraint> {
    let fixed = callee.max_fixed_args();
    let mut result = Vec::new();
    let mut actual_idx = 0;
    let mut formal_idx = 0;

    while formal_idx < fixed && actual_idx < actuals.len() {
        let (actual_ty, kind) = &actuals[actual_idx];
        match kind {
            ArgKind::Star => {
                // A tuple actual distributes its items across formals by
                // length; a list-like actual fills the remaining formals
                // with its element type.
                if let Type::Tuple(tuple) = actual_ty {
                    for item in &tuple.items {
                        if formal_idx >= fixed {
                            break;
                        }
                        result.extend(infer_constraints(hierarchy, &callee.arg_types[formal_idx], item));
                        formal_idx += 1;
                    }
                } else if let Type::Instance(inst) = actual_ty {
                    if let Some(element) = inst.args.first() {
                        while formal_idx < fixed {
                            result.extend(infer_constraints(hierarchy, &callee.arg_types[formal_idx], element));
                            formal_idx += 1;
                        }
                    }
                }
                actual_idx += 1;
            }
            _ => {
                result.extend(infer_constraints(hierarchy, &callee.arg_types[formal_idx], actual_ty));
                formal_idx += 1;
                actual_idx += 1;
            }
        }
    }

    if callee.is_var_arg {
        if let Some(vararg_ty) = callee.arg_types.get(fixed) {
            for (actual_ty, kind) in &actuals[actual_idx..] {
                match kind {
                    ArgKind::Star => {
                        if let Type::Tuple(tuple) = actual_ty {
                            for item in &tuple.items {
                                result.extend(infer_constraints(hierarchy, vararg_ty, item));
                            }
                        } else if let Type::Instance(inst) = actual_ty {
                            if let Some(element) = inst.args.first() {
                                result.extend(infer_constraints(hierarchy, vararg_ty, element));
                            }
                        }
                    }
                    _ => result.extend(infer_constraints(hierarchy, vararg_ty, actual_ty)),
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_types::{ClassId, TypeVar, WrapperKind};

    struct FlatHierarchy;
    impl ClassHierarchy for FlatHierarchy {
        fn full_name(&self, _class: ClassId) -> &str {
            "pkg.List"
        }
        fn is_interface(&self, _class: ClassId) -> bool {
            false
        }
        fn superclass(&self, _class: ClassId) -> Option<ClassId> {
            None
        }
        fn interfaces(&self, _class: ClassId) -> &[ClassId] {
            &[]
        }
        fn type_var_count(&self, _class: ClassId) -> usize {
            1
        }
        fn base_types(&self, _class: ClassId) -> &[Type] {
            &[]
        }
        fn has_base(&self, _class: ClassId, full_name: &str) -> bool {
            full_name == "pkg.List"
        }
        fn object_class(&self) -> ClassId {
            ClassId(0)
        }
    }

    fn tv(id: i32) -> Type {
        Type::TypeVar(Box::new(TypeVar {
            name: "T".into(),
            id,
            wrapper_kind: WrapperKind::None,
        }))
    }

    #[test]
    fn type_var_against_concrete_emits_supertype_constraint() {
        let h = FlatHierarchy;
        let cs = infer_constraints(&h, &tv(1), &Type::instance(ClassId(5), vec![]));
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].var_id, 1);
        assert!(matches!(cs[0].op, ConstraintOp::SupertypeOf));
    }

    #[test]
    fn instance_with_type_var_arg_is_invariant() {
        let h = FlatHierarchy;
        let template = Type::instance(ClassId(1), vec![tv(1)]);
        let actual = Type::instance(ClassId(1), vec![Type::instance(ClassId(5), vec![])]);
        let cs = infer_constraints(&h, &template, &actual);
        assert_eq!(cs.len(), 2);
        assert!(cs.iter().any(|c| matches!(c.op, ConstraintOp::SupertypeOf)));
        assert!(cs.iter().any(|c| matches!(c.op, ConstraintOp::SubtypeOf)));
    }

    #[test]
    fn against_any_emits_both_bounds_for_every_variable() {
        let h = FlatHierarchy;
        let cs = infer_constraints(&h, &tv(2), &Type::Any);
        assert_eq!(cs.len(), 2);
        assert!(cs.iter().all(|c| matches!(c.target, Type::Any)));
    }

    #[test]
    fn callable_return_is_covariant_args_are_contravariant() {
        let h = FlatHierarchy;
        let template = Type::callable(Callable {
            arg_types: vec![tv(1)],
            arg_kinds: vec![ArgKind::PositionalRequired],
            arg_names: vec![None],
            min_args: 1,
            is_var_arg: false,
            ret_type: Box::new(tv(2)),
            is_type_obj: false,
            name: None,
            variables: vec![1, 2],
            bound_vars: vec![],
        });
        let actual = Type::callable(Callable {
            arg_types: vec![Type::instance(ClassId(5), vec![])],
            arg_kinds: vec![ArgKind::PositionalRequired],
            arg_names: vec![None],
            min_args: 1,
            is_var_arg: false,
            ret_type: Box::new(Type::instance(ClassId(6), vec![])),
            is_type_obj: false,
            name: None,
            variables: vec![],
            bound_vars: vec![],
        });
        let cs = infer_constraints(&h, &template, &actual);
        let arg_constraint = cs.iter().find(|c| c.var_id == 1).unwrap();
        assert!(matches!(arg_constraint.op, ConstraintOp::SubtypeOf));
        let ret_constraint = cs.iter().find(|c| c.var_id == 2).unwrap();
        assert!(matches!(ret_constraint.op, ConstraintOp::SupertypeOf));
    }
}
