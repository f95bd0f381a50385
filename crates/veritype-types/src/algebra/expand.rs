//! Type-variable substitution, grounded on `expandtype.py`'s
//! `ExpandTypeVisitor`.

use rustc_hash::FxHashMap;

use crate::type_def::{Callable, Instance, Overloaded, Type, TupleType};

/// Structurally recurse through `ty`, replacing each `TypeVar` whose id is a
/// key of `map` with its mapped type. An `Instance` produced by replacing a
/// type variable gets its `erased` flag set. `Callable`'s `bound_vars` are
/// rewritten too; everything else is left structurally intact.
pub fn expand(ty: &Type, map: &FxHashMap<i32, Type>) -> Type {
    match ty {
        Type::Unbound(_)
        | Type::Any
        | Type::Void(_)
        | Type::NoneType
        | Type::Error
        | Type::Erased
        | Type::RuntimeTypeVar(_) => ty.clone(),

        Type::TypeVar(tv) => match map.get(&tv.id) {
            Some(Type::Instance(inst)) => {
                let mut replaced = (**inst).clone();
                replaced.erased = true;
                Type::Instance(Box::new(replaced))
            }
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },

        Type::Instance(inst) => Type::Instance(Box::new(Instance {
            class: inst.class,
            args: expand_all(&inst.args, map),
            erased: inst.erased,
        })),

        Type::Callable(c) => Type::Callable(Box::new(expand_callable(c, map))),

        Type::Overloaded(o) => Type::Overloaded(Box::new(Overloaded {
            items: o.items.iter().map(|c| expand_callable(c, map)).collect(),
        })),

        Type::Tuple(t) => Type::Tuple(Box::new(TupleType {
            items: expand_all(&t.items, map),
        })),
    }
}

fn expand_all(types: &[Type], map: &FxHashMap<i32, Type>) -> Vec<Type> {
    types.iter().map(|t| expand(t, map)).collect()
}

fn expand_callable(c: &Callable, map: &FxHashMap<i32, Type>) -> Callable {
    Callable {
        arg_types: expand_all(&c.arg_types, map),
        arg_kinds: c.arg_kinds.clone(),
        arg_names: c.arg_names.clone(),
        min_args: c.min_args,
        is_var_arg: c.is_var_arg,
        ret_type: Box::new(expand(&c.ret_type, map)),
        is_type_obj: c.is_type_obj,
        name: c.name.clone(),
        variables: c.variables.clone(),
        bound_vars: c
            .bound_vars
            .iter()
            .map(|(id, t)| (*id, expand(t, map)))
            .collect(),
    }
}

/// Build the `{1: args[0], 2: args[1], ...}` substitution map for an
/// instance's own type arguments, matching `type_var_map` in
/// `subtypes.py`. Class type variable ids are 1-based.
pub fn type_var_map(args: &[Type]) -> FxHashMap<i32, Type> {
    args.iter()
        .enumerate()
        .map(|(i, t)| (i as i32 + 1, t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::{ClassId, TypeVar, WrapperKind};

    #[test]
    fn replaces_matching_type_var() {
        let mut map = FxHashMap::default();
        map.insert(1, Type::Any);
        let tv = Type::TypeVar(Box::new(TypeVar {
            name: "T".into(),
            id: 1,
            wrapper_kind: WrapperKind::None,
        }));
        assert!(matches!(expand(&tv, &map), Type::Any));
    }

    #[test]
    fn leaves_unmatched_type_var_alone() {
        let map = FxHashMap::default();
        let tv = Type::TypeVar(Box::new(TypeVar {
            name: "T".into(),
            id: 1,
            wrapper_kind: WrapperKind::None,
        }));
        match expand(&tv, &map) {
            Type::TypeVar(t) => assert_eq!(t.id, 1),
            other => panic!("expected TypeVar, got {other:?}"),
        }
    }

    #[test]
    fn substituting_instance_sets_erased_flag() {
        let mut map = FxHashMap::default();
        let class = ClassId(7);
        map.insert(1, Type::instance(class, Vec::new()));
        let tv = Type::TypeVar(Box::new(TypeVar {
            name: "T".into(),
            id: 1,
            wrapper_kind: WrapperKind::None,
        }));
        match expand(&tv, &map) {
            Type::Instance(inst) => assert!(inst.erased),
            other => panic!("expected Instance, got {other:?}"),
        }
    }

    #[test]
    fn recurses_into_instance_args() {
        let mut map = FxHashMap::default();
        map.insert(1, Type::Any);
        let tv = Type::TypeVar(Box::new(TypeVar {
            name: "T".into(),
            id: 1,
            wrapper_kind: WrapperKind::None,
        }));
        let inst = Type::instance(ClassId(3), vec![tv]);
        match expand(&inst, &map) {
            Type::Instance(i) => assert!(matches!(i.args[0], Type::Any)),
            other => panic!("expected Instance, got {other:?}"),
        }
    }
}
