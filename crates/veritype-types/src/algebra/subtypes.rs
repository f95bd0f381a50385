//! Subtyping, grounded on `subtypes.py`'s `SubtypeVisitor`.

use crate::algebra::supertype::map_instance_to_supertype;
use crate::hierarchy::ClassHierarchy;
use crate::type_def::{Callable, Type};

pub fn is_subtype(hierarchy: &dyn ClassHierarchy, left: &Type, right: &Type) -> bool {
    if matches!(right, Type::Any) || matches!(right, Type::Unbound(_)) {
        return true;
    }

    match left {
        Type::Unbound(_) => true,
        Type::Any => true,
        Type::Error => false,
        Type::Erased => true,

        Type::Void(_) => matches!(right, Type::Void(_)),
        Type::NoneType => !matches!(right, Type::Void(_)),

        Type::Instance(l) => match right {
            Type::Instance(r) => {
                let rname = hierarchy.full_name(r.class);
                if !hierarchy.has_base(l.class, rname) && rname != "builtins.object" {
                    return false;
                }
                let mapped = map_instance_to_supertype(hierarchy, l, r.class);
                mapped.args.len() == r.args.len()
                    && mapped
                        .args
                        .iter()
                        .zip(&r.args)
                        .all(|(a, b)| is_equivalent(hierarchy, a, b))
            }
            _ => false,
        },

        Type::TypeVar(l) => match right {
            Type::TypeVar(r) => l.id == r.id && l.wrapper_kind == r.wrapper_kind,
            Type::Instance(r) => hierarchy.full_name(r.class) == "builtins.object",
            _ => false,
        },

        Type::Callable(l) => match right {
            Type::Callable(r) => is_callable_subtype(l, r),
            Type::Instance(r) => {
                let rname = hierarchy.full_name(r.class);
                rname == "builtins.object" || (rname == "builtins.type" && l.is_type_obj)
            }
            _ => false,
        },

        Type::Tuple(l) => match right {
            Type::Instance(r) => {
                let rname = hierarchy.full_name(r.class);
                rname == "builtins.object" || rname == "builtins.tuple"
            }
            Type::Tuple(r) => {
                l.items.len() == r.items.len()
                    && l.items
                        .iter()
                        .zip(&r.items)
                        .all(|(a, b)| is_subtype(hierarchy, a, b))
            }
            _ => false,
        },

        Type::Overloaded(l) => {
            if let Type::Instance(r) = right {
                if hierarchy.full_name(r.class) == "builtins.object" {
                    return true;
                }
            }
            match right {
                Type::Callable(_) => l.items.iter().any(|item| {
                    is_subtype(hierarchy, &Type::Callable(Box::new(item.clone())), right)
                }),
                Type::Instance(r) if hierarchy.full_name(r.class) == "builtins.type" => l
                    .items
                    .iter()
                    .any(|item| is_subtype(hierarchy, &Type::Callable(Box::new(item.clone())), right)),
                Type::Overloaded(r) => {
                    l.items.len() == r.items.len()
                        && l.items.iter().zip(&r.items).all(|(a, b)| {
                            is_subtype(
                                hierarchy,
                                &Type::Callable(Box::new(a.clone())),
                                &Type::Callable(Box::new(b.clone())),
                            )
                        })
                }
                Type::Unbound(_) => true,
                _ => false,
            }
        }

        Type::RuntimeTypeVar(_) => false,
    }
}

pub fn is_equivalent(hierarchy: &dyn ClassHierarchy, a: &Type, b: &Type) -> bool {
    is_subtype(hierarchy, a, b) && is_subtype(hierarchy, b, a)
}

/// Subtyping is not defined across generic functions with free variables;
/// such comparisons return false.
fn is_callable_subtype(left: &Callable, right: &Callable) -> bool {
    if !left.variables.is_empty() || !right.variables.is_empty() {
        return false;
    }

    if right.is_type_obj && !left.is_type_obj {
        return false;
    }

    // Return type: covariant. Params: contravariant. Arity: left must
    // accept at least right's required count.
    if left.arg_types.len() < right.arg_types.len() {
        return false;
    }
    if left.min_args > right.min_args {
        return false;
    }
    if right.is_var_arg && !left.is_var_arg {
        return false;
    }
    if left.is_var_arg && !right.is_var_arg && left.arg_types.len() <= right.arg_types.len() {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::ClassId;
    use rustc_hash::FxHashMap;

    struct FlatHierarchy {
        names: FxHashMap<ClassId, &'static str>,
        object: ClassId,
    }

    impl ClassHierarchy for FlatHierarchy {
        fn full_name(&self, class: ClassId) -> &str {
            self.names.get(&class).copied().unwrap_or("?")
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
            0
        }
        fn base_types(&self, _class: ClassId) -> &[Type] {
            &[]
        }
        fn has_base(&self, class: ClassId, full_name: &str) -> bool {
            self.full_name(class) == full_name
        }
        fn object_class(&self) -> ClassId {
            self.object
        }
    }

    fn hierarchy() -> FlatHierarchy {
        let mut names = FxHashMap::default();
        names.insert(ClassId(0), "builtins.object");
        names.insert(ClassId(1), "pkg.Foo");
        FlatHierarchy {
            names,
            object: ClassId(0),
        }
    }

    #[test]
    fn any_is_subtype_of_everything_on_the_right() {
        let h = hierarchy();
        assert!(is_subtype(&h, &Type::NoneType, &Type::Any));
    }

    #[test]
    fn void_is_subtype_only_of_void() {
        let h = hierarchy();
        assert!(is_subtype(
            &h,
            &Type::Void(Default::default()),
            &Type::Void(Default::default())
        ));
        assert!(!is_subtype(&h, &Type::Void(Default::default()), &Type::NoneType));
    }

    #[test]
    fn none_is_subtype_of_non_void() {
        let h = hierarchy();
        assert!(is_subtype(&h, &Type::NoneType, &Type::instance(ClassId(1), vec![])));
        assert!(!is_subtype(&h, &Type::NoneType, &Type::Void(Default::default())));
    }

    #[test]
    fn same_instance_is_subtype_of_itself() {
        let h = hierarchy();
        let a = Type::instance(ClassId(1), vec![]);
        let b = Type::instance(ClassId(1), vec![]);
        assert!(is_subtype(&h, &a, &b));
    }

    #[test]
    fn unrelated_instance_is_not_subtype() {
        let h = hierarchy();
        let a = Type::instance(ClassId(1), vec![]);
        let b = Type::instance(ClassId(2), vec![]);
        // class(2) has no registered name ("?" != "pkg.Foo"), has_base
        // also false, so not a subtype.
        assert!(!is_subtype(&h, &a, &b));
    }
}
