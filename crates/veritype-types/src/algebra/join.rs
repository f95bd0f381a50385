//! Join / least upper bound, grounded on `join.py`'s `TypeJoinVisitor`.

use crate::algebra::subtypes::{is_equivalent, is_subtype};
use crate::algebra::supertype::map_instance_to_supertype;
use crate::hierarchy::ClassHierarchy;
use crate::type_def::{BasicTypes, Callable, Instance, Type};

pub fn join_types(hierarchy: &dyn ClassHierarchy, basic: &BasicTypes, s: &Type, t: &Type) -> Type {
    if matches!(s, Type::Any) {
        return s.clone();
    }
    if matches!(s, Type::NoneType) && !matches!(t, Type::Void(_)) {
        return t.clone();
    }
    join_against(hierarchy, basic, s, t)
}

/// `t.accept(TypeJoinVisitor(s, basic))`: dispatches on `t`'s shape with `s`
/// as the fixed left operand, mirroring the original visitor's inverted
/// dispatch order.
fn join_against(hierarchy: &dyn ClassHierarchy, basic: &BasicTypes, s: &Type, t: &Type) -> Type {
    match t {
        Type::Unbound(_) => {
            if matches!(s, Type::Void(_) | Type::Error) {
                Type::Error
            } else {
                Type::Any
            }
        }
        Type::Error => Type::Error,
        Type::Any => Type::Any,
        Type::Erased => s.clone(),

        Type::Void(_) => {
            if matches!(s, Type::Void(_)) {
                t.clone()
            } else {
                Type::Error
            }
        }

        Type::NoneType => {
            if !matches!(s, Type::Void(_)) {
                s.clone()
            } else {
                default_join(s, basic)
            }
        }

        Type::TypeVar(tv) => match s {
            Type::TypeVar(sv) if sv.id == tv.id => s.clone(),
            _ => default_join(s, basic),
        },

        Type::Instance(ti) => match s {
            Type::Instance(si) => join_instances(hierarchy, basic, ti, si, true),
            _ if ti.class == basic.std_type && is_subtype(hierarchy, s, t) => t.clone(),
            _ => default_join(s, basic),
        },

        Type::Callable(tc) => match s {
            Type::Callable(sc) if is_similar_callables(tc, sc) => {
                Type::Callable(Box::new(combine_similar_callables(hierarchy, basic, tc, sc)))
            }
            _ if tc.is_type_obj && is_subtype(hierarchy, s, &basic.object_instance()) => {
                basic.object_instance()
            }
            Type::Instance(si) if si.class == basic.std_type && tc.is_type_obj => {
                basic.object_instance()
            }
            _ => default_join(s, basic),
        },

        Type::Overloaded(_) => default_join(s, basic),

        Type::Tuple(tt) => match s {
            Type::Tuple(st) if st.items.len() == tt.items.len() => Type::tuple(
                tt.items
                    .iter()
                    .zip(&st.items)
                    .map(|(a, b)| join_types(hierarchy, basic, a, b))
                    .collect(),
            ),
            _ => default_join(s, basic),
        },

        Type::RuntimeTypeVar(_) => default_join(s, basic),
    }
}

fn default_join(s: &Type, basic: &BasicTypes) -> Type {
    match s {
        Type::Unbound(_) => Type::Any,
        Type::Void(_) | Type::Error => Type::Error,
        _ => basic.object_instance(),
    }
}

fn join_instances(
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
    t: &Instance,
    s: &Instance,
    allow_interfaces: bool,
) -> Type {
    if t.class == s.class {
        if is_subtype(hierarchy, &Type::Instance(Box::new(t.clone())), &Type::Instance(Box::new(s.clone()))) {
            let args = t
                .args
                .iter()
                .zip(&s.args)
                .map(|(a, b)| join_types(hierarchy, basic, a, b))
                .collect();
            Type::instance(t.class, args)
        } else {
            basic.object_instance()
        }
    } else if hierarchy.is_interface(t.class) != hierarchy.is_interface(s.class) {
        join_instances_as_interface(hierarchy, basic, t, s)
    } else if hierarchy.superclass(t.class).is_some()
        && is_subtype(hierarchy, &Type::Instance(Box::new(t.clone())), &Type::Instance(Box::new(s.clone())))
    {
        join_instances_via_supertype(hierarchy, basic, t, s, allow_interfaces)
    } else if hierarchy.superclass(s.class).is_some() {
        join_instances_via_supertype(hierarchy, basic, s, t, allow_interfaces)
    } else if allow_interfaces && !hierarchy.is_interface(t.class) {
        join_instances_as_interface(hierarchy, basic, t, s)
    } else {
        basic.object_instance()
    }
}

fn join_instances_via_supertype(
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
    t: &Instance,
    s: &Instance,
    allow_interfaces: bool,
) -> Type {
    let super_class = match hierarchy.superclass(t.class) {
        Some(c) => c,
        None => return basic.object_instance(),
    };
    let mapped = map_instance_to_supertype(hierarchy, t, super_class);
    let joined = join_instances(hierarchy, basic, &mapped, s, false);
    if matches!(joined, Type::Error) {
        return joined;
    }
    let Type::Instance(res) = joined else {
        return basic.object_instance();
    };
    if res.class == basic.object && !hierarchy.is_interface(t.class) && allow_interfaces {
        join_instances_as_interface(hierarchy, basic, t, s)
    } else {
        Type::Instance(res)
    }
}

fn join_instances_as_interface(
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
    t: &Instance,
    s: &Instance,
) -> Type {
    let t_ifaces = implemented_interfaces(hierarchy, t);
    let s_ifaces = implemented_interfaces(hierarchy, s);

    let mut candidates = Vec::new();
    for ti in &t_ifaces {
        for si in &s_ifaces {
            if let Type::Instance(j) = join_types(hierarchy, basic, ti, si) {
                if j.class != basic.object {
                    candidates.push(*j);
                }
            }
        }
    }

    match candidates.len() {
        1 => Type::Instance(Box::new(candidates.into_iter().next().unwrap())),
        0 => basic.object_instance(),
        _ => {
            let mut joined = Type::Instance(Box::new(candidates[0].clone()));
            for c in &candidates[1..] {
                joined = join_types(hierarchy, basic, &joined, &Type::Instance(Box::new(c.clone())));
            }
            if let Type::Instance(ref j) = joined {
                if j.class != basic.object {
                    return joined;
                }
            }
            Type::Error
        }
    }
}

fn implemented_interfaces(hierarchy: &dyn ClassHierarchy, t: &Instance) -> Vec<Type> {
    if hierarchy.is_interface(t.class) {
        return vec![Type::Instance(Box::new(t.clone()))];
    }
    let mut result = Vec::new();
    for iface in hierarchy.interfaces(t.class) {
        let mapped = map_instance_to_supertype(hierarchy, t, *iface);
        result.push(Type::Instance(Box::new(mapped)));
    }
    if let Some(super_class) = hierarchy.superclass(t.class) {
        let mapped = map_instance_to_supertype(hierarchy, t, super_class);
        result.extend(implemented_interfaces(hierarchy, &mapped));
    }
    result
}

pub(crate) fn is_similar_callables_pub(t: &Callable, s: &Callable) -> bool {
    is_similar_callables(t, s)
}

fn is_similar_callables(t: &Callable, s: &Callable) -> bool {
    t.arg_types.len() == s.arg_types.len()
        && t.min_args == s.min_args
        && t.is_var_arg == s.is_var_arg
        && is_equivalent(
            &NoopHierarchy,
            &Type::Callable(Box::new(t.clone())),
            &Type::Callable(Box::new(s.clone())),
        )
}

/// `is_similar_callables`/`combine_similar_callables` only ever compare two
/// `Callable`s to each other, a path that never touches class hierarchy
/// state; this stub lets `is_equivalent` type-check without threading a
/// real `ClassHierarchy` through every join call site.
struct NoopHierarchy;
impl ClassHierarchy for NoopHierarchy {
    fn full_name(&self, _class: crate::type_def::ClassId) -> &str {
        ""
    }
    fn is_interface(&self, _class: crate::type_def::ClassId) -> bool {
        false
    }
    fn superclass(&self, _class: crate::type_def::ClassId) -> Option<crate::type_def::ClassId> {
        None
    }
    fn interfaces(&self, _class: crate::type_def::ClassId) -> &[crate::type_def::ClassId] {
        &[]
    }
    fn type_var_count(&self, _class: crate::type_def::ClassId) -> usize {
        0
    }
    fn base_types(&self, _class: crate::type_def::ClassId) -> &[Type] {
        &[]
    }
    fn has_base(&self, _class: crate::type_def::ClassId, _full_name: &str) -> bool {
        false
    }
    fn object_class(&self) -> crate::type_def::ClassId {
        crate::type_def::ClassId(0)
    }
}

pub(crate) fn combine_similar_callables_pub(
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
    t: &Callable,
    s: &Callable,
) -> Callable {
    combine_similar_callables(hierarchy, basic, t, s)
}

fn combine_similar_callables(
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
    t: &Callable,
    s: &Callable,
) -> Callable {
    let arg_types = t
        .arg_types
        .iter()
        .zip(&s.arg_types)
        .map(|(a, b)| join_types(hierarchy, basic, a, b))
        .collect();
    Callable {
        arg_types,
        arg_kinds: t.arg_kinds.clone(),
        arg_names: t.arg_names.clone(),
        min_args: t.min_args,
        is_var_arg: t.is_var_arg,
        ret_type: Box::new(join_types(hierarchy, basic, &t.ret_type, &s.ret_type)),
        is_type_obj: t.is_type_obj && s.is_type_obj,
        name: None,
        variables: t.variables.clone(),
        bound_vars: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::ClassId;
    use rustc_hash::FxHashMap;

    struct LinearHierarchy {
        names: FxHashMap<ClassId, &'static str>,
        supers: FxHashMap<ClassId, ClassId>,
    }

    impl ClassHierarchy for LinearHierarchy {
        fn full_name(&self, class: ClassId) -> &str {
            self.names.get(&class).copied().unwrap_or("?")
        }
        fn is_interface(&self, _class: ClassId) -> bool {
            false
        }
        fn superclass(&self, class: ClassId) -> Option<ClassId> {
            self.supers.get(&class).copied()
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
            let mut cur = Some(class);
            while let Some(c) = cur {
                if self.full_name(c) == full_name {
                    return true;
                }
                cur = self.supers.get(&c).copied();
            }
            false
        }
        fn object_class(&self) -> ClassId {
            ClassId(0)
        }
    }

    fn setup() -> (LinearHierarchy, BasicTypes) {
        let object = ClassId(0);
        let foo = ClassId(1);
        let bar = ClassId(2);
        let mut names = FxHashMap::default();
        names.insert(object, "builtins.object");
        names.insert(foo, "pkg.Foo");
        names.insert(bar, "pkg.Bar");
        let mut supers = FxHashMap::default();
        supers.insert(foo, object);
        supers.insert(bar, object);
        (
            LinearHierarchy { names, supers },
            BasicTypes {
                object,
                std_type: ClassId(10),
                tuple: ClassId(11),
                function: ClassId(12),
            },
        )
    }

    #[test]
    fn join_with_any_is_any() {
        let (h, basic) = setup();
        assert!(matches!(join_types(&h, &basic, &Type::Any, &Type::NoneType), Type::Any));
    }

    #[test]
    fn join_none_with_instance_is_instance() {
        let (h, basic) = setup();
        let foo = Type::instance(ClassId(1), vec![]);
        let joined = join_types(&h, &basic, &Type::NoneType, &foo);
        match joined {
            Type::Instance(i) => assert_eq!(i.class, ClassId(1)),
            other => panic!("expected Instance, got {other:?}"),
        }
    }

    #[test]
    fn join_is_commutative_for_same_class() {
        let (h, basic) = setup();
        let a = Type::instance(ClassId(1), vec![]);
        let b = Type::instance(ClassId(1), vec![]);
        let ab = join_types(&h, &basic, &a, &b);
        let ba = join_types(&h, &basic, &b, &a);
        assert!(matches!(ab, Type::Instance(_)));
        assert!(matches!(ba, Type::Instance(_)));
    }

    #[test]
    fn join_unrelated_classes_falls_back_to_object() {
        let (h, basic) = setup();
        let foo = Type::instance(ClassId(1), vec![]);
        let bar = Type::instance(ClassId(2), vec![]);
        match join_types(&h, &basic, &foo, &bar) {
            Type::Instance(i) => assert_eq!(i.class, basic.object),
            other => panic!("expected Instance(object), got {other:?}"),
        }
    }
}
