//! Meet / greatest lower bound, grounded on `meet.py`'s `TypeMeetVisitor`.
//! Dual to join, but falls back to `None` rather than `object` when no
//! common subtype exists.

use crate::algebra::join::{combine_similar_callables_pub as combine_similar_callables, is_similar_callables_pub as is_similar_callables};
use crate::algebra::same_type::is_same_type;
use crate::algebra::subtypes::is_subtype;
use crate::hierarchy::ClassHierarchy;
use crate::type_def::{BasicTypes, Type};

pub fn meet_types(hierarchy: &dyn ClassHierarchy, basic: &BasicTypes, s: &Type, t: &Type) -> Type {
    if matches!(s, Type::Any) {
        return s.clone();
    }
    meet_against(hierarchy, basic, s, t)
}

fn meet_against(hierarchy: &dyn ClassHierarchy, basic: &BasicTypes, s: &Type, t: &Type) -> Type {
    match t {
        Type::Unbound(_) => match s {
            Type::Void(_) | Type::Error => Type::Error,
            Type::NoneType => s.clone(),
            _ => Type::Any,
        },
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
            if !matches!(s, Type::Void(_) | Type::Error) {
                t.clone()
            } else {
                Type::Error
            }
        }

        Type::TypeVar(tv) => match s {
            Type::TypeVar(sv) if sv.id == tv.id => s.clone(),
            _ => default_meet(s),
        },

        Type::Instance(ti) => match s {
            Type::Instance(si) => {
                if ti.class == si.class {
                    if is_subtype(
                        hierarchy,
                        &Type::Instance(Box::new((**ti).clone())),
                        &Type::Instance(Box::new((**si).clone())),
                    ) {
                        let args = ti
                            .args
                            .iter()
                            .zip(&si.args)
                            .map(|(a, b)| meet_types(hierarchy, basic, a, b))
                            .collect();
                        Type::instance(ti.class, args)
                    } else {
                        Type::NoneType
                    }
                } else if is_subtype(
                    hierarchy,
                    &Type::Instance(Box::new((**ti).clone())),
                    &Type::Instance(Box::new((**si).clone())),
                ) {
                    t.clone()
                } else if is_subtype(
                    hierarchy,
                    &Type::Instance(Box::new((**si).clone())),
                    &Type::Instance(Box::new((**ti).clone())),
                ) {
                    s.clone()
                } else {
                    Type::NoneType
                }
            }
            _ => default_meet(s),
        },

        Type::Callable(tc) => match s {
            Type::Callable(sc) if is_similar_callables(tc, sc) => {
                Type::Callable(Box::new(combine_similar_callables(hierarchy, basic, tc, sc)))
            }
            _ => default_meet(s),
        },

        Type::Tuple(tt) => match s {
            Type::Tuple(st) if st.items.len() == tt.items.len() => Type::tuple(
                tt.items
                    .iter()
                    .zip(&st.items)
                    .map(|(a, b)| meet_types(hierarchy, basic, a, b))
                    .collect(),
            ),
            _ => default_meet(s),
        },

        Type::Overloaded(_) => {
            if is_same_type(s, t) {
                s.clone()
            } else {
                default_meet(s)
            }
        }

        Type::RuntimeTypeVar(_) => default_meet(s),
    }
}

fn default_meet(s: &Type) -> Type {
    match s {
        Type::Unbound(_) => Type::Any,
        Type::Void(_) | Type::Error => Type::Error,
        _ => Type::NoneType,
    }
}
