//! Same-type comparison: structural identity modulo variable name vs id,
//! with `Any` equal only to itself and `Void` only to itself. Grounded on
//! `sametypes.py`.

use crate::type_def::Type;

pub fn is_same_type(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Any, Type::Any) => true,
        (Type::Any, _) | (_, Type::Any) => false,

        (Type::Void(_), Type::Void(_)) => true,
        (Type::Void(_), _) | (_, Type::Void(_)) => false,

        (Type::Unbound(x), Type::Unbound(y)) => {
            x.name == y.name
                && x.args.len() == y.args.len()
                && x.args.iter().zip(&y.args).all(|(l, r)| is_same_type(l, r))
        }
        (Type::NoneType, Type::NoneType) => true,
        (Type::Error, Type::Error) => true,
        (Type::Erased, Type::Erased) => true,

        (Type::Instance(x), Type::Instance(y)) => {
            x.class == y.class
                && x.args.len() == y.args.len()
                && x.args.iter().zip(&y.args).all(|(l, r)| is_same_type(l, r))
        }

        (Type::TypeVar(x), Type::TypeVar(y)) => x.id == y.id,

        (Type::Callable(x), Type::Callable(y)) => {
            x.arg_types.len() == y.arg_types.len()
                && x.arg_kinds == y.arg_kinds
                && x.is_var_arg == y.is_var_arg
                && x.is_type_obj == y.is_type_obj
                && is_same_type(&x.ret_type, &y.ret_type)
                && x.arg_types
                    .iter()
                    .zip(&y.arg_types)
                    .all(|(l, r)| is_same_type(l, r))
        }

        (Type::Overloaded(x), Type::Overloaded(y)) => {
            x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(l, r)| {
                    is_same_type(&Type::Callable(Box::new(l.clone())), &Type::Callable(Box::new(r.clone())))
                })
        }

        (Type::Tuple(x), Type::Tuple(y)) => {
            x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(l, r)| is_same_type(l, r))
        }

        (Type::RuntimeTypeVar(x), Type::RuntimeTypeVar(y)) => x.expr == y.expr,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::ClassId;

    #[test]
    fn any_equals_only_any() {
        assert!(is_same_type(&Type::Any, &Type::Any));
        assert!(!is_same_type(&Type::Any, &Type::NoneType));
    }

    #[test]
    fn instances_compare_by_class_and_args() {
        let a = Type::instance(ClassId(1), vec![Type::Any]);
        let b = Type::instance(ClassId(1), vec![Type::Any]);
        let c = Type::instance(ClassId(2), vec![Type::Any]);
        assert!(is_same_type(&a, &b));
        assert!(!is_same_type(&a, &c));
    }
}
