//! Erasure: strip type parameters so two signatures can be compared
//! ignoring them (overload matching, override checks).

use crate::type_def::{BasicTypes, Type};

pub fn erase(ty: &Type, basic: &BasicTypes) -> Type {
    match ty {
        Type::TypeVar(_) => Type::Any,

        Type::Instance(inst) => {
            let args = vec![Type::Any; inst.args.len()];
            Type::instance(inst.class, args)
        }

        Type::Tuple(_) => Type::instance(basic.tuple, Vec::new()),

        Type::Callable(_) | Type::Overloaded(_) => Type::instance(basic.function, Vec::new()),

        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_def::ClassId;

    fn basics() -> BasicTypes {
        BasicTypes {
            object: ClassId(0),
            std_type: ClassId(1),
            tuple: ClassId(2),
            function: ClassId(3),
        }
    }

    #[test]
    fn erases_type_var_to_any() {
        let tv = Type::TypeVar(Box::new(crate::type_def::TypeVar {
            name: "T".into(),
            id: 1,
            wrapper_kind: crate::type_def::WrapperKind::None,
        }));
        assert!(matches!(erase(&tv, &basics()), Type::Any));
    }

    #[test]
    fn erases_instance_preserving_arity() {
        let inst = Type::instance(ClassId(9), vec![Type::Any, Type::NoneType]);
        match erase(&inst, &basics()) {
            Type::Instance(i) => {
                assert_eq!(i.class, ClassId(9));
                assert_eq!(i.args.len(), 2);
                assert!(i.args.iter().all(|a| a.is_any()));
            }
            other => panic!("expected Instance, got {other:?}"),
        }
    }

    #[test]
    fn erases_tuple_to_builtin_tuple() {
        let t = Type::tuple(vec![Type::Any, Type::NoneType]);
        match erase(&t, &basics()) {
            Type::Instance(i) => assert_eq!(i.class, ClassId(2)),
            other => panic!("expected Instance, got {other:?}"),
        }
    }
}
