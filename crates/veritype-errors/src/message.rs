//! Type pretty-printing for error messages, plus the fixed vocabulary of
//! parameter-free message strings. Kept separate from `Errors` so the
//! checker can format a type without touching the accumulator.

use veritype_types::{ClassHierarchy, Type};

pub const NO_RETURN_VALUE_EXPECTED: &str = "No return value expected";
pub const INCOMPATIBLE_RETURN_VALUE_TYPE: &str = "Incompatible return value type";
pub const RETURN_VALUE_EXPECTED: &str = "Return value expected";
pub const BOOLEAN_VALUE_EXPECTED: &str = "Boolean value expected";
pub const BOOLEAN_EXPECTED_FOR_IF: &str = "Boolean value expected for if condition";
pub const BOOLEAN_EXPECTED_FOR_WHILE: &str = "Boolean value expected for while condition";
pub const INVALID_EXCEPTION_TYPE: &str = "Invalid exception type";
pub const INVALID_RETURN_TYPE_FOR_YIELD: &str = "Iterator function return type expected for \"yield\"";
pub const INCOMPATIBLE_TYPES: &str = "Incompatible types";
pub const INCOMPATIBLE_TYPES_IN_ASSIGNMENT: &str = "Incompatible types in assignment";
pub const TUPLE_INDEX_MUST_BE_AN_INT_LITERAL: &str = "Tuple index must be an integer literal";
pub const TUPLE_INDEX_OUT_OF_RANGE: &str = "Tuple index out of range";
pub const INCOMPATIBLE_TUPLE_ITEM_TYPE: &str = "Incompatible tuple item type";
pub const NEED_ANNOTATION_FOR_VAR: &str = "Need type annotation for variable";
pub const ITERABLE_EXPECTED: &str = "Iterable expected";
pub const INCOMPATIBLE_TYPES_IN_FOR: &str = "Incompatible types in for statement";
pub const INVALID_SLICE_INDEX: &str = "Slice index must be an integer or None";
pub const CANNOT_INFER_LAMBDA_TYPE: &str = "Cannot infer type of lambda";
pub const TOO_FEW_ARGUMENTS: &str = "Too few arguments";
pub const TOO_MANY_ARGUMENTS: &str = "Too many arguments";
pub const UNEXPECTED_KEYWORD_ARGUMENT: &str = "Unexpected keyword argument";
pub const DUPLICATE_KEYWORD_ARGUMENT: &str = "Duplicate keyword argument";
pub const NOT_CALLABLE: &str = "Not callable";
pub const UNSUPPORTED_OPERAND_ATTRIBUTE: &str = "is not a method";
pub const NO_OVERLOAD_VARIANT_MATCHES: &str = "No overload variant matches";

/// Convert `typ` to a short string suitable for an error message, never the
/// empty string: falls back to `"function"`/`"object"` when `format_simple`
/// has nothing better to offer.
pub fn format(hierarchy: &dyn ClassHierarchy, typ: &Type) -> String {
    let simple = format_simple(hierarchy, typ);
    if !simple.is_empty() {
        return simple;
    }
    match typ {
        Type::Callable(_) | Type::Overloaded(_) => "function".to_string(),
        _ => "object".to_string(),
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

/// Convert simple types to a string suitable for error messages, or `""`
/// when the type has no short representation worth mentioning.
pub fn format_simple(hierarchy: &dyn ClassHierarchy, typ: &Type) -> String {
    match typ {
        Type::Instance(inst) => {
            let base = hierarchy.full_name(inst.class).rsplit('.').next().unwrap_or("?").to_string();
            if inst.args.is_empty() {
                format!("\"{base}\"")
            } else if hierarchy.full_name(inst.class) == "builtins.list" {
                format!("{}[]", strip_quotes(&format(hierarchy, &inst.args[0])))
            } else {
                let parts: Vec<String> = inst.args.iter().map(|a| strip_quotes(&format(hierarchy, a)).to_string()).collect();
                let joined = parts.join(", ");
                if base.len() + joined.len() < 25 {
                    format!("{base}<{joined}>")
                } else {
                    format!("{base}<...>")
                }
            }
        }
        Type::TypeVar(tv) => format!("\"{}\"", tv.name),
        Type::Tuple(tuple) => {
            let items: Vec<String> = tuple.items.iter().map(|t| strip_quotes(&format(hierarchy, t)).to_string()).collect();
            let s = format!("\"tuple<{}>\"", items.join(", "));
            if s.len() < 30 {
                s
            } else {
                "tuple".to_string()
            }
        }
        Type::Void(_) => "void".to_string(),
        Type::NoneType => "None".to_string(),
        Type::Any => "\"Any\"".to_string(),
        Type::Unbound(_) | Type::Error | Type::Erased | Type::RuntimeTypeVar(_) => String::new(),
        Type::Callable(_) | Type::Overloaded(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_types::ClassId;

    struct FlatHierarchy;
    impl ClassHierarchy for FlatHierarchy {
        fn full_name(&self, class: ClassId) -> &str {
            match class.0 {
                1 => "builtins.int",
                2 => "builtins.list",
                _ => "pkg.Foo",
            }
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
        fn has_base(&self, _class: ClassId, _full_name: &str) -> bool {
            false
        }
        fn object_class(&self) -> ClassId {
            ClassId(0)
        }
    }

    #[test]
    fn plain_instance_is_quoted_short_name() {
        let h = FlatHierarchy;
        let ty = Type::instance(ClassId(1), vec![]);
        assert_eq!(format(&h, &ty), "\"int\"");
    }

    #[test]
    fn list_instance_uses_bracket_shorthand() {
        let h = FlatHierarchy;
        let ty = Type::instance(ClassId(2), vec![Type::instance(ClassId(1), vec![])]);
        assert_eq!(format(&h, &ty), "int[]");
    }

    #[test]
    fn void_and_none_and_any_have_fixed_names() {
        let h = FlatHierarchy;
        assert_eq!(format(&h, &Type::NoneType), "None");
        assert_eq!(format(&h, &Type::Any), "\"Any\"");
    }

    #[test]
    fn callable_falls_back_to_function() {
        use veritype_common::ArgKind;
        use veritype_types::Callable;
        let h = FlatHierarchy;
        let c = Type::callable(Callable {
            arg_types: vec![],
            arg_kinds: vec![],
            arg_names: vec![],
            min_args: 0,
            is_var_arg: false,
            ret_type: Box::new(Type::Any),
            is_type_obj: false,
            name: None,
            variables: vec![],
            bound_vars: vec![],
        });
        assert_eq!(format(&h, &c), "function");
    }
}
