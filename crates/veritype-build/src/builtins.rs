//! Bootstraps the handful of builtin classes every file implicitly
//! depends on.
//!
//! The real pipeline would parse these from a bundled `builtins.vt` stub
//! the way every other module is parsed, with `import_module("builtins")`
//! implicitly added as a dependency of every file that is not itself
//! `builtins` (see the import-discovery step in `unit.rs`). Since the
//! lexer/parser is an external collaborator this crate never invokes
//! against a stub it does not ship, the class table entries are
//! constructed directly instead, the same way the checker crate's own
//! test fixtures build a `Builtins` value by hand.

use rustc_hash::FxHashMap;

use veritype_binder::{TypeInfo, TypeInfoTable};
use veritype_checker::Builtins;
use veritype_types::{BasicTypes, ClassId};

/// One class registered into the shared `TypeInfoTable`, with the name it
/// is visible under in every file's global scope.
struct BuiltinClass {
    name: &'static str,
    type_vars: usize,
}

const BUILTIN_CLASSES: &[BuiltinClass] = &[
    BuiltinClass { name: "int", type_vars: 0 },
    BuiltinClass { name: "float", type_vars: 0 },
    BuiltinClass { name: "str", type_vars: 0 },
    BuiltinClass { name: "bytes", type_vars: 0 },
    BuiltinClass { name: "bool", type_vars: 0 },
    BuiltinClass { name: "list", type_vars: 1 },
    BuiltinClass { name: "dict", type_vars: 2 },
    BuiltinClass { name: "set", type_vars: 1 },
    BuiltinClass { name: "Iterator", type_vars: 1 },
    BuiltinClass { name: "type", type_vars: 0 },
    BuiltinClass { name: "tuple", type_vars: 0 },
    BuiltinClass { name: "function", type_vars: 0 },
];

/// Registers `object` plus every class `BUILTIN_CLASSES` names into
/// `classes`, returning the name -> id map every file's semantic analysis
/// seeds its own scope with, plus the two builtin bundles the algebra and
/// checker need by id.
pub fn bootstrap(classes: &mut TypeInfoTable, object: ClassId) -> (FxHashMap<String, ClassId>, BasicTypes, Builtins) {
    let mut names = FxHashMap::default();
    names.insert("object".to_string(), object);

    for class in BUILTIN_CLASSES {
        let mut info = TypeInfo::new(format!("builtins.{}", class.name), false);
        info.superclass = Some(object);
        for i in 0..class.type_vars {
            info.type_vars.push(format!("T{i}"));
        }
        let id = classes.alloc(info);
        classes.link_subclass(id);
        names.insert(class.name.to_string(), id);
    }

    let get = |name: &str| *names.get(name).expect("registered above");
    let basic = BasicTypes {
        object,
        std_type: get("type"),
        tuple: get("tuple"),
        function: get("function"),
    };
    let builtins = Builtins {
        int: get("int"),
        float: get("float"),
        str_: get("str"),
        bytes: get("bytes"),
        bool_: get("bool"),
        list: get("list"),
        dict: get("dict"),
        set: get("set"),
        iterator: get("Iterator"),
    };
    (names, basic, builtins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_registers_every_builtin_name() {
        let (mut classes, object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let (names, basic, builtins) = bootstrap(&mut classes, object);
        assert_eq!(names.get("int"), Some(&builtins.int));
        assert_eq!(basic.object, object);
        assert_eq!(classes.get(builtins.list).type_vars.len(), 1);
    }
}
