//! Resolves `Unbound` type-annotation syntax into `Instance`/`TypeVar`/
//! `Tuple`/`Callable`, the first half of what the original mypy revision
//! calls semantic analysis of types.

use rustc_hash::FxHashMap;

use veritype_ast::{Ast, Node, NodeId, TypeAnnNode};
use veritype_types::{Callable, ClassId, Type, TypeVar, WrapperKind};

use crate::type_info::TypeInfoTable;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationError {
    UnknownName(String),
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    NotAnnotationSyntax,
}

/// Looks up a name as a type variable in the enclosing class/function's
/// variable list. Kept as a trait object so callers (class-body analysis,
/// function-signature analysis) can supply different scopes without this
/// module depending on `ScopeTree` directly.
pub trait TypeVarLookup {
    fn lookup(&self, name: &str) -> Option<(i32, WrapperKind)>;
}

impl TypeVarLookup for FxHashMap<String, (i32, WrapperKind)> {
    fn lookup(&self, name: &str) -> Option<(i32, WrapperKind)> {
        self.get(name).copied()
    }
}

/// Resolve the annotation syntax rooted at `node` into a `Type`. `classes`
/// maps a class's fully-qualified (or locally visible) name to its
/// `ClassId`; `type_vars` resolves names bound as type variables in the
/// current scope, checked first so a type variable can shadow a
/// same-named class.
pub fn resolve_annotation(
    ast: &Ast,
    node: NodeId,
    classes: &FxHashMap<String, ClassId>,
    hierarchy: &TypeInfoTable,
    type_vars: &dyn TypeVarLookup,
) -> Result<Type, AnnotationError> {
    let Node::TypeAnn(ann) = ast.get(node) else {
        return Err(AnnotationError::NotAnnotationSyntax);
    };

    match ann {
        TypeAnnNode::Name { name, args } => {
            if name == "None" {
                return Ok(Type::NoneType);
            }
            if name == "Any" {
                return Ok(Type::Any);
            }
            if let Some((id, wrapper_kind)) = type_vars.lookup(name) {
                if !args.is_empty() {
                    return Err(AnnotationError::ArityMismatch {
                        name: name.clone(),
                        expected: 0,
                        got: args.len(),
                    });
                }
                return Ok(Type::TypeVar(Box::new(TypeVar {
                    name: name.clone(),
                    id,
                    wrapper_kind,
                })));
            }
            let Some(&class) = classes.get(name) else {
                tracing::debug!(name, "annotation names an unknown class");
                return Err(AnnotationError::UnknownName(name.clone()));
            };
            let expected = hierarchy.type_var_count(class);
            let mut resolved_args = Vec::with_capacity(expected);
            for arg in args {
                resolved_args.push(resolve_annotation(ast, *arg, classes, hierarchy, type_vars)?);
            }
            // Shortfalls are padded with `Any` during binding, not
            // construction; excess is an error.
            if resolved_args.len() > expected {
                tracing::debug!(name, expected, got = resolved_args.len(), "too many generic arguments in annotation");
                return Err(AnnotationError::ArityMismatch {
                    name: name.clone(),
                    expected,
                    got: resolved_args.len(),
                });
            }
            resolved_args.resize(expected, Type::Any);
            Ok(Type::instance(class, resolved_args))
        }

        TypeAnnNode::Tuple(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(resolve_annotation(ast, *item, classes, hierarchy, type_vars)?);
            }
            Ok(Type::tuple(resolved))
        }

        TypeAnnNode::Callable {
            arg_types,
            arg_kinds,
            arg_names,
            ret,
        } => {
            let mut resolved_arg_types = Vec::with_capacity(arg_types.len());
            for t in arg_types {
                resolved_arg_types.push(resolve_annotation(ast, *t, classes, hierarchy, type_vars)?);
            }
            let ret_type = resolve_annotation(ast, *ret, classes, hierarchy, type_vars)?;
            let min_args = arg_kinds
                .iter()
                .take_while(|k| matches!(k, veritype_common::ArgKind::PositionalRequired))
                .count();
            let is_var_arg = arg_kinds
                .iter()
                .any(|k| matches!(k, veritype_common::ArgKind::Star));
            Ok(Type::callable(Callable {
                arg_types: resolved_arg_types,
                arg_kinds: arg_kinds.clone(),
                arg_names: arg_names.clone(),
                min_args,
                is_var_arg,
                ret_type: Box::new(ret_type),
                is_type_obj: false,
                name: None,
                variables: Vec::new(),
                bound_vars: Vec::new(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_info::TypeInfo;
    use veritype_common::Line;

    #[test]
    fn resolves_plain_class_name() {
        let mut ast = Ast::new();
        let node = ast.alloc(
            Node::TypeAnn(TypeAnnNode::Name {
                name: "Foo".into(),
                args: vec![],
            }),
            Line(1),
        );
        let (mut table, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let foo_id = table.alloc(TypeInfo::new("pkg.Foo".into(), false));
        let mut classes = FxHashMap::default();
        classes.insert("Foo".to_string(), foo_id);
        let type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();

        let resolved = resolve_annotation(&ast, node, &classes, &table, &type_vars).unwrap();
        match resolved {
            Type::Instance(inst) => {
                assert_eq!(inst.class, foo_id);
                assert!(inst.args.is_empty());
            }
            other => panic!("expected Instance, got {other:?}"),
        }
    }

    #[test]
    fn pads_missing_generic_args_with_any() {
        let mut ast = Ast::new();
        let node = ast.alloc(
            Node::TypeAnn(TypeAnnNode::Name {
                name: "Box".into(),
                args: vec![],
            }),
            Line(1),
        );
        let (mut table, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let mut box_info = TypeInfo::new("pkg.Box".into(), false);
        box_info.type_vars.push("T".into());
        let box_id = table.alloc(box_info);
        let mut classes = FxHashMap::default();
        classes.insert("Box".to_string(), box_id);
        let type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();

        let resolved = resolve_annotation(&ast, node, &classes, &table, &type_vars).unwrap();
        match resolved {
            Type::Instance(inst) => {
                assert_eq!(inst.args.len(), 1);
                assert!(inst.args[0].is_any());
            }
            other => panic!("expected Instance, got {other:?}"),
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let mut ast = Ast::new();
        let node = ast.alloc(
            Node::TypeAnn(TypeAnnNode::Name {
                name: "Ghost".into(),
                args: vec![],
            }),
            Line(1),
        );
        let (table, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let classes = FxHashMap::default();
        let type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();

        assert_eq!(
            resolve_annotation(&ast, node, &classes, &table, &type_vars),
            Err(AnnotationError::UnknownName("Ghost".into()))
        );
    }

    #[test]
    fn type_variable_shadows_class_name() {
        let mut ast = Ast::new();
        let node = ast.alloc(
            Node::TypeAnn(TypeAnnNode::Name {
                name: "T".into(),
                args: vec![],
            }),
            Line(1),
        );
        let (table, _object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let classes = FxHashMap::default();
        let mut type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();
        type_vars.insert("T".to_string(), (1, WrapperKind::None));

        let resolved = resolve_annotation(&ast, node, &classes, &table, &type_vars).unwrap();
        match resolved {
            Type::TypeVar(tv) => assert_eq!(tv.id, 1),
            other => panic!("expected TypeVar, got {other:?}"),
        }
    }
}
