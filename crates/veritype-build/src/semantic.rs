//! Semantic analysis: binds a parsed file's top-level definitions into
//! the shared symbol table, resolves `Unbound` annotation syntax, and
//! constructs `TypeInfo` for every class the file defines.
//!
//! Scope handling is flatter than the three-layer module/function/class
//! model described for this pass: every name - module globals, function
//! parameters, class members alike - is registered into the file's single
//! global scope (or, for class members, into the class's own `TypeInfo`
//! tables instead of a scope at all), matching the checker crate's own
//! choice not to push a scope per function or class body. A real nested
//! local-scope chain (shadowing a global `x` with a parameter `x`) is out
//! of reach of this simplification; recorded in `DESIGN.md`.

use rustc_hash::FxHashMap;

use veritype_ast::{Ast, ClassDefNode, FuncDefNode, Node, NodeId, VarDefNode};
use veritype_binder::{
    resolve_annotation, AnnotationError, ScopeId, ScopeTree, Symbol, SymbolArena, SymbolDef, SymbolKind, TypeInfo,
    TypeInfoTable, TypeVarLookup,
};
use veritype_common::{Line, ModuleId};
use veritype_types::{Callable, ClassId, Type, WrapperKind};

pub struct AnalysisOutcome {
    pub scopes: ScopeTree,
    pub diagnostics: Vec<(Line, String)>,
}

/// Binds every top-level definition of `file` (already parsed into
/// `ast`), registering symbols into the shared `symbols` arena, classes
/// into the shared `classes` table and `class_names` map, and returns the
/// file's own scope chain plus whatever couldn't be resolved.
pub fn analyze_file(
    ast: &Ast,
    file: NodeId,
    module: ModuleId,
    symbols: &mut SymbolArena,
    classes: &mut TypeInfoTable,
    class_names: &mut FxHashMap<String, ClassId>,
) -> AnalysisOutcome {
    let mut scopes = ScopeTree::new();
    let global = scopes.global();
    let mut ctx = AnalysisCtx {
        ast,
        symbols,
        classes,
        class_names,
        module,
        diagnostics: Vec::new(),
    };

    let defs = match ast.get(file) {
        Node::File(f) => f.defs.clone(),
        _ => Vec::new(),
    };

    for def in defs {
        ctx.bind_top_level(&mut scopes, global, def);
    }

    AnalysisOutcome { scopes, diagnostics: ctx.diagnostics }
}

struct AnalysisCtx<'a> {
    ast: &'a Ast,
    symbols: &'a mut SymbolArena,
    classes: &'a mut TypeInfoTable,
    class_names: &'a mut FxHashMap<String, ClassId>,
    module: ModuleId,
    diagnostics: Vec<(Line, String)>,
}

impl<'a> AnalysisCtx<'a> {
    fn bind_top_level(&mut self, scopes: &mut ScopeTree, scope: ScopeId, def: NodeId) {
        let line = self.ast.line(def);
        match self.ast.get(def).clone() {
            Node::FuncDef(f) => self.bind_function(scopes, scope, None, &f, line),
            Node::OverloadedFuncDef(o) => {
                for item in o.items {
                    self.bind_top_level(scopes, scope, item);
                }
            }
            Node::VarDef(v) => self.bind_var(scopes, scope, None, &v, line),
            Node::ClassDef(c) => self.bind_class(scopes, scope, &c, line),
            _ => {}
        }
    }

    fn bind_function(&mut self, scopes: &mut ScopeTree, scope: ScopeId, owner_class: Option<ClassId>, f: &FuncDefNode, line: Line) {
        let mut type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();
        for (i, name) in f.type_variables.iter().enumerate() {
            type_vars.insert(name.clone(), (-(i as i32) - 1, WrapperKind::None));
        }

        let mut arg_types = Vec::with_capacity(f.params.len());
        let mut arg_kinds = Vec::with_capacity(f.params.len());
        let mut arg_names = Vec::with_capacity(f.params.len());
        let mut min_args = 0;
        let mut is_var_arg = false;
        for param in &f.params {
            let ty = self.resolve_or_any(param.annotation, &type_vars, line);
            if param.kind.is_positional() && param.default.is_none() {
                min_args += 1;
            }
            if matches!(param.kind, veritype_common::ArgKind::Star) {
                is_var_arg = true;
            }
            arg_types.push(ty);
            arg_kinds.push(param.kind);
            arg_names.push(Some(param.name.clone()));
        }

        let ret_type = if f.return_annotation.is_none() {
            Type::Any
        } else {
            self.resolve_or_any(f.return_annotation, &type_vars, line)
        };

        let callable = Callable {
            arg_types,
            arg_kinds,
            arg_names,
            min_args,
            is_var_arg,
            ret_type: Box::new(ret_type),
            is_type_obj: false,
            name: Some(f.name.clone()),
            variables: type_vars.values().map(|(id, _)| *id).collect(),
            bound_vars: Vec::new(),
        };

        let def = SymbolDef::Function(NodeId::NONE);
        let kind = if owner_class.is_some() { SymbolKind::Member } else { SymbolKind::Global };
        let mut symbol = Symbol::new(f.name.clone(), kind, def, self.module);
        symbol.type_override = Some(Type::callable(callable));
        let id = self.symbols.alloc(symbol);

        match owner_class {
            Some(class_id) => {
                self.classes.get_mut(class_id).methods.insert(f.name.clone(), id);
            }
            None => scopes.define(scope, &f.name, id),
        }
    }

    fn bind_var(&mut self, scopes: &mut ScopeTree, scope: ScopeId, owner_class: Option<ClassId>, v: &VarDefNode, line: Line) {
        let no_type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();
        let declared = if v.annotation.is_none() {
            None
        } else {
            Some(self.resolve_or_any(v.annotation, &no_type_vars, line))
        };

        for name in &v.names {
            let kind = if owner_class.is_some() { SymbolKind::Member } else { SymbolKind::Global };
            let mut symbol = Symbol::new(name.clone(), kind, SymbolDef::Variable(NodeId::NONE), self.module);
            symbol.type_override = declared.clone();
            let id = self.symbols.alloc(symbol);
            match owner_class {
                Some(class_id) => {
                    self.classes.get_mut(class_id).members.insert(name.clone(), id);
                }
                None => scopes.define(scope, name, id),
            }
        }
    }

    fn bind_class(&mut self, scopes: &mut ScopeTree, scope: ScopeId, c: &ClassDefNode, line: Line) {
        let mut class_type_vars: FxHashMap<String, (i32, WrapperKind)> = FxHashMap::default();
        for (i, name) in c.type_variables.iter().enumerate() {
            class_type_vars.insert(name.clone(), (i as i32 + 1, WrapperKind::None));
        }

        let mut superclass = None;
        let mut interfaces = Vec::new();
        let mut base_types = Vec::new();
        for (i, &base) in c.base_types.iter().enumerate() {
            match resolve_annotation(self.ast, base, self.class_names, self.classes, &class_type_vars) {
                Ok(ty) => {
                    if let Type::Instance(inst) = &ty {
                        if i == 0 {
                            superclass = Some(inst.class);
                        } else {
                            interfaces.push(inst.class);
                        }
                    }
                    base_types.push(ty);
                }
                Err(err) => self.diagnostics.push((line, annotation_error_message(&err))),
            }
        }

        let mut info = TypeInfo::new(c.name.clone(), c.is_interface);
        info.superclass = superclass;
        info.interfaces = interfaces;
        info.type_vars = c.type_variables.clone();
        info.base_types = base_types;
        let class_id = self.classes.alloc(info);
        self.classes.link_subclass(class_id);
        self.class_names.insert(c.name.clone(), class_id);

        for &member in &c.body {
            let member_line = self.ast.line(member);
            match self.ast.get(member).clone() {
                Node::FuncDef(f) => self.bind_function(scopes, scope, Some(class_id), &f, member_line),
                Node::VarDef(v) => self.bind_var(scopes, scope, Some(class_id), &v, member_line),
                _ => {}
            }
        }

        let type_var_args: Vec<Type> = c
            .type_variables
            .iter()
            .filter_map(|name| class_type_vars.get(name).map(|(id, kind)| (name.clone(), *id, *kind)))
            .map(|(name, id, wrapper_kind)| Type::TypeVar(Box::new(veritype_types::TypeVar { name, id, wrapper_kind })))
            .collect();
        let ctor = self.constructor_callable(class_id, &c.name, &type_var_args);
        let mut symbol = Symbol::new(c.name.clone(), SymbolKind::Global, SymbolDef::Class(NodeId::NONE), self.module);
        symbol.type_override = Some(ctor);
        let id = self.symbols.alloc(symbol);
        scopes.define(scope, &c.name, id);
    }

    /// Every class is callable as its own constructor; its signature
    /// comes from `__init__` (minus the implicit `self`) when the class
    /// defines one, otherwise it takes no arguments.
    fn constructor_callable(&self, class_id: ClassId, name: &str, type_var_args: &[Type]) -> Type {
        let ret_type = Box::new(Type::instance(class_id, type_var_args.to_vec()));
        let init = self.classes.get(class_id).methods.get("__init__").map(|id| self.symbols.get(*id));
        let (arg_types, arg_kinds, arg_names, min_args, is_var_arg) = match init.map(|s| &s.type_override) {
            Some(Some(Type::Callable(c))) if !c.arg_types.is_empty() => (
                c.arg_types[1..].to_vec(),
                c.arg_kinds[1..].to_vec(),
                c.arg_names[1..].to_vec(),
                c.min_args.saturating_sub(1),
                c.is_var_arg,
            ),
            _ => (Vec::new(), Vec::new(), Vec::new(), 0, false),
        };
        Type::callable(Callable {
            arg_types,
            arg_kinds,
            arg_names,
            min_args,
            is_var_arg,
            ret_type,
            is_type_obj: true,
            name: Some(name.to_string()),
            variables: Vec::new(),
            bound_vars: Vec::new(),
        })
    }

    fn resolve_or_any(&mut self, node: NodeId, type_vars: &dyn TypeVarLookup, line: Line) -> Type {
        if node.is_none() {
            return Type::Any;
        }
        match resolve_annotation(self.ast, node, self.class_names, self.classes, type_vars) {
            Ok(t) => t,
            Err(err) => {
                self.diagnostics.push((line, annotation_error_message(&err)));
                Type::Any
            }
        }
    }
}

fn annotation_error_message(err: &AnnotationError) -> String {
    match err {
        AnnotationError::UnknownName(name) => format!("Name \"{name}\" is not defined"),
        AnnotationError::ArityMismatch { name, expected, got } => {
            format!("\"{name}\" expects {expected} type argument(s), got {got}")
        }
        AnnotationError::NotAnnotationSyntax => "Invalid type annotation".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_ast::{FileNode, ParamNode};
    use veritype_common::ArgKind;

    fn fresh_classes() -> (TypeInfoTable, ClassId, FxHashMap<String, ClassId>) {
        let (classes, object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let mut names = FxHashMap::default();
        names.insert("object".to_string(), object);
        (classes, object, names)
    }

    #[test]
    fn top_level_function_is_registered_with_its_signature() {
        let mut ast = Ast::new();
        let param = ParamNode { name: "x".into(), kind: ArgKind::PositionalRequired, annotation: NodeId::NONE, default: NodeId::NONE };
        let body = ast.alloc(Node::Block(veritype_ast::BlockNode { stmts: vec![] }), Line(1));
        let func = ast.alloc(
            Node::FuncDef(FuncDefNode {
                name: "f".into(),
                params: vec![param],
                type_variables: vec![],
                return_annotation: NodeId::NONE,
                body,
                is_dynamically_typed: true,
            }),
            Line(1),
        );
        let file = ast.alloc(Node::File(FileNode { module_name: "m".into(), defs: vec![func] }), Line(0));

        let mut symbols = SymbolArena::new();
        let (mut classes, _object, mut names) = fresh_classes();
        let outcome = analyze_file(&ast, file, ModuleId(0), &mut symbols, &mut classes, &mut names);
        assert!(outcome.diagnostics.is_empty());
        let id = outcome.scopes.lookup(outcome.scopes.global(), "f").expect("f registered");
        assert!(matches!(symbols.get(id).type_override, Some(Type::Callable(_))));
    }

    #[test]
    fn class_definition_registers_class_name_and_constructor() {
        let mut ast = Ast::new();
        let class = ast.alloc(
            Node::ClassDef(ClassDefNode {
                name: "Widget".into(),
                type_variables: vec![],
                base_types: vec![],
                body: vec![],
                is_interface: false,
            }),
            Line(1),
        );
        let file = ast.alloc(Node::File(FileNode { module_name: "m".into(), defs: vec![class] }), Line(0));

        let mut symbols = SymbolArena::new();
        let (mut classes, _object, mut names) = fresh_classes();
        let outcome = analyze_file(&ast, file, ModuleId(0), &mut symbols, &mut classes, &mut names);
        assert!(names.contains_key("Widget"));
        let id = outcome.scopes.lookup(outcome.scopes.global(), "Widget").expect("class registered");
        match &symbols.get(id).type_override {
            Some(Type::Callable(c)) => assert!(c.is_type_obj),
            other => panic!("expected constructor callable, got {other:?}"),
        }
    }

    #[test]
    fn unknown_base_class_is_reported() {
        let mut ast = Ast::new();
        let base = ast.alloc(Node::TypeAnn(veritype_ast::TypeAnnNode::Name { name: "Ghost".into(), args: vec![] }), Line(2));
        let class = ast.alloc(
            Node::ClassDef(ClassDefNode {
                name: "Widget".into(),
                type_variables: vec![],
                base_types: vec![base],
                body: vec![],
                is_interface: false,
            }),
            Line(2),
        );
        let file = ast.alloc(Node::File(FileNode { module_name: "m".into(), defs: vec![class] }), Line(0));

        let mut symbols = SymbolArena::new();
        let (mut classes, _object, mut names) = fresh_classes();
        let outcome = analyze_file(&ast, file, ModuleId(0), &mut symbols, &mut classes, &mut names);
        assert_eq!(outcome.diagnostics.len(), 1);
    }
}
