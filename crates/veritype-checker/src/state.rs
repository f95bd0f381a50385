//! Shared state threaded through every expression/statement check: the
//! node -> type map, the context stack of expected types, and handles onto
//! the scope/class tables the semantic analyzer already built.

use rustc_hash::FxHashMap;

use veritype_ast::{Ast, NodeId};
use veritype_binder::{ScopeId, ScopeTree, SymbolArena, SymbolId, TypeInfoTable};
use veritype_common::CheckerOptions;
use veritype_errors::Errors;
use veritype_types::{BasicTypes, ClassId, Type, WrapperKind};

/// Builtin class ids the checker needs by name. Resolved once, by whatever
/// populated the module's global symbol table, since this crate never
/// resolves names against a `builtins` module itself.
#[derive(Clone, Debug)]
pub struct Builtins {
    pub int: ClassId,
    pub float: ClassId,
    pub str_: ClassId,
    pub bytes: ClassId,
    pub bool_: ClassId,
    pub list: ClassId,
    pub dict: ClassId,
    pub set: ClassId,
    pub iterator: ClassId,
}

/// The enclosing function's return-type context: `None` stands for a
/// dynamically-typed function body, where parameter/return checks relax.
#[derive(Clone, Debug, Default)]
pub struct FunctionContext {
    pub return_type: Option<Type>,
    pub is_dynamic: bool,
}

pub struct CheckerState<'a> {
    pub ast: &'a Ast,
    pub scopes: &'a ScopeTree,
    pub symbols: &'a SymbolArena,
    pub classes: &'a TypeInfoTable,
    pub class_names: &'a FxHashMap<String, ClassId>,
    pub basic: BasicTypes,
    pub builtins: Builtins,
    pub options: &'a CheckerOptions,
    pub errors: &'a mut Errors,

    node_types: FxHashMap<NodeId, Type>,
    expected_stack: Vec<Type>,
    scope_stack: Vec<ScopeId>,
    function_stack: Vec<FunctionContext>,
    class_stack: Vec<ClassId>,
    type_var_scope: FxHashMap<String, (i32, WrapperKind)>,
}

impl<'a> CheckerState<'a> {
    pub fn new(
        ast: &'a Ast,
        scopes: &'a ScopeTree,
        symbols: &'a SymbolArena,
        classes: &'a TypeInfoTable,
        class_names: &'a FxHashMap<String, ClassId>,
        basic: BasicTypes,
        builtins: Builtins,
        options: &'a CheckerOptions,
        errors: &'a mut Errors,
    ) -> Self {
        let global = scopes.global();
        CheckerState {
            ast,
            scopes,
            symbols,
            classes,
            class_names,
            basic,
            builtins,
            options,
            errors,
            node_types: FxHashMap::default(),
            expected_stack: Vec::new(),
            scope_stack: vec![global],
            function_stack: Vec::new(),
            class_stack: Vec::new(),
            type_var_scope: FxHashMap::default(),
        }
    }

    pub fn get_type(&self, node: NodeId) -> Option<&Type> {
        self.node_types.get(&node)
    }

    pub fn set_type(&mut self, node: NodeId, ty: Type) {
        self.node_types.insert(node, ty);
    }

    pub fn push_expected(&mut self, ty: Type) {
        self.expected_stack.push(ty);
    }

    pub fn pop_expected(&mut self) {
        self.expected_stack.pop();
    }

    pub fn expected(&self) -> Option<&Type> {
        self.expected_stack.last()
    }

    pub fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is never empty")
    }

    pub fn push_scope(&mut self, scope: ScopeId) {
        self.scope_stack.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub fn lookup_name(&self, name: &str) -> Option<SymbolId> {
        self.scopes.lookup(self.current_scope(), name)
    }

    pub fn symbol_type(&self, id: SymbolId) -> Type {
        self.symbols
            .get(id)
            .type_override
            .clone()
            .unwrap_or(Type::Any)
    }

    pub fn enter_function(&mut self, ctx: FunctionContext) {
        self.function_stack.push(ctx);
    }

    pub fn exit_function(&mut self) {
        self.function_stack.pop();
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.function_stack.last().and_then(|f| f.return_type.as_ref())
    }

    pub fn is_dynamic(&self) -> bool {
        self.function_stack.last().map(|f| f.is_dynamic).unwrap_or(false)
    }

    pub fn enter_class(&mut self, class: ClassId) {
        self.class_stack.push(class);
    }

    pub fn exit_class(&mut self) {
        self.class_stack.pop();
    }

    pub fn current_class(&self) -> Option<ClassId> {
        self.class_stack.last().copied()
    }

    pub fn define_type_var(&mut self, name: String, id: i32, kind: WrapperKind) {
        self.type_var_scope.insert(name, (id, kind));
    }

    pub fn clear_type_vars(&mut self) {
        self.type_var_scope.clear();
    }

    pub fn type_vars(&self) -> &FxHashMap<String, (i32, WrapperKind)> {
        &self.type_var_scope
    }

    /// Walk `class`'s superclass and interface closure looking for a member
    /// or method named `name`; own members shadow inherited ones.
    pub fn find_member(&self, class: ClassId, name: &str) -> Option<SymbolId> {
        let info = self.classes.get(class);
        if let Some(id) = info.members.get(name).or_else(|| info.methods.get(name)) {
            return Some(*id);
        }
        if let Some(sup) = info.superclass {
            if let Some(id) = self.find_member(sup, name) {
                return Some(id);
            }
        }
        info.interfaces.iter().find_map(|i| self.find_member(*i, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_binder::{Symbol, SymbolDef, SymbolKind, TypeInfo};
    use veritype_common::ModuleId;

    fn builtins() -> Builtins {
        Builtins {
            int: ClassId(1),
            float: ClassId(2),
            str_: ClassId(3),
            bytes: ClassId(4),
            bool_: ClassId(5),
            list: ClassId(6),
            dict: ClassId(7),
            set: ClassId(8),
            iterator: ClassId(9),
        }
    }

    fn basic() -> BasicTypes {
        BasicTypes {
            object: ClassId(0),
            std_type: ClassId(0),
            tuple: ClassId(0),
            function: ClassId(0),
        }
    }

    #[test]
    fn find_member_walks_superclass_chain() {
        let (mut classes, object) = TypeInfoTable::new(TypeInfo::new("builtins.object".into(), false));
        let mut symbols = SymbolArena::new();
        let method = symbols.alloc(Symbol::new(
            "greet".into(),
            SymbolKind::Member,
            SymbolDef::Function(NodeId(0)),
            ModuleId(0),
        ));
        let mut base = TypeInfo::new("pkg.Base".into(), false);
        base.superclass = Some(object);
        base.methods.insert("greet".into(), method);
        let base_id = classes.alloc(base);
        let mut sub = TypeInfo::new("pkg.Sub".into(), false);
        sub.superclass = Some(base_id);
        let sub_id = classes.alloc(sub);

        let ast = Ast::new();
        let scopes = ScopeTree::new();
        let class_names = FxHashMap::default();
        let options = CheckerOptions::default();
        let mut errors = Errors::new();
        let state = CheckerState::new(
            &ast, &scopes, &symbols, &classes, &class_names, basic(), builtins(), &options, &mut errors,
        );

        assert_eq!(state.find_member(sub_id, "greet"), Some(method));
        assert_eq!(state.find_member(sub_id, "missing"), None);
    }
}
