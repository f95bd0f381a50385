//! `TypeInfo` and the class table that owns it.
//!
//! Built once per class by the semantic analyzer and never mutated after
//! analysis ends for its file. Kept in its own arena keyed by `ClassId` so
//! `Instance` values (defined in `veritype-types`, which this crate
//! depends on) can reference a class without owning it — a back-reference,
//! not ownership, for the subclass list below.

use rustc_hash::FxHashMap;

use veritype_types::{ClassHierarchy, ClassId, Type};

use crate::symbol::SymbolId;

#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub full_name: String,
    pub is_interface: bool,
    pub superclass: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    /// Ordered type-variable names; position `i` corresponds to `TypeVar`
    /// id `i + 1`.
    pub type_vars: Vec<String>,
    /// Ordered base-type expressions as declared in source: first is the
    /// superclass (if any), the rest are interfaces.
    pub base_types: Vec<Type>,
    pub members: FxHashMap<String, SymbolId>,
    pub methods: FxHashMap<String, SymbolId>,
    /// Back-links to direct subclasses; observer-only, never used to
    /// drive ownership or drop order.
    pub subclasses: Vec<ClassId>,
}

impl TypeInfo {
    pub fn new(full_name: String, is_interface: bool) -> Self {
        TypeInfo {
            full_name,
            is_interface,
            superclass: None,
            interfaces: Vec::new(),
            type_vars: Vec::new(),
            base_types: Vec::new(),
            members: FxHashMap::default(),
            methods: FxHashMap::default(),
            subclasses: Vec::new(),
        }
    }
}

/// Owns every `TypeInfo` created while binding a build, and implements
/// `ClassHierarchy` so `veritype-types`'s pure algebra functions can walk
/// the class graph without depending on this crate.
#[derive(Debug, Default)]
pub struct TypeInfoTable {
    classes: Vec<TypeInfo>,
    object: ClassId,
}

impl TypeInfoTable {
    /// `object` must be the first class registered; every subsequent
    /// class implicitly has it as the ultimate ancestor.
    pub fn new(object: TypeInfo) -> (Self, ClassId) {
        let table = TypeInfoTable {
            classes: vec![object],
            object: ClassId(0),
        };
        (table, ClassId(0))
    }

    pub fn alloc(&mut self, info: TypeInfo) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(info);
        id
    }

    pub fn get(&self, class: ClassId) -> &TypeInfo {
        &self.classes[class.0 as usize]
    }

    pub fn get_mut(&mut self, class: ClassId) -> &mut TypeInfo {
        &mut self.classes[class.0 as usize]
    }

    /// Record `subclass` as a direct subclass of every class it names as a
    /// superclass or interface, maintaining the back-link invariant.
    pub fn link_subclass(&mut self, subclass: ClassId) {
        let info = self.get(subclass).clone();
        if let Some(sup) = info.superclass {
            self.get_mut(sup).subclasses.push(subclass);
        }
        for iface in &info.interfaces {
            self.get_mut(*iface).subclasses.push(subclass);
        }
    }
}

impl ClassHierarchy for TypeInfoTable {
    fn full_name(&self, class: ClassId) -> &str {
        &self.get(class).full_name
    }

    fn is_interface(&self, class: ClassId) -> bool {
        self.get(class).is_interface
    }

    fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.get(class).superclass
    }

    fn interfaces(&self, class: ClassId) -> &[ClassId] {
        &self.get(class).interfaces
    }

    fn type_var_count(&self, class: ClassId) -> usize {
        self.get(class).type_vars.len()
    }

    fn base_types(&self, class: ClassId) -> &[Type] {
        &self.get(class).base_types
    }

    fn has_base(&self, class: ClassId, full_name: &str) -> bool {
        if self.full_name(class) == full_name {
            return true;
        }
        let info = self.get(class);
        if let Some(sup) = info.superclass {
            if self.has_base(sup, full_name) {
                return true;
            }
        }
        info.interfaces.iter().any(|i| self.has_base(*i, full_name))
    }

    fn object_class(&self) -> ClassId {
        self.object
    }
}
