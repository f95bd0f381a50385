//! Abstraction over the class table, implemented by the binder's
//! `TypeInfo` store so this crate's algebra can walk superclass and
//! interface chains without depending on `veritype-binder` (which itself
//! depends on this crate for `Instance`/`Type`).

use crate::type_def::{ClassId, Type};

pub trait ClassHierarchy {
    fn full_name(&self, class: ClassId) -> &str;

    fn is_interface(&self, class: ClassId) -> bool;

    /// `None` for a class with no explicit superclass (only `object` itself).
    fn superclass(&self, class: ClassId) -> Option<ClassId>;

    fn interfaces(&self, class: ClassId) -> &[ClassId];

    fn type_var_count(&self, class: ClassId) -> usize;

    /// Ordered base-type expressions as declared in source; first is the
    /// superclass (if any), the rest are interfaces. Each is an `Instance`
    /// with type arguments expressed in terms of `class`'s own type
    /// variables, ready for substitution.
    fn base_types(&self, class: ClassId) -> &[Type];

    /// Whether `class`'s transitive superclass+interface closure includes
    /// a class with the given fully-qualified name.
    fn has_base(&self, class: ClassId, full_name: &str) -> bool;

    fn object_class(&self) -> ClassId;
}
