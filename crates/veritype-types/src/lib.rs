//! Type representation and type algebra for the veritype checker.
//!
//! `Type` is the closed sum every checked expression resolves to.
//! `Instance` holds a lightweight `ClassId` rather than a full class
//! record so this crate does not depend on `veritype-binder`, which owns
//! the class table and itself depends on `Type`/`Instance` here; the
//! algebra instead takes a `&dyn ClassHierarchy` supplied by the caller.

pub mod algebra;
pub mod hierarchy;
pub mod type_def;

pub use hierarchy::ClassHierarchy;
pub use type_def::{
    BasicTypes, Callable, ClassId, Instance, Overloaded, RuntimeTypeVar, Type, TupleType, TypeVar,
    TypeVarOwner, UnboundType, VoidType, WrapperKind,
};
