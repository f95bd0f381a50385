//! The closed type sum and its supporting structs.
//!
//! Large variants are boxed so `Type` itself stays small.

use serde::Serialize;
use veritype_ast::NodeId;
use veritype_common::ArgKind;

/// Identifier for a class, standing in for a full `TypeInfo` so this crate
/// does not need to depend on the binder crate that owns the class table.
/// The binder resolves a `ClassId` back to its `TypeInfo` through the
/// `ClassHierarchy` trait (see `algebra::ClassHierarchy`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

/// Whether a `TypeVar` names a class variable, a function variable, or one
/// of the two special wrapper markers used when expanding a generic
/// instance's own method signatures. Modeled as a 3-way enum rather than a
/// boolean; the instance-wrapper distinction (`BOUND_VAR` / `OBJECT_VAR` in
/// the original `mtypes.py`) would otherwise collapse into an untyped flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WrapperKind {
    /// An ordinary class or function type variable.
    None,
    /// Refers to the value of a type variable as stored in a generic
    /// instance wrapper (`BOUND_VAR` in the original).
    Bound,
    /// Refers to the type variable as the receiver object itself
    /// (`OBJECT_VAR` in the original).
    Object,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnboundType {
    pub name: String,
    pub args: Vec<Type>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VoidType {
    /// Name of the function this void return came from, for diagnostics.
    pub source: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Instance {
    pub class: ClassId,
    pub args: Vec<Type>,
    /// Set when this instance is the result of type-variable substitution;
    /// never set at construction time.
    pub erased: bool,
}

impl Instance {
    pub fn new(class: ClassId, args: Vec<Type>) -> Self {
        Instance {
            class,
            args,
            erased: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TypeVarOwner {
    /// Bound on a class; `id > 0`.
    Class,
    /// Bound on a function; `id < 0`.
    Function,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeVar {
    pub name: String,
    pub id: i32,
    pub wrapper_kind: WrapperKind,
}

impl TypeVar {
    pub fn owner(&self) -> TypeVarOwner {
        if self.id > 0 {
            TypeVarOwner::Class
        } else {
            TypeVarOwner::Function
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Callable {
    pub arg_types: Vec<Type>,
    pub arg_kinds: Vec<ArgKind>,
    pub arg_names: Vec<Option<String>>,
    pub min_args: usize,
    pub is_var_arg: bool,
    pub ret_type: Box<Type>,
    pub is_type_obj: bool,
    pub name: Option<String>,
    /// Ids of the type variables this callable introduces, empty for a
    /// non-generic function.
    pub variables: Vec<i32>,
    /// Implicit bound values accumulated as generic calls are resolved:
    /// additive, used only for display and runtime support, never
    /// consulted by the algebra itself.
    pub bound_vars: Vec<(i32, Type)>,
}

impl Callable {
    pub fn is_generic(&self) -> bool {
        !self.variables.is_empty()
    }

    pub fn max_fixed_args(&self) -> usize {
        if self.is_var_arg {
            self.arg_types.len().saturating_sub(1)
        } else {
            self.arg_types.len()
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Overloaded {
    /// Never empty; enforced at construction by `Overloaded::new`.
    pub items: Vec<Callable>,
}

impl Overloaded {
    pub fn new(items: Vec<Callable>) -> Self {
        assert!(!items.is_empty(), "Overloaded requires at least one item");
        Overloaded { items }
    }

    pub fn is_type_obj(&self) -> bool {
        self.items[0].is_type_obj
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TupleType {
    pub items: Vec<Type>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RuntimeTypeVar {
    pub expr: NodeId,
}

/// All possible type variants. `Any`, `Void`, `None` and `Error` carry no
/// data of their own beyond what `VoidType` holds.
#[derive(Clone, Debug, Serialize)]
pub enum Type {
    Unbound(Box<UnboundType>),
    Any,
    Void(VoidType),
    NoneType,
    Error,
    Erased,
    Instance(Box<Instance>),
    TypeVar(Box<TypeVar>),
    Callable(Box<Callable>),
    Overloaded(Box<Overloaded>),
    Tuple(Box<TupleType>),
    RuntimeTypeVar(RuntimeTypeVar),
}

impl Type {
    pub fn instance(class: ClassId, args: Vec<Type>) -> Type {
        Type::Instance(Box::new(Instance::new(class, args)))
    }

    pub fn callable(c: Callable) -> Type {
        Type::Callable(Box::new(c))
    }

    pub fn tuple(items: Vec<Type>) -> Type {
        Type::Tuple(Box::new(TupleType { items }))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }
}

/// Bundles the handful of builtin class instances the algebra falls back to
/// (`object`, the standard metaclass, `tuple`, the function base type),
/// threaded through `join_types`/`meet_types` as their last-resort bound.
#[derive(Clone, Debug)]
pub struct BasicTypes {
    pub object: ClassId,
    pub std_type: ClassId,
    pub tuple: ClassId,
    pub function: ClassId,
}

impl BasicTypes {
    pub fn object_instance(&self) -> Type {
        Type::instance(self.object, Vec::new())
    }
}
