//! The type algebra: substitution, erasure, supertype mapping, same-type,
//! subtyping, join and meet.

pub mod erase;
pub mod expand;
pub mod join;
pub mod meet;
pub mod same_type;
pub mod subtypes;
pub mod supertype;

pub use erase::erase;
pub use expand::{expand, type_var_map};
pub use join::join_types;
pub use meet::meet_types;
pub use same_type::is_same_type;
pub use subtypes::{is_equivalent, is_subtype};
pub use supertype::map_instance_to_supertype;
