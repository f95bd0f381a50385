//! Constraint generation and solving for generic call inference.

pub mod constraint;
pub mod infer;
pub mod solve;

pub use constraint::{Constraint, ConstraintOp};
pub use infer::{infer_constraints, infer_constraints_for_callable};
pub use solve::solve_constraints;
