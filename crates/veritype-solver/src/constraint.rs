//! The constraint vocabulary: `(var_id, op, target)` triples produced by
//! walking a generic template type against a concrete actual.

use veritype_types::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintOp {
    /// `var :> target` — target is a lower bound on the variable.
    SupertypeOf,
    /// `var :< target` — target is an upper bound on the variable.
    SubtypeOf,
}

impl ConstraintOp {
    pub fn negate(self) -> ConstraintOp {
        match self {
            ConstraintOp::SupertypeOf => ConstraintOp::SubtypeOf,
            ConstraintOp::SubtypeOf => ConstraintOp::SupertypeOf,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub var_id: i32,
    pub op: ConstraintOp,
    pub target: Type,
}

impl Constraint {
    pub fn new(var_id: i32, op: ConstraintOp, target: Type) -> Self {
        Constraint { var_id, op, target }
    }

    pub fn negated(&self) -> Constraint {
        Constraint {
            var_id: self.var_id,
            op: self.op.negate(),
            target: self.target.clone(),
        }
    }
}
