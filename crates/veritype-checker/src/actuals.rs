//! Maps call-site actual arguments onto a callable's formal parameters.

use veritype_common::ArgKind;
use veritype_types::{Callable, Type};

/// One actual argument at a call site, paired with the naive
/// (context-free) type it was given in the speculative first pass -
/// needed here only to size star-expansion.
#[derive(Clone, Debug)]
pub struct ActualArg {
    pub kind: ArgKind,
    pub name: Option<String>,
    pub ty: Type,
}

/// `result[i]` lists the indices into `actuals` bound to formal `i`.
/// Positional actuals fill positional/named formals left to right;
/// overflow lands on the callee's `*` slot if present. A `*` actual
/// distributes a tuple's items across formals by length, or (for a
/// list-like actual) fills every remaining formal with its element type.
/// Named actuals bind by name, falling back to the `**` slot; a `**`
/// actual fans out to every still-unbound named formal plus the `**` slot.
pub fn actuals_to_formals(callee: &Callable, actuals: &[ActualArg]) -> Vec<Vec<usize>> {
    let n = callee.arg_types.len();
    let mut result: Vec<Vec<usize>> = vec![Vec::new(); n];
    let fixed = callee.max_fixed_args();
    let star_slot = if callee.is_var_arg { Some(fixed) } else { None };
    let star_star_slot = callee.arg_kinds.iter().position(|k| matches!(k, ArgKind::StarStar));

    let mut next_positional = 0usize;

    for (i, actual) in actuals.iter().enumerate() {
        match actual.kind {
            ArgKind::Star => {
                match &actual.ty {
                    Type::Tuple(t) => {
                        for _ in &t.items {
                            if next_positional >= fixed {
                                break;
                            }
                            result[next_positional].push(i);
                            next_positional += 1;
                        }
                    }
                    Type::Instance(_) => {
                        while next_positional < fixed {
                            result[next_positional].push(i);
                            next_positional += 1;
                        }
                    }
                    _ => {}
                }
                if let Some(slot) = star_slot {
                    result[slot].push(i);
                }
            }

            ArgKind::StarStar => {
                for (formal_idx, kind) in callee.arg_kinds.iter().enumerate() {
                    if matches!(kind, ArgKind::Named) && result[formal_idx].is_empty() {
                        result[formal_idx].push(i);
                    }
                }
                if let Some(slot) = star_star_slot {
                    result[slot].push(i);
                }
            }

            ArgKind::Named => {
                if let Some(name) = &actual.name {
                    if let Some(formal_idx) = callee
                        .arg_names
                        .iter()
                        .position(|n| n.as_deref() == Some(name.as_str()))
                    {
                        result[formal_idx].push(i);
                    } else if let Some(slot) = star_star_slot {
                        result[slot].push(i);
                    }
                }
            }

            ArgKind::PositionalRequired | ArgKind::PositionalOptional => {
                if next_positional < fixed {
                    result[next_positional].push(i);
                    next_positional += 1;
                } else if let Some(slot) = star_slot {
                    result[slot].push(i);
                }
            }
        }
    }

    result
}
