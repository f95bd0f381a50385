//! Override compatibility: a subclass method must accept at least what the
//! superclass method accepts (contravariant arguments) and return no more
//! than what callers of the superclass method expect (covariant return).

use veritype_types::algebra::{is_same_type, is_subtype};
use veritype_types::{Callable, ClassHierarchy, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverrideError {
    ArgumentNotContravariant { formal: usize },
    ReturnNotCovariant,
    ArityMismatch,
}

/// `sub` overrides `sup`. Identical under erasure always passes (the
/// overload erased-signature path checks this first); otherwise the
/// argument/return variance rules apply directly to the unerased types.
pub fn check_override(
    hierarchy: &dyn ClassHierarchy,
    sub: &Callable,
    sup: &Callable,
) -> Result<(), OverrideError> {
    if is_same_type(&Type::Callable(Box::new(sub.clone())), &Type::Callable(Box::new(sup.clone()))) {
        return Ok(());
    }

    if sub.arg_types.len() < sup.arg_types.len() || sub.min_args > sup.min_args {
        return Err(OverrideError::ArityMismatch);
    }
    if sup.is_var_arg && !sub.is_var_arg {
        return Err(OverrideError::ArityMismatch);
    }

    for (i, (sub_arg, sup_arg)) in sub.arg_types.iter().zip(&sup.arg_types).enumerate() {
        if !is_subtype(hierarchy, sup_arg, sub_arg) {
            return Err(OverrideError::ArgumentNotContravariant { formal: i });
        }
    }

    if !is_subtype(hierarchy, &sub.ret_type, &sup.ret_type) {
        return Err(OverrideError::ReturnNotCovariant);
    }

    Ok(())
}
