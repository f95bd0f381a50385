//! Argument kinds, shared by the AST (parameter lists, call-site argument
//! lists), the type representation (`Callable.arg_kinds`) and the checker's
//! argument mapping. Kept in `veritype-common` so none of those crates has
//! to depend on another just to name these five variants.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ArgKind {
    /// A plain required positional parameter, or a positional actual.
    PositionalRequired,
    /// A positional parameter with a default value (`x=1`); never used on
    /// the caller side.
    PositionalOptional,
    /// `*args` on the callee side, or `*expr` on the caller side.
    Star,
    /// A keyword parameter/argument (`name=`), including keyword-only
    /// parameters.
    Named,
    /// `**kwargs` on the callee side, or `**expr` on the caller side.
    StarStar,
}

impl ArgKind {
    pub fn is_positional(self) -> bool {
        matches!(
            self,
            ArgKind::PositionalRequired | ArgKind::PositionalOptional
        )
    }
}
