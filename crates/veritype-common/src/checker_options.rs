//! Compiler options for type checking.
//!
//! This module lives in `veritype-common` so that the binder, solver and
//! checker crates can all reference `CheckerOptions` without creating a
//! circular dependency.

/// Behavior flags that control how strict the checker is. Defaults match an
/// "optional typing" posture: untyped code is accepted, and most stricter
/// checks are opt-in.
#[derive(Debug, Clone)]
pub struct CheckerOptions {
    /// Master switch; when set, implies the individual strict_* flags below
    /// unless they were explicitly overridden afterwards.
    pub strict_optional: bool,
    /// Require every `def` to carry full parameter and return annotations.
    pub disallow_untyped_defs: bool,
    /// Type-check the bodies of functions that have no annotations at all
    /// (normally skipped entirely).
    pub check_untyped_defs: bool,
    /// Treat an omitted parameter/return annotation as an error rather than
    /// silently inferring `Any`.
    pub disallow_untyped_globals: bool,
    /// Warn when a generic function call leaves a type variable unsolved and
    /// it was defaulted to `Any`.
    pub warn_unresolved_generics: bool,
    /// Extra directories to search for modules, highest priority first.
    pub module_search_path: Vec<String>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            strict_optional: false,
            disallow_untyped_defs: false,
            check_untyped_defs: false,
            disallow_untyped_globals: false,
            warn_unresolved_generics: true,
            module_search_path: Vec::new(),
        }
    }
}

impl CheckerOptions {
    /// Apply `--strict`-style defaults: turn on every individual flag that
    /// strictness implies, without clobbering flags the caller has already
    /// turned on.
    pub fn apply_strict_defaults(mut self) -> Self {
        if self.strict_optional {
            self.disallow_untyped_defs = true;
            self.check_untyped_defs = true;
            self.disallow_untyped_globals = true;
            self.warn_unresolved_generics = true;
        }
        self
    }
}
