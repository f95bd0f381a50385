//! Command-line arguments for the `veritype` binary.
//!
//! Flag naming follows the checker's own option names 1:1 so `--help`
//! output reads like a map of `CheckerOptions`, the way the original
//! driver's command line mirrors its own `Options` class.

use clap::Parser as ClapParser;

use veritype_common::CheckerOptions;

#[derive(Debug, ClapParser)]
#[command(name = "veritype", about = "Static type checker", version)]
pub struct CliArgs {
    /// Program file to check.
    pub program: String,

    // ==== Module resolution ====
    /// Extra directory to search for imported modules, highest priority
    /// first. May be repeated.
    #[arg(short = 'p', long = "search-path")]
    pub search_path: Vec<String>,

    /// Directory of bundled module stubs, searched after `MYPYPATH`.
    #[arg(long = "stub-dir")]
    pub stub_dir: Option<String>,

    // ==== Strictness ====
    /// Treat `None` as incompatible with every type it isn't explicitly
    /// unioned with.
    #[arg(long = "strict-optional")]
    pub strict_optional: bool,

    /// Report functions with no type annotations at all.
    #[arg(long = "disallow-untyped-defs")]
    pub disallow_untyped_defs: bool,

    /// Still check the bodies of untyped functions.
    #[arg(long = "check-untyped-defs")]
    pub check_untyped_defs: bool,

    /// Report module-level variables with no annotation and no inferrable
    /// initializer.
    #[arg(long = "disallow-untyped-globals")]
    pub disallow_untyped_globals: bool,

    /// Warn when a generic class or function is used without enough type
    /// arguments to pin down its type variables.
    #[arg(long = "warn-unresolved-generics")]
    pub warn_unresolved_generics: bool,

    /// Enable every strictness flag above at once.
    #[arg(long = "strict")]
    pub strict: bool,

    // ==== Pipeline control ====
    /// Run parsing and semantic analysis only, skip the type checker.
    #[arg(long = "no-check")]
    pub no_check: bool,
}

impl CliArgs {
    pub fn checker_options(&self) -> CheckerOptions {
        CheckerOptions {
            strict_optional: self.strict_optional || self.strict,
            disallow_untyped_defs: self.disallow_untyped_defs || self.strict,
            check_untyped_defs: self.check_untyped_defs || self.strict,
            disallow_untyped_globals: self.disallow_untyped_globals || self.strict,
            warn_unresolved_generics: self.warn_unresolved_generics || self.strict,
            module_search_path: self.search_path.clone(),
        }
    }
}
