//! Drives a build: parsing, import discovery, semantic analysis and type
//! checking across a program file and everything it transitively imports.
//!
//! Grounded on the original driver's module-level `build()` function: a
//! thin convenience wrapper is exposed here for callers that just want to
//! point at a program file and get an outcome back, while `BuildManager`
//! itself stays available for callers (the CLI, tests) that need to
//! configure the module path or options first.

mod args;
mod builtins;
mod manager;
mod module_path;
mod parser;
mod phase;
mod semantic;
mod unit;

pub use args::CliArgs;
pub use manager::{program_dir, BuildManager, BuildOutcome};
pub use module_path::{ModulePath, SOURCE_EXT};
pub use parser::{ParseDiagnostic, ParsedModule, Parser};
pub use phase::Phase;
pub use semantic::{analyze_file, AnalysisOutcome};

use veritype_common::CheckerOptions;

/// Build a single program file with the default module path (program
/// directory plus `MYPYPATH`, no extra search path or bundled stubs) and
/// type checking enabled. Mirrors calling the original's `build()` with
/// no `alt_lib_path` and default flags.
pub fn build<P: Parser>(program_path: &str, program_text: String, parser: P) -> BuildOutcome {
    let dir = program_dir(program_path);
    let module_path = ModulePath::default_for(&dir, &[], None);
    let mut manager = BuildManager::new(module_path, true, CheckerOptions::default(), parser);
    manager.build(program_path, program_text)
}
