//! `veritype` command-line entry point.
//!
//! Lexing and parsing live outside this workspace's scope (see the
//! `veritype_build::Parser` trait); until a real front end is wired in,
//! every file reports a single diagnostic saying so rather than silently
//! producing an empty tree.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as ClapParser;
use veritype_build::{BuildManager, BuildOutcome, CliArgs, ModulePath, ParseDiagnostic, ParsedModule, Parser, program_dir};
use veritype_common::Line;

struct UnimplementedParser;

impl Parser for UnimplementedParser {
    fn parse(&mut self, _source: &str, _path: &str) -> Result<ParsedModule, Vec<ParseDiagnostic>> {
        Err(vec![ParseDiagnostic {
            line: Line::UNKNOWN,
            message: "no lexer/parser front end is wired into this build".to_string(),
        }])
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(BuildOutcome::Success) => ExitCode::SUCCESS,
        Ok(BuildOutcome::Failure(messages)) => {
            for message in messages {
                println!("{message}");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("veritype: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> anyhow::Result<BuildOutcome> {
    let program_text = std::fs::read_to_string(&args.program).with_context(|| format!("cannot read {}", args.program))?;

    let dir = program_dir(&args.program);
    let stub_dir = args.stub_dir.as_ref().map(std::path::Path::new);
    let module_path = ModulePath::default_for(&dir, &args.search_path, stub_dir);
    let mut manager = BuildManager::new(module_path, !args.no_check, args.checker_options(), UnimplementedParser);

    Ok(manager.build(&args.program, program_text))
}
