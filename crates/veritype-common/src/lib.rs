//! Common types and utilities for the veritype static type checker.
//!
//! This crate provides foundational types used across all veritype crates:
//! - Source positions (`Line`, `Span`)
//! - Diagnostic vocabulary (`DiagnosticKind`, `DiagnosticCategory`)
//! - Compiler options (`CheckerOptions`)
//! - Compiler limits and thresholds

pub mod checker_options;
pub use checker_options::CheckerOptions;

pub mod diagnostics;
pub use diagnostics::{DiagnosticCategory, DiagnosticKind};

pub mod limits;

pub mod position;
pub use position::{Line, Span};

pub mod arg_kind;
pub use arg_kind::ArgKind;

/// A module identifier, assigned by the build manager in discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);
