//! Error message formatting and the shared diagnostic accumulator.

pub mod errors;
pub mod message;

pub use errors::{ErrorInfo, Errors};
pub use message::{format, format_simple};
