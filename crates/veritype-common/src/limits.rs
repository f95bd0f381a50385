//! Centralized limits and thresholds.
//!
//! Kept small and explicit per-constant instead of inlining magic numbers
//! at the call site.

/// Guard against runaway recursion when walking a class hierarchy or
/// expanding a deeply nested type. The class-hierarchy graph is required
/// to be acyclic, so this is a defense against a malformed `TypeInfo`
/// table rather than an expected code path.
pub const MAX_SUPERTYPE_CHAIN_DEPTH: usize = 512;

/// Guard against runaway recursion in structural type algebra (`expand`,
/// `is_same_type`, `join`, `meet`) walking instance type arguments.
pub const MAX_TYPE_RECURSION_DEPTH: usize = 256;

/// Cap on the number of scopes a single name lookup will walk outward
/// through before giving up and reporting "undefined name".
pub const MAX_SCOPE_WALK_DEPTH: usize = 4096;
