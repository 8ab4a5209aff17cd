//! Engine nodes and their storage.

/// Node storage.
pub mod list;
/// Node descriptor fields.
pub mod types;
