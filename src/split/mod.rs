//! Splitting blit requests into engine nodes.
//!
//! [`analyze`](analyze::analyze) classifies a request and counts what it needs,
//! [`configure`](configure::configure) fills a node list with exactly that many nodes and
//! [`assign_buffers`](assign::assign_buffers) binds the temporary buffers the caller allocated.

/// Classification and counting.
pub mod analyze;
/// Temporary buffer binding.
pub mod assign;
/// Surface descriptors.
pub mod buffer;
/// Node emission.
pub mod configure;
/// Derived per-request state.
pub mod plan;
/// Tile iteration.
pub mod tile;
