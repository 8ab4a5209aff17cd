//! Turning requests into dispatchable jobs.

/// Node and temporary-buffer allocators.
pub mod alloc;
/// Request to job compilation.
pub mod pipeline;
/// Parallel count-agreement sweep.
pub mod sweep;
