//! Pixel formats, color matrices and rescale filters.

/// Rescale filter coefficient tables.
pub mod filters;
/// Color-space conversion matrices.
pub mod ivmx;
/// Pixel format classification.
pub mod pixel;
