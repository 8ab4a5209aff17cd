//! Geometry, fixed-point math and errors shared by every stage.

/// Rects and scan orders.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Fixed-point scale factors.
pub mod math;
