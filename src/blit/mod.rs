//! Blit request model.

/// Request, image and flag types.
pub mod request;
