/// Convenience result type used across the node splitter.
pub type B2r2Result<T> = Result<T, B2r2Error>;

/// Error taxonomy of the node-split compiler.
///
/// `InvalidArgument`, `Unsupported` and `ResourceExhausted` are caller-facing: they are detected
/// from the request alone and no plan is produced. `InternalConsistency` means analyze and
/// configure/assign disagree, which is a defect in the compiler and never caused by input.
#[derive(thiserror::Error, Debug)]
pub enum B2r2Error {
    /// Malformed request (degenerate or out-of-bounds rect, bad scale factor, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Valid request this compiler cannot express as nodes.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A temporary buffer cannot fit even one line in the allowed budget.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Node list or buffer indices disagree with the plan.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl B2r2Error {
    /// Build a [`B2r2Error::InvalidArgument`] value.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`B2r2Error::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`B2r2Error::ResourceExhausted`] value.
    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`B2r2Error::InternalConsistency`] value.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalConsistency(msg.into())
    }

    /// `true` for errors a caller may answer by falling back to another blit path.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
