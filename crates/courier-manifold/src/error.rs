//! Manifold construction errors.

/// Errors raised when a [`SphereManifold`](crate::SphereManifold) is built
/// from invalid world parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ManifoldError {
    /// The radius was zero, negative, NaN, or infinite.
    #[error("planet radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    /// The center had a non-finite component.
    #[error("planet center must be finite, got ({0}, {1}, {2})")]
    InvalidCenter(f64, f64, f64),
}
