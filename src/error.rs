use thiserror::Error;

pub type Result<T> = std::result::Result<T, KMeansError>;

/// An error when setting up or running a k-means calculation or one of its diagnostics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// The feature matrix has no rows, or its rows have no dimensions
    #[error("feature matrix must contain at least one sample with at least one dimension")]
    EmptySamples,
    /// A buffer does not have the length implied by the sample dimensions
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("cluster count must be greater than 0 (got {0})")]
    InvalidClusterCount(usize),
    #[error("got {labels} labels for {samples} samples")]
    LabelCountMismatch { labels: usize, samples: usize },
    #[error("neighbour count must be greater than 0")]
    InvalidNeighbourCount,
    /// Input value at the given (flat) index is NaN or infinite
    #[error("input value at index {index} is not finite")]
    NonFiniteInput { index: usize },
    /// A NaN turned up while computing the named quantity
    #[error("invalid computation: {0} produced NaN")]
    InvalidComputation(&'static str),
}
