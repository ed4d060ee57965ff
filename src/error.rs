use thiserror::Error;

/// Errors returned by this crate.
///
/// Shape violations on the clustering input are reported eagerly and never
/// collapse into an empty or all-noise result.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch at row {index}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Row whose length differs from the first row.
        index: usize,
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A vector component is NaN or infinite.
    #[error("non-finite value at row {index}, component {component}")]
    NonFiniteValue {
        /// Row index.
        index: usize,
        /// Component index within the row.
        component: usize,
    },

    /// The embedding provider returned a matrix that is not aligned with its input.
    #[error("embedding provider returned {found} vectors for {expected} messages")]
    EmbeddingCountMismatch {
        /// Number of messages sent to the provider.
        expected: usize,
        /// Number of vectors returned.
        found: usize,
    },

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A collaborator (embedding, explanation, delivery) failed.
    #[error("{0}")]
    Other(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
