use std::fmt::Display;

use thiserror::Error;

/// Errors surfaced by this layer.
///
/// Every failure condition is a distinct variant so callers can decide
/// per-kind whether to fix input, fall back to defaults, or abort. Nothing
/// is retried or swallowed on their behalf.
#[derive(Error, Debug)]
pub enum Error {
    /// The number of training feature sequences does not match the number
    /// of label sequences.
    #[error("x and y must have the same length, got {x_len} feature sequences and {y_len} label sequences")]
    ArgumentMismatch { x_len: usize, y_len: usize },

    /// A token carries a value that violates the canonical feature map
    /// invariants (non-finite numeric weight).
    #[error("invalid token value: {0}")]
    TypeMismatch(String),

    /// The `algorithm` option is not one of the supported training
    /// algorithms.
    #[error("unsupported training algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The `linesearch` option is not one of the supported line search
    /// methods.
    #[error("unsupported linesearch method: {0}")]
    UnsupportedLinesearch(String),

    /// A serialized model artifact is corrupt or carries an unusable
    /// load-bearing field.
    #[error("malformed model artifact: {0}")]
    MalformedArtifact(String),

    /// A model artifact carries a metadata key the engine does not
    /// recognize.
    #[error("unknown artifact metadata key: {0}")]
    UnknownMetadataKey(String),

    /// A failure reported by the wrapped engine during train, export,
    /// compile or predict. Propagated unchanged, never retried.
    #[error("engine error: {0}")]
    Engine(String),
}

impl Error {
    /// Wrap an engine-reported failure.
    pub fn engine(err: impl Display) -> Self {
        Error::Engine(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
