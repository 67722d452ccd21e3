//! Error types for tinydet.

use thiserror::Error;

/// Result alias for tinydet operations.
pub type Result<T> = std::result::Result<T, TinyDetError>;

/// Errors that can occur when decoding or suppressing detections.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TinyDetError {
    /// The detection tensor does not have the length implied by the model configuration.
    #[error("invalid tensor shape: expected {expected} values, got {got}")]
    InvalidTensorShape { expected: usize, got: usize },
    /// The model configuration is inconsistent; no decoder can be built from it.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
    /// The external inference engine failed to produce a tensor.
    #[error("inference failed: {reason}")]
    Inference { reason: String },
    /// A [`FrameCycle`](crate::FrameCycle) was asked to run a second frame.
    #[error("frame cycle already ran; begin a new cycle for the next frame")]
    CycleSpent,
}

/// Specific reason a [`ModelConfig`](crate::ModelConfig) was rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigIssue {
    /// The anchor table length differs from `num_anchors`.
    #[error("anchor table has {got} entries, expected {expected}")]
    AnchorCount { expected: usize, got: usize },
    /// The label table length differs from `num_classes`.
    #[error("label table has {got} entries, expected {expected}")]
    LabelCount { expected: usize, got: usize },
    /// A dimension that must be positive is zero.
    #[error("{name} must be greater than zero")]
    ZeroDimension { name: &'static str },
    /// An anchor has a non-finite or non-positive extent.
    #[error("anchor {index} must have finite, positive width and height")]
    InvalidAnchor { index: usize },
    /// The implied tensor length does not fit in `usize`.
    #[error("tensor dimensions overflow")]
    TensorTooLarge,
}

impl From<ConfigIssue> for TinyDetError {
    fn from(issue: ConfigIssue) -> Self {
        TinyDetError::InvalidConfiguration(issue)
    }
}
