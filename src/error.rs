use thiserror::Error;

/// Errors surfaced by the classification and cut search stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CutError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no pixel was classified as pizza")]
    EmptyClassification,

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("failed to save image: {0}")]
    ImageSave(String),

    #[error("worker task failed: {0}")]
    Worker(String),
}
