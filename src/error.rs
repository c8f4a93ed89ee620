use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The gate rejected the drive. Callers swallow this one.
    #[error("drive {device} is not valid for the current image")]
    InvalidToggleAttempt { device: String },

    #[error("drive enumeration unavailable: {0}")]
    EnumerationUnavailable(String),

    #[error("no compatibility verdict for drive {device}")]
    EvaluatorUnavailable { device: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
