/// Result alias used throughout the crate.
pub type LoopFxResult<T> = Result<T, LoopFxError>;

/// Error type for every fallible operation in `loopfx`.
///
/// Out-of-range configuration is never an error: it is clamped when an [`crate::EffectConfig`]
/// is built. Only conditions that make the current frame impossible to compute surface here.
#[derive(thiserror::Error, Debug)]
pub enum LoopFxError {
    /// Structurally invalid input (unknown effect id, malformed preset, bad buffer length).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while computing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Raster container decode/encode failure.
    #[error("codec error: {0}")]
    Codec(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopFxError {
    /// Build a [`LoopFxError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoopFxError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`LoopFxError::Codec`].
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`LoopFxError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LoopFxError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
