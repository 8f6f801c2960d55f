/// Convenience result type used across frameink.
pub type FrameinkResult<T> = Result<T, FrameinkError>;

/// Top-level error taxonomy used by editor APIs.
#[derive(thiserror::Error, Debug)]
pub enum FrameinkError {
    /// A structural edit was rejected before any state changed.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A persisted project had an unknown version or missing required fields.
    #[error("malformed project file: {0}")]
    MalformedProjectFile(String),

    /// Rasterizing or encoding frames failed.
    #[error("export failure: {0}")]
    Export(String),

    /// A playhead or layer index referenced something that does not exist.
    #[error("render inconsistency: {0}")]
    RenderInconsistency(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameinkError {
    /// Build a [`FrameinkError::InvalidOperation`] value.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Build a [`FrameinkError::MalformedProjectFile`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedProjectFile(msg.into())
    }

    /// Build a [`FrameinkError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`FrameinkError::RenderInconsistency`] value.
    pub fn inconsistency(msg: impl Into<String>) -> Self {
        Self::RenderInconsistency(msg.into())
    }

    /// Build a [`FrameinkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for rejections that leave state untouched and only need user feedback.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }
}

impl From<serde_json::Error> for FrameinkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
