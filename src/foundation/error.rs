/// Convenience result type used across certibatch.
pub type CertResult<T> = Result<T, CertError>;

/// Top-level error taxonomy used by the batch pipeline.
///
/// Only pre-flight, cancellation and finalization errors abort a run. Per-row problems (missing
/// names, a row that fails to render) are absorbed by the batch loop and show up in
/// [`RunStats`](crate::RunStats) instead.
#[derive(thiserror::Error, Debug)]
pub enum CertError {
    /// Template or preview has zero/degenerate dimensions.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A required input (template, data, column, font) is absent.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Malformed user-provided values (colors, font sizes, job files).
    #[error("validation error: {0}")]
    Validation(String),

    /// Compositing or encoding a single certificate failed.
    #[error("render error: {0}")]
    Render(String),

    /// Writing or finalizing the output archive failed.
    #[error("archive finalization failed: {0}")]
    ArchiveFinalization(String),

    /// The run was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("run cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CertError {
    /// Build a [`CertError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`CertError::MissingInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Build a [`CertError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CertError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CertError::ArchiveFinalization`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::ArchiveFinalization(msg.into())
    }

    /// Return `true` for errors that end a run before or after row processing.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Render(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
