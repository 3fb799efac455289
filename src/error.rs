/// Convenience result type used across offgen.
pub type OffgenResult<T> = Result<T, OffgenError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum OffgenError {
    /// Invalid user-provided input (canvas dimensions, chart values, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while producing a document or image artifact.
    #[error("generation error: {0}")]
    Generation(String),

    /// Errors from external media tools (ffmpeg, ffprobe, espeak).
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OffgenError {
    /// Build an [`OffgenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OffgenError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build an [`OffgenError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            OffgenError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            OffgenError::generation("x")
                .to_string()
                .contains("generation error:")
        );
        assert!(OffgenError::encode("x").to_string().contains("encode error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = OffgenError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
