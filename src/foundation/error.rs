/// Crate-wide result alias.
pub type TokenResult<T> = Result<T, TokenError>;

/// Error type returned by every fallible operation in the crate.
///
/// Asset-load and mask failures are normally tolerated by the compositor and never surface as
/// a `TokenError`; encode failures and caller misuse always do.
#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    /// Caller misuse: invalid sizes, malformed documents, mismatched buffers.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source bytes could not be read or decoded into a bitmap.
    #[error("decode error: {0}")]
    Decode(String),

    /// A raster operation could not be carried out.
    #[error("render error: {0}")]
    Render(String),

    /// A surface could not be serialized to the requested output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TokenError {
    /// Build a [`TokenError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TokenError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TokenError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TokenError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TokenError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
