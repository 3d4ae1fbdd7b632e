use thiserror::Error;

/// Errors produced by the token codec.
///
/// `Malformed` means the token text could not even be read as a token;
/// `Invalid` means it was read but one of the semantic checks failed.
/// The boolean `verify` surface collapses both kinds into a single fail
/// result; the distinction exists for internal diagnostics and tests.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token text is structurally unreadable (bad delimiters, missing
    /// or empty required field, non-integer timestamp).
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// The embedded location does not match the verification location.
    #[error("Location mismatch: {0}")]
    LocationMismatch(String),

    /// The embedded signature does not match the recomputed one.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// The token is past its validity window.
    #[error("Token expired: {0}")]
    Expired(String),

    /// Any other failure.
    #[error("{0}")]
    Generic(String),
}

impl TokenError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        TokenError::Malformed(msg.into())
    }

    pub fn location_mismatch(msg: impl Into<String>) -> Self {
        TokenError::LocationMismatch(msg.into())
    }

    pub fn expired(msg: impl Into<String>) -> Self {
        TokenError::Expired(msg.into())
    }

    pub fn generic(msg: impl Into<String>) -> Self {
        TokenError::Generic(msg.into())
    }
}
