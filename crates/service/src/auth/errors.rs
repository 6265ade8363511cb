use thiserror::Error;

/// Reasons a credential was rejected. Callers only ever see a generic
/// "could not validate credentials"; the variant is for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed authorization header")]
    MalformedHeader,
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("invalid trust configuration: {0}")]
    Config(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::MissingCredential => 1001,
            AuthError::MalformedHeader => 1002,
            AuthError::MissingClaim(_) => 1003,
            AuthError::TokenError(_) => 1102,
            AuthError::Config(_) => 1200,
        }
    }
}
