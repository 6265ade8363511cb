use serde::{Deserialize, Serialize};

/// Authenticated subject of a request.
///
/// Built once per request from verified token claims and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    /// Privileged identities bypass ownership checks.
    pub is_privileged: bool,
}

impl Identity {
    pub fn user(subject_id: impl Into<String>) -> Self {
        Self { subject_id: subject_id.into(), is_privileged: false }
    }

    pub fn privileged(subject_id: impl Into<String>) -> Self {
        Self { subject_id: subject_id.into(), is_privileged: true }
    }
}

/// Claims read from a verified token. Unknown claims are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub is_superuser: bool,
    pub exp: u64,
}

impl From<TokenClaims> for Identity {
    fn from(c: TokenClaims) -> Self {
        Self { subject_id: c.sub, is_privileged: c.is_superuser }
    }
}
