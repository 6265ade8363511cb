use std::str::FromStr;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument};

use super::domain::{Identity, TokenClaims};
use super::errors::AuthError;

/// Verifies bearer tokens against a shared secret.
///
/// Resolution is a pure function of the credential and this trust configuration.
#[derive(Clone)]
pub struct IdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityResolver {
    /// Build a resolver accepting tokens signed with `secret` under any of `algorithms`.
    /// `exp` and `sub` are required; `exp` is checked with `leeway_secs` of tolerance.
    pub fn new(secret: &[u8], algorithms: &[Algorithm], leeway_secs: u64) -> Result<Self, AuthError> {
        let Some(first) = algorithms.first() else {
            return Err(AuthError::Config("no algorithms configured".into()));
        };
        if secret.is_empty() {
            return Err(AuthError::Config("empty secret".into()));
        }
        if let Some(bad) = algorithms.iter().find(|a| !matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) {
            return Err(AuthError::Config(format!("{bad:?} cannot be verified with a shared secret")));
        }

        let mut validation = Validation::new(*first);
        validation.algorithms = algorithms.to_vec();
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        // audience is not part of this trust model; an `aud` claim is just an extra claim
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self { key: DecodingKey::from_secret(secret), validation })
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Result<Self, AuthError> {
        let algorithms = cfg
            .algorithms
            .iter()
            .map(|name| Algorithm::from_str(name.trim()).map_err(|e| AuthError::Config(format!("{name}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(cfg.jwt_secret.as_bytes(), &algorithms, cfg.leeway_secs)
    }

    /// Resolve a raw token.
    #[instrument(skip_all)]
    pub fn resolve(&self, credential: &str) -> Result<Identity, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        let data = decode::<TokenClaims>(credential, &self.key, &self.validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::MissingClaim("sub"));
        }
        let identity = Identity::from(data.claims);
        debug!(subject = %identity.subject_id, privileged = identity.is_privileged, "identity_resolved");
        Ok(identity)
    }

    /// Resolve the value of an `Authorization` header, which may be absent.
    pub fn resolve_header(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;
        let token = bearer_token(header).ok_or(AuthError::MalformedHeader)?;
        self.resolve(token)
    }
}

/// Extract the token from `Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
