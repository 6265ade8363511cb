use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use service::auth::{errors::AuthError, IdentityResolver};
use service::items::service::CrudPolicy;
use service::items::ItemStore;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn ItemStore>,
    pub identity: Arc<IdentityResolver>,
    pub policy: CrudPolicy,
}

/// Resolve `Authorization: Bearer <token>` into an [`Identity`](service::auth::Identity)
/// request extension. Any failure is a uniform 401; the reason is only logged.
pub async fn require_identity(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();
    let resolved = match req.headers().get(AUTHORIZATION) {
        None => state.identity.resolve_header(None),
        Some(v) => match v.to_str() {
            Ok(h) => state.identity.resolve_header(Some(h)),
            Err(_) => Err(AuthError::MalformedHeader),
        },
    };

    match resolved {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, code = e.code(), reason = %e, "credential rejected");
            Err(JsonApiError::unauthenticated())
        }
    }
}
