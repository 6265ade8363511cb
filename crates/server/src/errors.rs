use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::{FieldError, ServiceError};
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": ..., "detail"?: ..., "fields"?: [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: Option<String>,
    pub fields: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    fields: &'a [FieldError],
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: Option<String>) -> Self {
        Self { status, error, detail, fields: Vec::new() }
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Could not validate credentials", None)
    }

    /// 422 for input that never made it into a typed request.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from(ServiceError::invalid(field, message))
    }
}

/// Strip axum's "Failed to deserialize ...: " prefix.
fn rejection_detail(body_text: &str) -> &str {
    body_text.split_once(": ").map_or(body_text, |(_, detail)| detail)
}

/// Field named by a deserializer message: "missing field `x`" or a leading `x: ` path.
fn rejected_field(detail: &str) -> Option<String> {
    if let Some(rest) = detail.split("missing field `").nth(1) {
        return rest.split('`').next().map(str::to_string);
    }
    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        match &e {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                let text = e.body_text();
                let detail = rejection_detail(&text);
                Self::invalid_input(rejected_field(detail).unwrap_or_else(|| "body".to_string()), detail)
            }
            _ => Self::new(e.status(), "Invalid Request", Some(e.body_text())),
        }
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self {
        let text = e.body_text();
        let detail = rejection_detail(&text);
        Self::invalid_input(rejected_field(detail).unwrap_or_else(|| "query".to_string()), detail)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, detail: self.detail.as_deref(), fields: &self.fields };
        let mut resp = (self.status, Json(body)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

/// Security-sensitive kinds carry fixed messages only; store failures are logged and
/// reported without their cause.
impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Unauthenticated => Self::unauthenticated(),
            ServiceError::Forbidden => Self::new(StatusCode::FORBIDDEN, "Not enough permissions", None),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Item not found", None),
            ServiceError::Validation(fields) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: "Validation Error",
                detail: None,
                fields,
            },
            ServiceError::Db(msg) => {
                error!(err = %msg, "store operation failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
