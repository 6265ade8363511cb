use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::auth::errors::AuthError;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("could not validate credentials")]
    Unauthenticated,
    #[error("not enough permissions")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation error: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation { field, message } => Self::invalid(field, message),
            models::errors::ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

/// Every credential failure collapses to `Unauthenticated`; the reason stays in logs.
impl From<AuthError> for ServiceError {
    fn from(_: AuthError) -> Self { Self::Unauthenticated }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
