//! Error types for the server application.
//!
//! Domain errors (authentication, configuration, Dropbox) live in submodules and are
//! aggregated by [`Error`]. Every error implements `IntoResponse` so handlers can return
//! `Result<_, Error>` directly.

pub mod auth;
pub mod config;
pub mod dropbox;

use std::convert::Infallible;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::{ErrorDto, UnknownVariant},
    server::error::{auth::AuthError, config::ConfigError, dropbox::DropboxError},
};

/// Main error type for the server application.
///
/// Uses `#[from]` so the `?` operator converts library and domain errors automatically.
/// The `IntoResponse` implementation picks the HTTP status for each variant.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization error.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Dropbox upload, sharing or token refresh failure.
    #[error(transparent)]
    DropboxError(#[from] DropboxError),
    /// Requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: i32 },
    /// Request is well formed but not acceptable, e.g. assigning a client as technician.
    #[error("{0}")]
    BadRequest(String),
    /// Request conflicts with existing data, e.g. a taken username.
    #[error("{0}")]
    Conflict(String),
    /// Request body failed field validation.
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    /// A stored enumeration value could not be parsed.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
    /// Internal error indicating a bug in installdesk's code.
    #[error("Internal error, this indicates a bug: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Socket error while binding the listener.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id,
        }
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps errors to HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Validation failures and rejected requests
/// - 401/403/404 - Authentication errors, see [`AuthError`]
/// - 404 Not Found - Missing records
/// - 409 Conflict - Duplicate data
/// - 500 Internal Server Error - Everything else (logged)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::DropboxError(err) => err.into_response(),
            Self::NotFound { .. } => {
                tracing::debug!("{}", self);

                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            Self::BadRequest(message) => {
                tracing::debug!("{}", message);

                error_response(StatusCode::BAD_REQUEST, message)
            }
            Self::Conflict(message) => {
                tracing::debug!("{}", message);

                error_response(StatusCode::CONFLICT, message)
            }
            Self::ValidationError(errors) => {
                tracing::debug!("Request failed validation: {}", errors);

                error_response(StatusCode::BAD_REQUEST, errors.to_string())
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message so
/// implementation details never reach the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let resp = Error::not_found("invoice", 7).into_response();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = Error::Conflict("Username is already taken".to_string()).into_response();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_are_masked() {
        let resp = Error::DbErr(sea_orm::DbErr::Custom("boom".to_string())).into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
