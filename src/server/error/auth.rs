use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User {user_id} is not allowed to {action}")]
    Forbidden { user_id: i32, action: String },
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
}

impl AuthError {
    pub fn forbidden(user_id: i32, action: impl Into<String>) -> Self {
        Self::Forbidden {
            user_id,
            action: action.into(),
        }
    }

    fn response(status: StatusCode, message: &str) -> Response {
        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                Self::response(StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(
                    user_id = %user_id,
                    "{}",
                    self
                );

                Self::response(StatusCode::NOT_FOUND, "User not found")
            }
            Self::InvalidCredentials => {
                tracing::debug!("{}", self);

                Self::response(StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            Self::Forbidden { .. } => {
                tracing::debug!("{}", self);

                Self::response(
                    StatusCode::FORBIDDEN,
                    "You do not have permission to perform this action",
                )
            }
            Self::PasswordHash(_) => InternalServerError(self).into_response(),
        }
    }
}
