use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug)]
pub enum DropboxError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Dropbox token refresh failed: {0}")]
    TokenRefresh(String),
    #[error("Dropbox API call {endpoint} failed with status {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("Dropbox returned no shared link for {0}")]
    MissingSharedLink(String),
    #[error("Invalid Dropbox URL: {0}")]
    InvalidUrl(String),
}

impl IntoResponse for DropboxError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
