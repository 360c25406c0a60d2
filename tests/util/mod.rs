//! Helpers for driving controllers directly from integration tests.

use std::sync::Arc;

use axum::{body::to_bytes, response::Response};
use chrono::Duration;
use installdesk::server::{
    config::DropboxConfig, model::app::AppState, service::dropbox::DropboxClient,
};
use installdesk_test_utils::prelude::*;
use serde::de::DeserializeOwned;

/// Extension trait building [`AppState`] from a [`TestContext`]
pub trait TestContextExt {
    /// State sharing the test database, with Dropbox pointed at the mock server
    fn into_app_state(&self) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        let config = DropboxConfig {
            app_key: TEST_DROPBOX_APP_KEY.to_string(),
            app_secret: TEST_DROPBOX_APP_SECRET.to_string(),
            refresh_token: TEST_DROPBOX_REFRESH_TOKEN.to_string(),
            api_url: self.dropbox_url(),
            content_url: self.dropbox_url(),
            token_url: self.dropbox_token_url(),
            refresh_margin: Duration::minutes(5),
        };

        AppState {
            db: self.db.clone(),
            dropbox: DropboxClient::new(self.db.clone(), reqwest::Client::new(), Arc::new(config)),
        }
    }
}

/// Reads and deserializes a JSON response body
pub async fn json_body<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();

    serde_json::from_slice(&bytes).unwrap()
}
