use chrono::{NaiveDateTime, Utc};
use mockito::Mock;
use sea_orm::{ActiveValue, EntityTrait};
use serde_json::json;

use crate::{
    constant::{
        DROPBOX_CREATE_SHARED_LINK_PATH, DROPBOX_LIST_SHARED_LINKS_PATH, DROPBOX_TOKEN_PATH,
        DROPBOX_UPLOAD_PATH, TEST_DROPBOX_REFRESH_TOKEN,
    },
    error::TestError,
    TestContext,
};

/// `path_display` returned by the mocked upload endpoint
pub static UPLOADED_PATH: &str = "/devices/upload.jpg";

impl TestContext {
    pub fn dropbox<'a>(&'a mut self) -> DropboxFixtures<'a> {
        DropboxFixtures { setup: self }
    }
}

pub struct DropboxFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> DropboxFixtures<'a> {
    /// Store a token row as if a previous refresh had happened
    pub async fn insert_token(
        &self,
        access_token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<entity::dropbox_token::Model, TestError> {
        Ok(
            entity::prelude::DropboxToken::insert(entity::dropbox_token::ActiveModel {
                access_token: ActiveValue::Set(access_token.to_string()),
                refresh_token: ActiveValue::Set(TEST_DROPBOX_REFRESH_TOKEN.to_string()),
                expires_at: ActiveValue::Set(expires_at),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Mock a successful refresh-token grant
    pub fn create_token_endpoint(
        &mut self,
        access_token: &str,
        expires_in: i64,
        expected_requests: usize,
    ) -> Mock {
        let body = json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": expires_in,
        });

        self.setup
            .server
            .mock("POST", DROPBOX_TOKEN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock a refresh-token grant that also hands out a new refresh token
    pub fn create_rotating_token_endpoint(
        &mut self,
        access_token: &str,
        refresh_token: &str,
        expected_requests: usize,
    ) -> Mock {
        let body = json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "token_type": "bearer",
            "expires_in": 14400,
        });

        self.setup
            .server
            .mock("POST", DROPBOX_TOKEN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock a rejected refresh-token grant
    pub fn create_token_error_endpoint(&mut self, expected_requests: usize) -> Mock {
        let body = json!({
            "error": "invalid_grant",
            "error_description": "refresh token is invalid or revoked",
        });

        self.setup
            .server
            .mock("POST", DROPBOX_TOKEN_PATH)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    pub fn create_upload_endpoint(&mut self, expected_requests: usize) -> Mock {
        let body = json!({
            "id": "id:upload",
            "name": "upload.jpg",
            "path_display": UPLOADED_PATH,
            "path_lower": UPLOADED_PATH,
        });

        self.setup
            .server
            .mock("POST", DROPBOX_UPLOAD_PATH)
            .match_header("content-type", "application/octet-stream")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    pub fn create_shared_link_endpoint(&mut self, url: &str, expected_requests: usize) -> Mock {
        let body = json!({
            ".tag": "file",
            "url": url,
            "path_lower": UPLOADED_PATH,
        });

        self.setup
            .server
            .mock("POST", DROPBOX_CREATE_SHARED_LINK_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock the conflict Dropbox returns when a link already exists, plus the listing that
    /// reports the existing `url`
    pub fn create_existing_shared_link_endpoints(&mut self, url: &str) -> Vec<Mock> {
        let conflict = json!({
            "error_summary": "shared_link_already_exists/..",
            "error": { ".tag": "shared_link_already_exists" },
        });
        let listing = json!({
            "links": [{ ".tag": "file", "url": url, "path_lower": UPLOADED_PATH }],
            "has_more": false,
        });

        let conflict_mock = self
            .setup
            .server
            .mock("POST", DROPBOX_CREATE_SHARED_LINK_PATH)
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(conflict.to_string())
            .expect(1)
            .create();

        let listing_mock = self
            .setup
            .server
            .mock("POST", DROPBOX_LIST_SHARED_LINKS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(listing.to_string())
            .expect(1)
            .create();

        vec![conflict_mock, listing_mock]
    }
}
