//! Dropbox storage for device photos.
//!
//! [`DropboxClient`] uploads files and creates shared links using the access token kept valid by
//! [`DropboxTokenManager`].

pub mod token;

use std::sync::Arc;

use reqwest::{header::CONTENT_TYPE, StatusCode, Url};
use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::server::{
    config::DropboxConfig,
    error::{dropbox::DropboxError, Error},
};

pub use token::DropboxTokenManager;

const UPLOAD_ENDPOINT: &str = "/2/files/upload";
const CREATE_SHARED_LINK_ENDPOINT: &str = "/2/sharing/create_shared_link_with_settings";
const LIST_SHARED_LINKS_ENDPOINT: &str = "/2/sharing/list_shared_links";

#[derive(Deserialize)]
struct FileMetadata {
    path_display: String,
}

#[derive(Deserialize)]
struct SharedLink {
    url: String,
}

#[derive(Deserialize)]
struct SharedLinkList {
    links: Vec<SharedLink>,
}

#[derive(Clone)]
pub struct DropboxClient {
    http: reqwest::Client,
    config: Arc<DropboxConfig>,
    tokens: DropboxTokenManager,
}

impl DropboxClient {
    /// Creates a new instance of [`DropboxClient`]
    pub fn new(db: DatabaseConnection, http: reqwest::Client, config: Arc<DropboxConfig>) -> Self {
        let tokens = DropboxTokenManager::new(db, http.clone(), config.clone());

        Self {
            http,
            config,
            tokens,
        }
    }

    pub fn token_manager(&self) -> &DropboxTokenManager {
        &self.tokens
    }

    /// Uploads `bytes` to `path`, renaming on conflict
    ///
    /// Returns the path Dropbox stored the file under.
    pub async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<String, Error> {
        let access_token = self.tokens.get_access_token().await?;
        let arg = json!({
            "path": path,
            "mode": "add",
            "autorename": true,
            "mute": true,
        });

        let response = self
            .http
            .post(format!("{}{}", self.config.content_url, UPLOAD_ENDPOINT))
            .bearer_auth(access_token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(DropboxError::from)?;

        let metadata: FileMetadata = parse_response(response, UPLOAD_ENDPOINT).await?;

        tracing::debug!(path = %metadata.path_display, "Uploaded file to Dropbox");

        Ok(metadata.path_display)
    }

    /// Creates a public link to `path`, reusing the existing link if the file is already shared
    pub async fn create_shared_link(&self, path: &str) -> Result<String, Error> {
        let access_token = self.tokens.get_access_token().await?;

        let response = self
            .http
            .post(format!("{}{}", self.config.api_url, CREATE_SHARED_LINK_ENDPOINT))
            .bearer_auth(&access_token)
            .json(&json!({ "path": path }))
            .send()
            .await
            .map_err(DropboxError::from)?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.map_err(DropboxError::from)?;

            if body.contains("shared_link_already_exists") {
                return Ok(self.existing_shared_link(path, &access_token).await?);
            }

            return Err(DropboxError::Api {
                endpoint: CREATE_SHARED_LINK_ENDPOINT.to_string(),
                status: StatusCode::CONFLICT.as_u16(),
                body,
            }
            .into());
        }

        let link: SharedLink = parse_response(response, CREATE_SHARED_LINK_ENDPOINT).await?;

        Ok(link.url)
    }

    /// Uploads a file and returns a direct link to its content
    pub async fn upload_and_share(&self, path: &str, bytes: Vec<u8>) -> Result<String, Error> {
        let stored_path = self.upload_file(path, bytes).await?;
        let link = self.create_shared_link(&stored_path).await?;

        Ok(to_direct_url(&link)?)
    }

    async fn existing_shared_link(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<String, DropboxError> {
        let response = self
            .http
            .post(format!("{}{}", self.config.api_url, LIST_SHARED_LINKS_ENDPOINT))
            .bearer_auth(access_token)
            .json(&json!({ "path": path, "direct_only": true }))
            .send()
            .await?;

        let list: SharedLinkList = parse_response(response, LIST_SHARED_LINKS_ENDPOINT).await?;

        list.links
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or_else(|| DropboxError::MissingSharedLink(path.to_string()))
    }
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<T, DropboxError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        return Err(DropboxError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<T>().await?)
}

/// Rewrites a shared link so it serves the file itself instead of the Dropbox preview page
pub fn to_direct_url(shared_link: &str) -> Result<String, DropboxError> {
    let mut url = Url::parse(shared_link)
        .map_err(|e| DropboxError::InvalidUrl(format!("{}: {}", shared_link, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "dl" && key != "raw")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("raw", "1");

    Ok(url.to_string())
}
