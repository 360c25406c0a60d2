use std::sync::Arc;

use chrono::{Duration, Utc};
use oauth2::{basic::BasicClient, ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::server::{
    config::DropboxConfig,
    data::dropbox_token::DropboxTokenRepository,
    error::{dropbox::DropboxError, Error},
    model::db::DropboxTokenModel,
};

/// Lifetime assumed when Dropbox omits `expires_in`, matching its short-lived token length
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 4 * 60 * 60;

/// Result of a successful refresh grant
struct RefreshedToken {
    access_token: String,
    lifetime: Duration,
    /// Present when Dropbox rotated the refresh token
    refresh_token: Option<String>,
}

/// Keeps the stored Dropbox access token valid.
///
/// Refreshes are serialized through an async mutex shared by every clone, and the stored token is
/// read again once the lock is held, so concurrent callers that find an expiring token trigger
/// a single refresh.
#[derive(Clone)]
pub struct DropboxTokenManager {
    db: DatabaseConnection,
    http: reqwest::Client,
    config: Arc<DropboxConfig>,
    refresh_lock: Arc<Mutex<()>>,
}

impl DropboxTokenManager {
    /// Creates a new instance of [`DropboxTokenManager`]
    pub fn new(db: DatabaseConnection, http: reqwest::Client, config: Arc<DropboxConfig>) -> Self {
        Self {
            db,
            http,
            config,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns an access token valid for longer than the configured refresh margin
    ///
    /// # Returns
    /// - `Ok(String)` - Stored or freshly refreshed access token
    /// - `Err(Error::DropboxError)` - The refresh grant was rejected or could not be sent, the
    ///   stored token is left untouched
    /// - `Err(Error::DbErr)` - Reading or storing the token failed
    pub async fn get_access_token(&self) -> Result<String, Error> {
        if let Some(token) = self.stored_fresh_token().await? {
            return Ok(token.access_token);
        }

        Ok(self.refresh_locked().await?.access_token)
    }

    /// Refreshes the stored token if it is missing or expires within the refresh margin
    ///
    /// Returns `true` when a refresh was needed.
    pub async fn refresh_if_expiring(&self) -> Result<bool, Error> {
        if self.stored_fresh_token().await?.is_some() {
            return Ok(false);
        }

        self.refresh_locked().await?;

        Ok(true)
    }

    fn is_fresh(&self, token: &DropboxTokenModel) -> bool {
        token.expires_at - self.config.refresh_margin > Utc::now().naive_utc()
    }

    async fn stored_fresh_token(&self) -> Result<Option<DropboxTokenModel>, Error> {
        let stored = DropboxTokenRepository::new(&self.db).get().await?;

        Ok(stored.filter(|token| self.is_fresh(token)))
    }

    async fn refresh_locked(&self) -> Result<DropboxTokenModel, Error> {
        let _guard = self.refresh_lock.lock().await;

        let token_repo = DropboxTokenRepository::new(&self.db);
        let stored = token_repo.get().await?;

        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = stored.as_ref().filter(|token| self.is_fresh(token)) {
            return Ok(token.clone());
        }

        let refresh_token = match stored {
            Some(token) => token.refresh_token,
            None => {
                tracing::info!("No stored Dropbox token, seeding from configured refresh token");
                self.config.refresh_token.clone()
            }
        };

        let refreshed = self.exchange_refresh_token(&refresh_token).await?;
        let expires_at = Utc::now().naive_utc() + refreshed.lifetime;

        if refreshed.refresh_token.is_some() {
            tracing::info!("Dropbox rotated the refresh token");
        }
        let refresh_token = refreshed.refresh_token.unwrap_or(refresh_token);

        let token = token_repo
            .upsert(refreshed.access_token, refresh_token, expires_at)
            .await?;

        tracing::info!(expires_at = %token.expires_at, "Refreshed Dropbox access token");

        Ok(token)
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, DropboxError> {
        let token_url = TokenUrl::new(self.config.token_url.clone())
            .map_err(|e| DropboxError::InvalidUrl(format!("{}: {}", self.config.token_url, e)))?;

        let client = BasicClient::new(ClientId::new(self.config.app_key.clone()))
            .set_client_secret(ClientSecret::new(self.config.app_secret.clone()))
            .set_token_uri(token_url);

        let response = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| DropboxError::TokenRefresh(e.to_string()))?;

        let lifetime = response
            .expires_in()
            .and_then(|expires_in| i64::try_from(expires_in.as_secs()).ok())
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));

        Ok(RefreshedToken {
            access_token: response.access_token().secret().to_string(),
            lifetime,
            refresh_token: response
                .refresh_token()
                .map(|token| token.secret().to_string()),
        })
    }
}
