//! Application startup: tracing, database, sessions, Dropbox and the HTTP listener.

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::server::{
    config::{AdminCredentials, Config},
    error::{dropbox::DropboxError, Error},
    model::app::AppState,
    router,
    scheduler::Scheduler,
    service::{auth::AuthService, dropbox::DropboxClient},
};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "installdesk=info,tower_sessions=warn";

/// Initializes the global tracing subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Cookie session layer backed by an in-process store
///
/// Sessions do not survive a restart.
pub fn session_layer() -> SessionManagerLayer<MemoryStore> {
    // Plain HTTP cookies are only allowed in debug builds
    let secure_cookies = !cfg!(debug_assertions);

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)))
}

/// Build the Dropbox client shared by request handlers and the token refresh job
pub fn build_dropbox_client(
    config: &Config,
    db: DatabaseConnection,
) -> Result<DropboxClient, Error> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("installdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(DropboxError::from)?;

    Ok(DropboxClient::new(db, http, Arc::new(config.dropbox.clone())))
}

/// Create the configured admin account if it does not exist yet
pub async fn bootstrap_admin(
    db: &DatabaseConnection,
    admin: Option<&AdminCredentials>,
) -> Result<(), Error> {
    let Some(admin) = admin else {
        tracing::debug!("No admin credentials configured, skipping admin bootstrap");
        return Ok(());
    };

    if AuthService::new(db)
        .ensure_admin(&admin.username, &admin.password)
        .await?
    {
        tracing::info!(username = %admin.username, "Created admin account");
    }

    Ok(())
}

/// API routes with application state and the session layer applied
pub fn build_router(state: AppState, session: SessionManagerLayer<MemoryStore>) -> Router {
    router::routes().with_state(state).layer(session)
}

/// Connects every dependency, starts the token refresh job and serves the API until the
/// listener fails.
pub async fn run(config: Config) -> Result<(), Error> {
    let db = connect_to_database(&config).await?;
    bootstrap_admin(&db, config.admin.as_ref()).await?;

    let dropbox = build_dropbox_client(&config, db.clone())?;

    Scheduler::new(dropbox.token_manager().clone())
        .await?
        .start(&config.dropbox_refresh_cron)
        .await?;

    let app = build_router(AppState { db, dropbox }, session_layer());

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Starting server");

    axum::serve(listener, app).await?;

    Ok(())
}
