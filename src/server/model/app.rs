use sea_orm::DatabaseConnection;

use crate::server::service::dropbox::DropboxClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub dropbox: DropboxClient,
}
