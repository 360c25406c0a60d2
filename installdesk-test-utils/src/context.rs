//! Test context returned by `TestBuilder::build`.
//!
//! Holds an in-memory SQLite database, a session backed by an in-memory store and a mockito
//! server standing in for the Dropbox API, content and OAuth hosts.

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::{constant::DROPBOX_TOKEN_PATH, error::TestError};

/// Test environment created by [`TestBuilder`](crate::TestBuilder).
///
/// ```ignore
/// let test = TestBuilder::new().with_app_tables().build().await?;
///
/// let client = test.user().insert_user("client", ROLE_CLIENT).await?;
/// let order = test.order().insert_order_for_client(client.id).await?;
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session used by controller tests
    pub session: Session,

    pub(crate) server: ServerGuard,
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            session,
            server,
            mocks: Vec::new(),
        })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Base URL of the mock server, used for both the Dropbox API and content hosts
    pub fn dropbox_url(&self) -> String {
        self.server.url()
    }

    /// URL of the mocked OAuth token endpoint
    pub fn dropbox_token_url(&self) -> String {
        format!("{}{}", self.server.url(), DROPBOX_TOKEN_PATH)
    }

    /// Keeps a mock created after `build()` alive for the rest of the test and includes it in
    /// [`assert_mocks`](Self::assert_mocks).
    pub fn track_mock(&mut self, mock: Mock) {
        self.mocks.push(mock);
    }

    /// Assert every mock endpoint was called the expected number of times.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
