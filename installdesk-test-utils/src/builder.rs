//! Declarative test builder.
//!
//! Configuration methods queue tables, fixture users and mock endpoints; everything is
//! executed in order by [`TestBuilder::build`].

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for test environments.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_app_tables: bool,

    users: Vec<(String, String)>, // (username, role name)

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,

    token_endpoints: Vec<(String, i64, usize)>, // (access token, expires_in, expected requests)
    upload_endpoints: Vec<usize>,
    shared_link_endpoints: Vec<(String, usize)>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_app_tables: false,
            users: Vec::new(),
            mock_builders: Vec::new(),
            token_endpoints: Vec::new(),
            upload_endpoints: Vec::new(),
            shared_link_endpoints: Vec::new(),
        }
    }

    /// Create every application table and seed the four roles.
    pub fn with_app_tables(mut self) -> Self {
        self.include_app_tables = true;
        self
    }

    /// Add a single entity table.
    ///
    /// ```no_run
    /// use installdesk_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), installdesk_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(DropboxToken)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert a user with the given role during `build()`. Requires `with_app_tables`.
    pub fn with_user(mut self, username: impl Into<String>, role: impl Into<String>) -> Self {
        self.users.push((username.into(), role.into()));
        self
    }

    /// Mock `POST /oauth2/token` returning `access_token` valid for `expires_in` seconds.
    pub fn with_token_endpoint(
        mut self,
        access_token: impl Into<String>,
        expires_in: i64,
        expected_requests: usize,
    ) -> Self {
        self.token_endpoints
            .push((access_token.into(), expires_in, expected_requests));
        self
    }

    /// Mock `POST /2/files/upload` returning the metadata of an uploaded file.
    pub fn with_upload_endpoint(mut self, expected_requests: usize) -> Self {
        self.upload_endpoints.push(expected_requests);
        self
    }

    /// Mock `POST /2/sharing/create_shared_link_with_settings` returning `url`.
    pub fn with_shared_link_endpoint(
        mut self,
        url: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.shared_link_endpoints.push((url.into(), expected_requests));
        self
    }

    /// Add a custom mock endpoint.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Create tables, insert fixtures and register mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Configured test environment
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    /// - `Err(TestError::Fixture)` - A fixture referenced a missing role
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_app_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Role),
                schema.create_table_from_entity(entity::prelude::AppUser),
                schema.create_table_from_entity(entity::prelude::Location),
                schema.create_table_from_entity(entity::prelude::SecuritySystemOrder),
                schema.create_table_from_entity(entity::prelude::OrderTechnician),
                schema.create_table_from_entity(entity::prelude::InstalledDevice),
                schema.create_table_from_entity(entity::prelude::MaintenanceLog),
                schema.create_table_from_entity(entity::prelude::MaintenanceDevice),
                schema.create_table_from_entity(entity::prelude::Invoice),
                schema.create_table_from_entity(entity::prelude::Notification),
                schema.create_table_from_entity(entity::prelude::ChatMessage),
                schema.create_table_from_entity(entity::prelude::DropboxToken),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        if self.include_app_tables {
            setup.user().insert_roles().await?;
        }

        for (username, role) in self.users {
            setup.user().insert_user(&username, &role).await?;
        }

        // Custom endpoints first so tests can queue an error response ahead of a success
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (access_token, expires_in, expected) in self.token_endpoints {
            mocks.push(
                setup
                    .dropbox()
                    .create_token_endpoint(&access_token, expires_in, expected),
            );
        }

        for expected in self.upload_endpoints {
            mocks.push(setup.dropbox().create_upload_endpoint(expected));
        }

        for (url, expected) in self.shared_link_endpoints {
            mocks.push(setup.dropbox().create_shared_link_endpoint(&url, expected));
        }

        setup.mocks.extend(mocks);

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
