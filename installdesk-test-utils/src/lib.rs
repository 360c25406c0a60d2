//! Test harness for installdesk.
//!
//! Provides an in-memory SQLite database with the application schema, an in-memory session,
//! a mockito server standing in for the Dropbox API, and fixture helpers for inserting
//! domain records.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{
            ROLE_ADMIN, ROLE_CLIENT, ROLE_MANAGER, ROLE_TECHNICIAN, TEST_DROPBOX_APP_KEY,
            TEST_DROPBOX_APP_SECRET, TEST_DROPBOX_REFRESH_TOKEN,
        },
        fixtures::dropbox::UPLOADED_PATH,
        TestBuilder, TestContext, TestError,
    };
}
