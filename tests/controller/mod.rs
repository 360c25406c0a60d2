//! Integration tests for the HTTP controllers.
//!
//! Handlers are called directly with the test session; `router` drives the assembled router
//! with cookies.

mod auth;
mod chat;
mod device;
mod invoice;
mod location;
mod maintenance;
mod notification;
mod order;
mod router;
mod user;

use installdesk::server::model::session::user::SessionUserId;
use installdesk_test_utils::prelude::*;

use crate::util::{json_body, TestContextExt};

/// Stores the fixture user's id in the test session and returns it
async fn log_in(test: &TestContext, username: &str) -> Result<i32, TestError> {
    let user = test.user().find_user(username).await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    Ok(user.id)
}
