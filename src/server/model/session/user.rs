use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_ID_KEY: &str = "installdesk:user:id";

/// Id of the logged-in user, the only value installdesk keeps in a session
#[derive(Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq)]
pub struct SessionUserId(pub i32);

impl SessionUserId {
    pub async fn insert(session: &Session, user_id: i32) -> Result<(), Error> {
        session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user_id))
            .await?;

        Ok(())
    }

    /// # Returns
    /// - `Ok(Some(id))` - A user is logged in
    /// - `Ok(None)` - Anonymous session
    /// - `Err(Error::SessionError)` - Store failure or a value that is not a user id
    pub async fn get(session: &Session) -> Result<Option<i32>, Error> {
        let user_id = session.get::<SessionUserId>(SESSION_USER_ID_KEY).await?;

        Ok(user_id.map(|SessionUserId(id)| id))
    }
}
