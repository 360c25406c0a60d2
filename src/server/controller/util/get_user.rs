use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, auth::CurrentUser, session::user::SessionUserId},
    service::user::UserService,
};

/// Resolves the logged-in user for a request
///
/// # Returns
/// - `Ok(CurrentUser)` - User id in session and user found in the database
/// - `Err(Error::AuthError(AuthError::UserNotInSession))` - Nobody is logged in
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))` - The session points at a deleted
///   user; the session is cleared
/// - `Err(Error)` - Session or database failure
pub async fn get_user_from_session(
    state: &AppState,
    session: &Session,
) -> Result<CurrentUser, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserService::new(&state.db)
        .get_current_user(user_id)
        .await?
    else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}
