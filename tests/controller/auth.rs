use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use installdesk::{
    model::user::{LoginDto, RegisterDto, Role, UserDto},
    server::{
        controller::auth::{get_user, login, logout, register},
        model::session::user::SessionUserId,
    },
};
use sea_orm::EntityTrait;

use super::*;

fn registration(username: &str) -> RegisterDto {
    RegisterDto {
        username: username.to_string(),
        password: "correct horse battery".to_string(),
        email: format!("{}@example.com", username),
        first_name: "Dana".to_string(),
        last_name: "Client".to_string(),
        phone_number: None,
    }
}

/// Expect registration to create a client and log it in
#[tokio::test]
async fn register_creates_client_and_logs_in() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;

    let resp = register(
        State(test.into_app_state()),
        test.session.clone(),
        Json(registration("dana")),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: UserDto = json_body(resp).await;
    assert_eq!(user.role, Role::Client);
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), Some(user.id));

    Ok(())
}

/// Expect a taken username to be rejected with 409
#[tokio::test]
async fn register_rejects_taken_username() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("dana", ROLE_CLIENT)
        .build()
        .await?;

    let result = register(
        State(test.into_app_state()),
        test.session.clone(),
        Json(registration("dana")),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect a short password to fail validation with 400
#[tokio::test]
async fn register_validates_password_length() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;
    let mut dto = registration("dana");
    dto.password = "short".to_string();

    let result = register(State(test.into_app_state()), test.session.clone(), Json(dto)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

    Ok(())
}

/// Expect login to accept the registered password and reject a wrong one
#[tokio::test]
async fn login_checks_password() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;
    let state = test.into_app_state();
    register(
        State(state.clone()),
        test.session.clone(),
        Json(registration("dana")),
    )
    .await
    .unwrap();
    logout(test.session.clone()).await.unwrap();

    let wrong = login(
        State(state.clone()),
        test.session.clone(),
        Json(LoginDto {
            username: "dana".to_string(),
            password: "not the password".to_string(),
        }),
    )
    .await;
    assert_eq!(
        wrong.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    let resp = login(
        State(state),
        test.session.clone(),
        Json(LoginDto {
            username: "dana".to_string(),
            password: "correct horse battery".to_string(),
        }),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: UserDto = json_body(resp).await;
    assert_eq!(user.username, "dana");
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), Some(user.id));

    Ok(())
}

/// Expect logout to clear the session and succeed when nobody is logged in
#[tokio::test]
async fn logout_clears_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("dana", ROLE_CLIENT)
        .build()
        .await?;

    let resp = logout(test.session.clone()).await.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    log_in(&test, "dana").await?;
    let resp = logout(test.session.clone()).await.unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

    Ok(())
}

/// Expect 401 without a session and 404 once the session's user is deleted
#[tokio::test]
async fn get_user_requires_existing_session_user() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("dana", ROLE_CLIENT)
        .build()
        .await?;
    let state = test.into_app_state();

    let anonymous = get_user(State(state.clone()), test.session.clone()).await;
    assert_eq!(
        anonymous.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    let user_id = log_in(&test, "dana").await?;
    let resp = get_user(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    entity::prelude::AppUser::delete_by_id(user_id)
        .exec(&test.db)
        .await?;

    let stale = get_user(State(state), test.session.clone()).await;
    assert_eq!(
        stale.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

    Ok(())
}
