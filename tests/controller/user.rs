use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use installdesk::{
    model::{
        api::{PageDto, PageParams},
        user::{ChangeRoleDto, Role, UpdateProfileDto, UserDto},
    },
    server::controller::user::{change_role, delete_user, get_users, update_profile},
};

use super::*;

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_app_tables()
        .with_user("admin", ROLE_ADMIN)
        .with_user("manager", ROLE_MANAGER)
        .with_user("client", ROLE_CLIENT)
        .build()
        .await
}

/// Expect staff to list users and clients to be forbidden
#[tokio::test]
async fn get_users_is_staff_only() -> Result<(), TestError> {
    let test = setup().await?;
    let state = test.into_app_state();

    log_in(&test, "manager").await?;
    let resp = get_users(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: PageDto<UserDto> = json_body(resp).await;
    assert_eq!(page.total_items, 3);

    log_in(&test, "client").await?;
    let result = get_users(
        State(state),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

/// Expect the profile update to keep username and role
#[tokio::test]
async fn update_profile_changes_own_fields() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "client").await?;

    let resp = update_profile(
        State(test.into_app_state()),
        test.session.clone(),
        Json(UpdateProfileDto {
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
            last_name: "Name".to_string(),
            phone_number: Some("+15550100".to_string()),
        }),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: UserDto = json_body(resp).await;
    assert_eq!(user.username, "client");
    assert_eq!(user.email, "new@example.com");
    assert_eq!(user.role, Role::Client);

    Ok(())
}

/// Expect an invalid email to be rejected with 400
#[tokio::test]
async fn update_profile_validates_email() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "client").await?;

    let result = update_profile(
        State(test.into_app_state()),
        test.session.clone(),
        Json(UpdateProfileDto {
            email: "not-an-email".to_string(),
            first_name: "New".to_string(),
            last_name: "Name".to_string(),
            phone_number: None,
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

/// Expect only admins to change roles
#[tokio::test]
async fn change_role_requires_admin() -> Result<(), TestError> {
    let test = setup().await?;
    let state = test.into_app_state();
    let client = test.user().find_user("client").await?;

    log_in(&test, "manager").await?;
    let result = change_role(
        State(state.clone()),
        test.session.clone(),
        Path(client.id),
        Json(ChangeRoleDto {
            role: Role::Technician,
        }),
    )
    .await;
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    log_in(&test, "admin").await?;
    let resp = change_role(
        State(state),
        test.session.clone(),
        Path(client.id),
        Json(ChangeRoleDto {
            role: Role::Technician,
        }),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: UserDto = json_body(resp).await;
    assert_eq!(user.role, Role::Technician);

    Ok(())
}

/// Expect admins to delete other users but not themselves
#[tokio::test]
async fn delete_user_protects_own_account() -> Result<(), TestError> {
    let test = setup().await?;
    let state = test.into_app_state();
    let admin_id = log_in(&test, "admin").await?;
    let client = test.user().find_user("client").await?;

    let own = delete_user(State(state.clone()), test.session.clone(), Path(admin_id)).await;
    assert_eq!(
        own.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    let resp = delete_user(State(state.clone()), test.session.clone(), Path(client.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let missing = delete_user(State(state), test.session.clone(), Path(client.id)).await;
    assert_eq!(
        missing.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}
