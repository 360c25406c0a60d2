use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    model::{
        api::{ErrorDto, PageDto, PageParams},
        user::{ChangeRoleDto, UpdateProfileDto, UserDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::user::UserService,
    },
};

pub static USER_TAG: &str = "user";

/// List users (admins and managers)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of users", body = PageDto<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let users = UserService::new(&state.db).get_users(&caller, params).await?;

    Ok((StatusCode::OK, Json(users)))
}

/// List every technician (admins and managers)
#[utoipa::path(
    get,
    path = "/api/users/technicians",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All technicians", body = Vec<UserDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_technicians(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let technicians = UserService::new(&state.db).get_technicians(&caller).await?;

    Ok((StatusCode::OK, Json(technicians)))
}

/// Get a user by id (admins and managers, or the user themselves)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller may not view this user", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let user = UserService::new(&state.db)
        .get_user_for(&caller, user_id)
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Update the logged-in user's profile
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = USER_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(dto): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let user = UserService::new(&state.db)
        .update_profile(&caller, dto)
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Change a user's role (admins)
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    request_body = ChangeRoleDto,
    responses(
        (status = 200, description = "User with the new role", body = UserDto),
        (status = 400, description = "Admins cannot change their own role", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_role(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(dto): Json<ChangeRoleDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let user = UserService::new(&state.db)
        .change_role(&caller, user_id, dto.role)
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Delete a user (admins)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Admins cannot delete themselves", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "User still has orders, invoices or logs", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    UserService::new(&state.db)
        .delete_user(&caller, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
