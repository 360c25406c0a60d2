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
        maintenance::{CreateMaintenanceLogDto, MaintenanceLogDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::maintenance::MaintenanceService,
    },
};

pub static MAINTENANCE_TAG: &str = "maintenance";

#[utoipa::path(
    get,
    path = "/api/maintenance",
    tag = MAINTENANCE_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of logs", body = PageDto<MaintenanceLogDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_logs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let logs = MaintenanceService::new(&state.db)
        .get_logs(&caller, params)
        .await?;

    Ok((StatusCode::OK, Json(logs)))
}

/// Log a maintenance visit and the devices inspected during it
#[utoipa::path(
    post,
    path = "/api/maintenance",
    tag = MAINTENANCE_TAG,
    request_body = CreateMaintenanceLogDto,
    responses(
        (status = 201, description = "Maintenance logged", body = MaintenanceLogDto),
        (status = 400, description = "Invalid fields or device not on the order", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot work on this order", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_log(
    State(state): State<AppState>,
    session: Session,
    Json(dto): Json<CreateMaintenanceLogDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let log = MaintenanceService::new(&state.db)
        .create_log(&caller, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(log)))
}

#[utoipa::path(
    get,
    path = "/api/maintenance/{id}",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance log id")),
    responses(
        (status = 200, description = "The maintenance log", body = MaintenanceLogDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Maintenance log not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_log(
    State(state): State<AppState>,
    session: Session,
    Path(log_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let log = MaintenanceService::new(&state.db)
        .get_log(&caller, log_id)
        .await?;

    Ok((StatusCode::OK, Json(log)))
}

#[utoipa::path(
    put,
    path = "/api/maintenance/{id}/resolve",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance log id")),
    responses(
        (status = 200, description = "Resolved maintenance log", body = MaintenanceLogDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff or the log's author", body = ErrorDto),
        (status = 404, description = "Maintenance log not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn resolve_log(
    State(state): State<AppState>,
    session: Session,
    Path(log_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let log = MaintenanceService::new(&state.db)
        .resolve_log(&caller, log_id)
        .await?;

    Ok((StatusCode::OK, Json(log)))
}

#[utoipa::path(
    delete,
    path = "/api/maintenance/{id}",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance log id")),
    responses(
        (status = 204, description = "Maintenance log deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Maintenance log not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_log(
    State(state): State<AppState>,
    session: Session,
    Path(log_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    MaintenanceService::new(&state.db)
        .delete_log(&caller, log_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
