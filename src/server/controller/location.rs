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
        location::{LocationDto, LocationFormDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::location::LocationService,
    },
};

pub static LOCATION_TAG: &str = "location";

/// List the locations visible to the caller
///
/// Staff see every location, clients their own, technicians the locations of their assigned
/// orders.
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = LOCATION_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of locations", body = PageDto<LocationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_locations(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let locations = LocationService::new(&state.db)
        .get_locations(&caller, params)
        .await?;

    Ok((StatusCode::OK, Json(locations)))
}

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = LOCATION_TAG,
    request_body = LocationFormDto,
    responses(
        (status = 201, description = "Location created", body = LocationDto),
        (status = 400, description = "Invalid field values or missing client", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Technicians cannot create locations", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_location(
    State(state): State<AppState>,
    session: Session,
    Json(dto): Json<LocationFormDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let location = LocationService::new(&state.db)
        .create_location(&caller, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = LOCATION_TAG,
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "The location", body = LocationDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_location(
    State(state): State<AppState>,
    session: Session,
    Path(location_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let location = LocationService::new(&state.db)
        .get_location(&caller, location_id)
        .await?;

    Ok((StatusCode::OK, Json(location)))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = LOCATION_TAG,
    params(("id" = i32, Path, description = "Location id")),
    request_body = LocationFormDto,
    responses(
        (status = 200, description = "Updated location", body = LocationDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Technicians cannot modify locations", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_location(
    State(state): State<AppState>,
    session: Session,
    Path(location_id): Path<i32>,
    Json(dto): Json<LocationFormDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let location = LocationService::new(&state.db)
        .update_location(&caller, location_id, dto)
        .await?;

    Ok((StatusCode::OK, Json(location)))
}

/// Delete a location along with its orders
#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = LOCATION_TAG,
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Technicians cannot delete locations", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_location(
    State(state): State<AppState>,
    session: Session,
    Path(location_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    LocationService::new(&state.db)
        .delete_location(&caller, location_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
