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
        order::{AssignTechnicianDto, CreateOrderDto, OrderDto, UpdateOrderStatusDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::order::OrderService,
    },
};

pub static ORDER_TAG: &str = "order";

/// List the orders visible to the caller
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = ORDER_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of orders", body = PageDto<OrderDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_orders(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let orders = OrderService::new(&state.db)
        .get_orders(&caller, params)
        .await?;

    Ok((StatusCode::OK, Json(orders)))
}

/// Place an installation order at one of the caller's locations
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = ORDER_TAG,
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = OrderDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Technicians cannot place orders", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_order(
    State(state): State<AppState>,
    session: Session,
    Json(dto): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let order = OrderService::new(&state.db)
        .create_order(&caller, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_order(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let order = OrderService::new(&state.db)
        .get_order(&caller, order_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

/// Change an order's status (admins and managers)
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Order with the new status", body = OrderDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
    Json(dto): Json<UpdateOrderStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let order = OrderService::new(&state.db)
        .update_status(&caller, order_id, dto.status)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

/// Assign a technician to an order (admins and managers)
#[utoipa::path(
    post,
    path = "/api/orders/{id}/technicians",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order id")),
    request_body = AssignTechnicianDto,
    responses(
        (status = 200, description = "Order with the technician assigned", body = OrderDto),
        (status = 400, description = "User is not a technician", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Order or user not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assign_technician(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
    Json(dto): Json<AssignTechnicianDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let order = OrderService::new(&state.db)
        .assign_technician(&caller, order_id, dto.technician_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

/// Remove a technician from an order (admins and managers)
#[utoipa::path(
    delete,
    path = "/api/orders/{id}/technicians/{technician_id}",
    tag = ORDER_TAG,
    params(
        ("id" = i32, Path, description = "Order id"),
        ("technician_id" = i32, Path, description = "Technician user id")
    ),
    responses(
        (status = 200, description = "Order without the technician", body = OrderDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Order or assignment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unassign_technician(
    State(state): State<AppState>,
    session: Session,
    Path((order_id, technician_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let order = OrderService::new(&state.db)
        .unassign_technician(&caller, order_id, technician_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

/// Delete an order
///
/// Admins may delete any order; clients may delete their own orders while still pending.
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = ORDER_TAG,
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller may not delete this order", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_order(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    OrderService::new(&state.db)
        .delete_order(&caller, order_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
