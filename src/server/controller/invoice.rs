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
        invoice::{CreateInvoiceDto, InvoiceDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::invoice::InvoiceService,
    },
};

pub static INVOICE_TAG: &str = "invoice";

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = INVOICE_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "One page of invoices", body = PageDto<InvoiceDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_invoices(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let invoices = InvoiceService::new(&state.db)
        .get_invoices(&caller, params)
        .await?;

    Ok((StatusCode::OK, Json(invoices)))
}

/// Bill the order's client (admins and managers)
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = INVOICE_TAG,
    request_body = CreateInvoiceDto,
    responses(
        (status = 201, description = "Invoice issued", body = InvoiceDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    session: Session,
    Json(dto): Json<CreateInvoiceDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let invoice = InvoiceService::new(&state.db)
        .create_invoice(&caller, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "The invoice", body = InvoiceDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db)
        .get_invoice(&caller, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

#[utoipa::path(
    put,
    path = "/api/invoices/{id}/paid",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice marked paid", body = InvoiceDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not staff", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_invoice_paid(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db)
        .mark_paid(&caller, invoice_id)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

/// Delete an invoice (admins only)
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = INVOICE_TAG,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(invoice_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    InvoiceService::new(&state.db)
        .delete_invoice(&caller, invoice_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
