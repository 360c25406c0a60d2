use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    model::{
        api::ErrorDto,
        device::{DeviceDto, DeviceFormDto, DeviceImageUpload},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::device::DeviceService,
    },
};

pub static DEVICE_TAG: &str = "device";

/// Multipart field holding the uploaded photo
const IMAGE_FIELD: &str = "file";

/// List the devices installed on an order
#[utoipa::path(
    get,
    path = "/api/orders/{id}/devices",
    tag = DEVICE_TAG,
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Devices on the order", body = Vec<DeviceDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_devices(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let devices = DeviceService::new(&state.db)
        .get_devices(&caller, order_id)
        .await?;

    Ok((StatusCode::OK, Json(devices)))
}

/// Record a device installed on an order (staff or assigned technicians)
#[utoipa::path(
    post,
    path = "/api/orders/{id}/devices",
    tag = DEVICE_TAG,
    params(("id" = i32, Path, description = "Order id")),
    request_body = DeviceFormDto,
    responses(
        (status = 201, description = "Device recorded", body = DeviceDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot work on this order", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_device(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<i32>,
    Json(dto): Json<DeviceFormDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let device = DeviceService::new(&state.db)
        .add_device(&caller, order_id, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(device)))
}

#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    tag = DEVICE_TAG,
    params(("id" = i32, Path, description = "Device id")),
    request_body = DeviceFormDto,
    responses(
        (status = 200, description = "Updated device", body = DeviceDto),
        (status = 400, description = "Invalid field values", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot work on this order", body = ErrorDto),
        (status = 404, description = "Device not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_device(
    State(state): State<AppState>,
    session: Session,
    Path(device_id): Path<i32>,
    Json(dto): Json<DeviceFormDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let device = DeviceService::new(&state.db)
        .update_device(&caller, device_id, dto)
        .await?;

    Ok((StatusCode::OK, Json(device)))
}

#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    tag = DEVICE_TAG,
    params(("id" = i32, Path, description = "Device id")),
    responses(
        (status = 204, description = "Device removed"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot work on this order", body = ErrorDto),
        (status = 404, description = "Device not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_device(
    State(state): State<AppState>,
    session: Session,
    Path(device_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    DeviceService::new(&state.db)
        .delete_device(&caller, device_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Upload a photo of a device
///
/// The photo is stored in Dropbox and the device keeps a direct link to it.
#[utoipa::path(
    post,
    path = "/api/devices/{id}/image",
    tag = DEVICE_TAG,
    params(("id" = i32, Path, description = "Device id")),
    request_body(content = DeviceImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Device with its image link", body = DeviceDto),
        (status = 400, description = "Missing or empty file field", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot work on this order", body = ErrorDto),
        (status = 404, description = "Device not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn upload_device_image(
    State(state): State<AppState>,
    session: Session,
    Path(device_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let device = DeviceService::new(&state.db)
            .attach_image(&caller, device_id, &file_name, bytes.to_vec(), &state.dropbox)
            .await?;

        return Ok((StatusCode::OK, Json(device)));
    }

    Err(Error::BadRequest(format!(
        "Missing multipart field \"{}\"",
        IMAGE_FIELD
    )))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> Error {
    Error::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
}
