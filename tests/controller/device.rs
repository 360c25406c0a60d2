use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Path, State},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use installdesk::{
    model::device::DeviceDto,
    server::controller::device::{get_devices, upload_device_image},
};

use super::*;

static BOUNDARY: &str = "installdesk-test-boundary";

/// Builds the multipart extractor for a single form field
async fn multipart_with_field(name: &str, file_name: &str, content: &str) -> Multipart {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/jpeg\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/devices/1/image")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}

/// Expect the uploaded photo's direct link stored on the device
#[tokio::test]
async fn uploads_device_image_to_dropbox() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_app_tables()
        .with_user("tech", ROLE_TECHNICIAN)
        .with_user("client", ROLE_CLIENT)
        .with_upload_endpoint(1)
        .with_shared_link_endpoint("https://www.dropbox.com/s/xyz/upload.jpg?dl=0", 1)
        .build()
        .await?;
    test.dropbox()
        .insert_token("access_token", Utc::now().naive_utc() + Duration::hours(2))
        .await?;
    let tech_id = log_in(&test, "tech").await?;
    let client = test.user().find_user("client").await?;
    let order = test.order().insert_order_for_client(client.id).await?;
    test.order().assign_technician(order.id, tech_id).await?;
    let device = test.order().insert_device(order.id).await?;

    let resp = upload_device_image(
        State(test.into_app_state()),
        test.session.clone(),
        Path(device.id),
        multipart_with_field("file", "front door.jpg", "jpeg-bytes").await,
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: DeviceDto = json_body(resp).await;
    assert_eq!(
        updated.image_url.as_deref(),
        Some("https://www.dropbox.com/s/xyz/upload.jpg?raw=1")
    );
    test.assert_mocks();

    Ok(())
}

/// Expect a body without the `file` field to be rejected before uploading
#[tokio::test]
async fn rejects_upload_without_file_field() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("manager", ROLE_MANAGER)
        .with_user("client", ROLE_CLIENT)
        .with_upload_endpoint(0)
        .build()
        .await?;
    log_in(&test, "manager").await?;
    let client = test.user().find_user("client").await?;
    let order = test.order().insert_order_for_client(client.id).await?;
    let device = test.order().insert_device(order.id).await?;

    let result = upload_device_image(
        State(test.into_app_state()),
        test.session.clone(),
        Path(device.id),
        multipart_with_field("photo", "camera.jpg", "jpeg-bytes").await,
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );
    test.assert_mocks();

    Ok(())
}

/// Expect the order's client to list devices and other clients to get 404
#[tokio::test]
async fn lists_devices_for_visible_orders() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("alice", ROLE_CLIENT)
        .with_user("bob", ROLE_CLIENT)
        .build()
        .await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    test.order().insert_device(order.id).await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = get_devices(State(state.clone()), test.session.clone(), Path(order.id))
        .await
        .unwrap()
        .into_response();
    let devices: Vec<DeviceDto> = json_body(resp).await;
    assert_eq!(devices.len(), 1);

    log_in(&test, "bob").await?;
    let hidden = get_devices(State(state), test.session.clone(), Path(order.id)).await;
    assert_eq!(
        hidden.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}
