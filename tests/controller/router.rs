//! Requests through the assembled router, with the session cookie carried between calls.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, StatusCode,
    },
    Router,
};
use installdesk::{
    model::user::UserDto,
    server::startup::{build_router, session_layer},
};
use serde_json::json;
use tower::ServiceExt;

use super::*;

fn app(test: &TestContext) -> Router {
    build_router(test.into_app_state(), session_layer())
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Expect protected routes to answer 401 without a session cookie
#[tokio::test]
async fn protected_route_requires_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the session cookie from registration to authenticate later requests
#[tokio::test]
async fn registration_cookie_authenticates() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;
    let app = app(&test);

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/register",
            json!({
                "username": "dana",
                "password": "correct horse battery",
                "email": "dana@example.com",
                "first_name": "Dana",
                "last_name": "Client",
                "phone_number": null
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let cookie = resp
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .unwrap();

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: UserDto = json_body(resp).await;
    assert_eq!(user.username, "dana");

    Ok(())
}

/// Expect malformed JSON to be rejected by the extractor
#[tokio::test]
async fn rejects_malformed_json() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;

    let resp = app(&test)
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "username": "dana" }),
        ))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());

    Ok(())
}

/// Expect the OpenAPI document to list the API routes
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().with_app_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let doc: serde_json::Value = json_body(resp).await;
    assert!(doc["paths"]["/api/orders/{id}/technicians"].is_object());
    assert!(doc["paths"]["/api/devices/{id}/image"].is_object());

    Ok(())
}
