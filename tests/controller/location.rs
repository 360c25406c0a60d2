use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use installdesk::{
    model::{
        api::{PageDto, PageParams},
        location::{LocationDto, LocationFormDto},
    },
    server::controller::{
        location::{create_location, delete_location, get_location, get_locations},
        order::delete_order,
    },
};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;

use super::*;

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_app_tables()
        .with_user("admin", ROLE_ADMIN)
        .with_user("manager", ROLE_MANAGER)
        .with_user("alice", ROLE_CLIENT)
        .with_user("bob", ROLE_CLIENT)
        .build()
        .await
}

fn location_form(name: &str, client_id: Option<i32>) -> LocationFormDto {
    LocationFormDto {
        name: name.to_string(),
        address: "12 Harbour Road".to_string(),
        description: None,
        client_id,
    }
}

/// Expect a client's new location to belong to them
#[tokio::test]
async fn client_creates_own_location() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let bob = test.user().find_user("bob").await?;

    let resp = create_location(
        State(test.into_app_state()),
        test.session.clone(),
        Json(location_form("Boathouse", Some(bob.id))),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location: LocationDto = json_body(resp).await;
    assert_eq!(location.client_id, alice_id);

    Ok(())
}

/// Expect an empty name to be rejected before anything is stored
#[tokio::test]
async fn rejects_blank_location_name() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "alice").await?;

    let result = create_location(
        State(test.into_app_state()),
        test.session.clone(),
        Json(location_form("", None)),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );
    let stored = entity::prelude::Location::find().all(&test.db).await?;
    assert!(stored.is_empty());

    Ok(())
}

/// Expect clients to list their own locations and get 404 for another client's
#[tokio::test]
async fn hides_other_clients_locations() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let bob = test.user().find_user("bob").await?;
    test.order().insert_location(alice.id).await?;
    let bobs = test.order().insert_location(bob.id).await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = get_locations(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let page: PageDto<LocationDto> = json_body(resp).await;

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].client_id, alice.id);

    let hidden = get_location(State(state), test.session.clone(), Path(bobs.id)).await;
    assert_eq!(
        hidden.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect a client to be refused deleting a location whose order is completed and billed,
/// just as deleting the order itself is refused
#[tokio::test]
async fn client_cannot_delete_location_with_completed_order() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let order = test.order().insert_order_for_client(alice_id).await?;
    test.order().set_order_status(order.id, "Completed").await?;
    let invoice = test
        .order()
        .insert_invoice(order.id, alice_id, Decimal::from(500))
        .await?;
    let state = test.into_app_state();

    let order_delete =
        delete_order(State(state.clone()), test.session.clone(), Path(order.id)).await;
    let location_delete = delete_location(
        State(state),
        test.session.clone(),
        Path(order.location_id),
    )
    .await;

    assert_eq!(
        order_delete.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        location_delete.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert!(entity::prelude::Invoice::find_by_id(invoice.id)
        .one(&test.db)
        .await?
        .is_some());

    Ok(())
}

/// Expect a location with only pending orders to go, taking the orders with it
#[tokio::test]
async fn client_deletes_location_with_pending_order() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let order = test.order().insert_order_for_client(alice_id).await?;

    let resp = delete_location(
        State(test.into_app_state()),
        test.session.clone(),
        Path(order.location_id),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(entity::prelude::SecuritySystemOrder::find_by_id(order.id)
        .one(&test.db)
        .await?
        .is_none());

    Ok(())
}
