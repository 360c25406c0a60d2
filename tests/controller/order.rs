use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use installdesk::{
    model::{
        api::{PageDto, PageParams},
        order::{AssignTechnicianDto, CreateOrderDto, OrderDto, OrderStatus, UpdateOrderStatusDto},
    },
    server::controller::order::{
        assign_technician, create_order, delete_order, get_order, get_orders,
        update_order_status,
    },
};

use super::*;

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_app_tables()
        .with_user("admin", ROLE_ADMIN)
        .with_user("manager", ROLE_MANAGER)
        .with_user("tech", ROLE_TECHNICIAN)
        .with_user("alice", ROLE_CLIENT)
        .with_user("bob", ROLE_CLIENT)
        .build()
        .await
}

fn order_form(location_id: i32) -> CreateOrderDto {
    CreateOrderDto {
        title: "Alarm system".to_string(),
        description: "Motion sensors on the ground floor".to_string(),
        phone_number: "+15550101".to_string(),
        requested_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        location_id,
    }
}

/// Expect a client's order to start pending and notify staff
#[tokio::test]
async fn client_places_pending_order() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let manager = test.user().find_user("manager").await?;
    let location = test.order().insert_location(alice_id).await?;

    let resp = create_order(
        State(test.into_app_state()),
        test.session.clone(),
        Json(order_form(location.id)),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: OrderDto = json_body(resp).await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.client_id, alice_id);
    assert_eq!(test.message().count_notifications(manager.id).await?, 1);

    Ok(())
}

/// Expect another client's location to be reported as not found
#[tokio::test]
async fn client_cannot_order_for_foreign_location() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "alice").await?;
    let bob = test.user().find_user("bob").await?;
    let location = test.order().insert_location(bob.id).await?;

    let result = create_order(
        State(test.into_app_state()),
        test.session.clone(),
        Json(order_form(location.id)),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect clients to list only their own orders and get 404 for others
#[tokio::test]
async fn clients_see_only_their_orders() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let bob = test.user().find_user("bob").await?;
    test.order().insert_order_for_client(alice.id).await?;
    let bobs = test.order().insert_order_for_client(bob.id).await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = get_orders(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let page: PageDto<OrderDto> = json_body(resp).await;

    assert_eq!(page.total_items, 1);
    assert!(page.items.iter().all(|order| order.client_id == alice.id));

    let hidden = get_order(State(state), test.session.clone(), Path(bobs.id)).await;
    assert_eq!(
        hidden.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect staff to assign a technician who then sees the order
#[tokio::test]
async fn assigned_technician_sees_order() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let tech = test.user().find_user("tech").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    let state = test.into_app_state();

    log_in(&test, "tech").await?;
    let before = get_order(State(state.clone()), test.session.clone(), Path(order.id)).await;
    assert_eq!(
        before.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    log_in(&test, "manager").await?;
    let resp = assign_technician(
        State(state.clone()),
        test.session.clone(),
        Path(order.id),
        Json(AssignTechnicianDto {
            technician_id: tech.id,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let assigned: OrderDto = json_body(resp).await;
    assert_eq!(assigned.technician_ids, vec![tech.id]);

    log_in(&test, "tech").await?;
    let resp = get_order(State(state), test.session.clone(), Path(order.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test.message().count_notifications(tech.id).await?, 1);

    Ok(())
}

/// Expect clients to be forbidden from changing status
#[tokio::test]
async fn status_change_is_staff_only() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let result = update_order_status(
        State(state.clone()),
        test.session.clone(),
        Path(order.id),
        Json(UpdateOrderStatusDto {
            status: OrderStatus::Completed,
        }),
    )
    .await;
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    log_in(&test, "manager").await?;
    let resp = update_order_status(
        State(state),
        test.session.clone(),
        Path(order.id),
        Json(UpdateOrderStatusDto {
            status: OrderStatus::InProgress,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let updated: OrderDto = json_body(resp).await;
    assert_eq!(updated.status, OrderStatus::InProgress);

    Ok(())
}

/// Expect a client to delete a pending order of their own
#[tokio::test]
async fn client_deletes_pending_order() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let order = test.order().insert_order_for_client(alice_id).await?;
    let state = test.into_app_state();

    let resp = delete_order(State(state.clone()), test.session.clone(), Path(order.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let gone = get_order(State(state), test.session.clone(), Path(order.id)).await;
    assert_eq!(
        gone.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}
