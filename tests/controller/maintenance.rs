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
        maintenance::{CreateMaintenanceLogDto, MaintenanceDeviceFormDto, MaintenanceLogDto},
    },
    server::controller::maintenance::{create_log, delete_log, get_log, get_logs},
};

use super::*;

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_app_tables()
        .with_user("manager", ROLE_MANAGER)
        .with_user("tech", ROLE_TECHNICIAN)
        .with_user("other_tech", ROLE_TECHNICIAN)
        .with_user("alice", ROLE_CLIENT)
        .with_user("bob", ROLE_CLIENT)
        .build()
        .await
}

fn log_form(order_id: i32, description: &str) -> CreateMaintenanceLogDto {
    CreateMaintenanceLogDto {
        order_id,
        description: description.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
        devices: Vec::new(),
    }
}

/// Expect the assigned technician to log a visit covering an installed device
#[tokio::test]
async fn assigned_technician_logs_maintenance() -> Result<(), TestError> {
    let test = setup().await?;
    let tech_id = log_in(&test, "tech").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    test.order().assign_technician(order.id, tech_id).await?;
    let device = test.order().insert_device(order.id).await?;

    let mut form = log_form(order.id, "Replaced the siren battery");
    form.devices.push(MaintenanceDeviceFormDto {
        installed_device_id: device.id,
        notes: Some("Battery swollen".to_string()),
        require_replacement: false,
        is_fixed: true,
    });

    let resp = create_log(State(test.into_app_state()), test.session.clone(), Json(form))
        .await
        .unwrap()
        .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let log: MaintenanceLogDto = json_body(resp).await;
    assert_eq!(log.technician_id, tech_id);
    assert_eq!(log.devices.len(), 1);
    assert_eq!(test.message().count_notifications(alice.id).await?, 1);

    Ok(())
}

/// Expect an empty description to be rejected
#[tokio::test]
async fn rejects_blank_description() -> Result<(), TestError> {
    let test = setup().await?;
    let tech_id = log_in(&test, "tech").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    test.order().assign_technician(order.id, tech_id).await?;

    let result = create_log(
        State(test.into_app_state()),
        test.session.clone(),
        Json(log_form(order.id, "")),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}

/// Expect a technician not assigned to the order to be refused
#[tokio::test]
async fn unassigned_technician_cannot_log() -> Result<(), TestError> {
    let test = setup().await?;
    let tech = test.user().find_user("tech").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    test.order().assign_technician(order.id, tech.id).await?;
    log_in(&test, "other_tech").await?;

    let result = create_log(
        State(test.into_app_state()),
        test.session.clone(),
        Json(log_form(order.id, "Checked wiring")),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

/// Expect clients to see logs for their own orders only
#[tokio::test]
async fn clients_see_only_logs_for_their_orders() -> Result<(), TestError> {
    let test = setup().await?;
    let tech = test.user().find_user("tech").await?;
    let alice = test.user().find_user("alice").await?;
    let bob = test.user().find_user("bob").await?;
    let alices_order = test.order().insert_order_for_client(alice.id).await?;
    let bobs_order = test.order().insert_order_for_client(bob.id).await?;
    test.order()
        .insert_maintenance_log(alices_order.id, tech.id)
        .await?;
    let bobs_log = test
        .order()
        .insert_maintenance_log(bobs_order.id, tech.id)
        .await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = get_logs(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let page: PageDto<MaintenanceLogDto> = json_body(resp).await;

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].order_id, alices_order.id);

    let hidden = get_log(State(state), test.session.clone(), Path(bobs_log.id)).await;
    assert_eq!(
        hidden.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect only staff to delete logs
#[tokio::test]
async fn only_staff_delete_logs() -> Result<(), TestError> {
    let test = setup().await?;
    let tech_id = log_in(&test, "tech").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    let log = test.order().insert_maintenance_log(order.id, tech_id).await?;
    let state = test.into_app_state();

    let refused = delete_log(State(state.clone()), test.session.clone(), Path(log.id)).await;
    assert_eq!(
        refused.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    log_in(&test, "manager").await?;
    let resp = delete_log(State(state), test.session.clone(), Path(log.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    Ok(())
}
