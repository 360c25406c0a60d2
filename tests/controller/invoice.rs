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
        invoice::{CreateInvoiceDto, InvoiceDto},
    },
    server::controller::invoice::{
        create_invoice, delete_invoice, get_invoice, get_invoices, mark_invoice_paid,
    },
};
use rust_decimal::Decimal;

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

fn invoice_form(order_id: i32, amount: Decimal) -> CreateInvoiceDto {
    CreateInvoiceDto {
        order_id,
        title: "Installation".to_string(),
        description: Some("Four cameras and a recorder".to_string()),
        amount,
        issued_on: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
    }
}

/// Expect staff to bill the order's client, who is notified
#[tokio::test]
async fn manager_issues_invoice() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "manager").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;

    let resp = create_invoice(
        State(test.into_app_state()),
        test.session.clone(),
        Json(invoice_form(order.id, Decimal::new(125050, 2))),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: InvoiceDto = json_body(resp).await;
    assert_eq!(invoice.client_id, alice.id);
    assert_eq!(invoice.amount, Decimal::new(125050, 2));
    assert!(!invoice.is_paid);
    assert_eq!(test.message().count_notifications(alice.id).await?, 1);

    Ok(())
}

/// Expect amounts with fractions of a cent, or not above zero, to be rejected
#[tokio::test]
async fn rejects_invalid_amounts() -> Result<(), TestError> {
    let test = setup().await?;
    log_in(&test, "manager").await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    let state = test.into_app_state();

    for amount in [Decimal::new(1005, 3), Decimal::ZERO, Decimal::new(-500, 2)] {
        let result = create_invoice(
            State(state.clone()),
            test.session.clone(),
            Json(invoice_form(order.id, amount)),
        )
        .await;

        assert_eq!(
            result.err().unwrap().into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
    assert_eq!(test.message().count_notifications(alice.id).await?, 0);

    Ok(())
}

/// Expect clients to be refused issuing invoices
#[tokio::test]
async fn client_cannot_issue_invoice() -> Result<(), TestError> {
    let test = setup().await?;
    let alice_id = log_in(&test, "alice").await?;
    let order = test.order().insert_order_for_client(alice_id).await?;

    let result = create_invoice(
        State(test.into_app_state()),
        test.session.clone(),
        Json(invoice_form(order.id, Decimal::from(100))),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    Ok(())
}

/// Expect clients to list their own invoices and get 404 for another client's
#[tokio::test]
async fn clients_see_only_their_invoices() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let bob = test.user().find_user("bob").await?;
    let alices_order = test.order().insert_order_for_client(alice.id).await?;
    let bobs_order = test.order().insert_order_for_client(bob.id).await?;
    test.order()
        .insert_invoice(alices_order.id, alice.id, Decimal::from(80))
        .await?;
    let bobs_invoice = test
        .order()
        .insert_invoice(bobs_order.id, bob.id, Decimal::from(40))
        .await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = get_invoices(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let page: PageDto<InvoiceDto> = json_body(resp).await;

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].client_id, alice.id);

    let hidden = get_invoice(State(state), test.session.clone(), Path(bobs_invoice.id)).await;
    assert_eq!(
        hidden.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

/// Expect managers to mark invoices paid and only admins to delete them
#[tokio::test]
async fn paying_and_deleting_invoices() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let order = test.order().insert_order_for_client(alice.id).await?;
    let invoice = test
        .order()
        .insert_invoice(order.id, alice.id, Decimal::from(60))
        .await?;
    let state = test.into_app_state();

    log_in(&test, "manager").await?;
    let resp = mark_invoice_paid(State(state.clone()), test.session.clone(), Path(invoice.id))
        .await
        .unwrap()
        .into_response();
    let paid: InvoiceDto = json_body(resp).await;
    assert!(paid.is_paid);

    let refused =
        delete_invoice(State(state.clone()), test.session.clone(), Path(invoice.id)).await;
    assert_eq!(
        refused.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );

    log_in(&test, "admin").await?;
    let resp = delete_invoice(State(state), test.session.clone(), Path(invoice.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    Ok(())
}
