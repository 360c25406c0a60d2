use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use installdesk::{
    model::{
        api::{PageDto, PageParams, UnreadCountDto},
        notification::NotificationDto,
    },
    server::controller::notification::{
        count_unread_notifications, delete_notification, get_notifications,
        mark_all_notifications_read, mark_notification_read,
    },
};

use super::*;

/// Expect unread counts to drop as notifications are read
#[tokio::test]
async fn reads_notifications() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("alice", ROLE_CLIENT)
        .build()
        .await?;
    let alice_id = log_in(&test, "alice").await?;
    let first = test.message().insert_notification(alice_id, "Order placed").await?;
    test.message().insert_notification(alice_id, "Invoice issued").await?;
    test.message().insert_notification(alice_id, "Order completed").await?;
    let state = test.into_app_state();

    let resp = get_notifications(
        State(state.clone()),
        test.session.clone(),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let page: PageDto<NotificationDto> = json_body(resp).await;
    assert_eq!(page.total_items, 3);

    let resp = mark_notification_read(State(state.clone()), test.session.clone(), Path(first.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = count_unread_notifications(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let unread: UnreadCountDto = json_body(resp).await;
    assert_eq!(unread.count, 2);

    let resp = mark_all_notifications_read(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let marked: UnreadCountDto = json_body(resp).await;
    assert_eq!(marked.count, 2);

    let resp = count_unread_notifications(State(state), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let unread: UnreadCountDto = json_body(resp).await;
    assert_eq!(unread.count, 0);

    Ok(())
}

/// Expect another user's notification to be reported as not found
#[tokio::test]
async fn cannot_touch_foreign_notification() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_app_tables()
        .with_user("alice", ROLE_CLIENT)
        .with_user("bob", ROLE_CLIENT)
        .build()
        .await?;
    let bob = test.user().find_user("bob").await?;
    let bobs = test.message().insert_notification(bob.id, "Private").await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let read =
        mark_notification_read(State(state.clone()), test.session.clone(), Path(bobs.id)).await;
    let delete =
        delete_notification(State(state.clone()), test.session.clone(), Path(bobs.id)).await;

    assert_eq!(
        read.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        delete.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    log_in(&test, "bob").await?;
    let resp = delete_notification(State(state), test.session.clone(), Path(bobs.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    Ok(())
}
