use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use installdesk::{
    model::{
        api::{PageDto, PageParams, UnreadCountDto},
        chat::{ChatMessageDto, ConversationDto, SendMessageDto},
    },
    server::controller::chat::{
        count_unread_messages, get_conversation, get_conversations, send_message,
    },
};

use super::*;

async fn setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_app_tables()
        .with_user("alice", ROLE_CLIENT)
        .with_user("tech", ROLE_TECHNICIAN)
        .build()
        .await
}

/// Expect a sent message to show up as unread for the receiver until opened
#[tokio::test]
async fn message_round_trip_between_users() -> Result<(), TestError> {
    let test = setup().await?;
    let alice = test.user().find_user("alice").await?;
    let tech = test.user().find_user("tech").await?;
    let state = test.into_app_state();

    log_in(&test, "alice").await?;
    let resp = send_message(
        State(state.clone()),
        test.session.clone(),
        Path(tech.id),
        Json(SendMessageDto {
            content: "When will you arrive?".to_string(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    log_in(&test, "tech").await?;
    let resp = count_unread_messages(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let unread: UnreadCountDto = json_body(resp).await;
    assert_eq!(unread.count, 1);

    let resp = get_conversations(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let conversations: Vec<ConversationDto> = json_body(resp).await;
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].user_id, alice.id);
    assert_eq!(conversations[0].unread_count, 1);

    let resp = get_conversation(
        State(state.clone()),
        test.session.clone(),
        Path(alice.id),
        Query(PageParams::default()),
    )
    .await
    .unwrap()
    .into_response();
    let messages: PageDto<ChatMessageDto> = json_body(resp).await;
    assert_eq!(messages.items.len(), 1);
    assert_eq!(messages.items[0].content, "When will you arrive?");

    let resp = count_unread_messages(State(state), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let unread: UnreadCountDto = json_body(resp).await;
    assert_eq!(unread.count, 0);

    Ok(())
}

/// Expect an empty message to fail validation
#[tokio::test]
async fn rejects_empty_message() -> Result<(), TestError> {
    let test = setup().await?;
    let tech = test.user().find_user("tech").await?;
    log_in(&test, "alice").await?;

    let result = send_message(
        State(test.into_app_state()),
        test.session.clone(),
        Path(tech.id),
        Json(SendMessageDto {
            content: String::new(),
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}
