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
        api::{ErrorDto, PageDto, PageParams, UnreadCountDto},
        chat::{ChatMessageDto, ConversationDto, SendMessageDto},
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::chat::ChatService,
    },
};

pub static CHAT_TAG: &str = "chat";

/// List the caller's conversations, most recent first
#[utoipa::path(
    get,
    path = "/api/chat",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "Latest message per partner", body = Vec<ConversationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let conversations = ChatService::new(&state.db)
        .get_conversations(&caller)
        .await?;

    Ok((StatusCode::OK, Json(conversations)))
}

#[utoipa::path(
    get,
    path = "/api/chat/unread",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "Number of unread messages", body = UnreadCountDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn count_unread_messages(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let count = ChatService::new(&state.db).count_unread(&caller).await?;

    Ok((StatusCode::OK, Json(count)))
}

/// Messages exchanged with another user; incoming messages are marked read
#[utoipa::path(
    get,
    path = "/api/chat/{user_id}",
    tag = CHAT_TAG,
    params(
        ("user_id" = i32, Path, description = "Chat partner's user id"),
        PageParams
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = PageDto<ChatMessageDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;

    let messages = ChatService::new(&state.db)
        .get_conversation(&caller, user_id, params)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

#[utoipa::path(
    post,
    path = "/api/chat/{user_id}",
    tag = CHAT_TAG,
    params(("user_id" = i32, Path, description = "Receiver's user id")),
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ChatMessageDto),
        (status = 400, description = "Empty message or sent to self", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Receiver not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(dto): Json<SendMessageDto>,
) -> Result<impl IntoResponse, Error> {
    let caller = get_user_from_session(&state, &session).await?;
    dto.validate()?;

    let message = ChatService::new(&state.db)
        .send_message(&caller, user_id, dto)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
