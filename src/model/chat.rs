use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageDto {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub sent_at: NaiveDateTime,
}

impl From<entity::chat_message::Model> for ChatMessageDto {
    fn from(message: entity::chat_message::Model) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            is_read: message.is_read,
            sent_at: message.sent_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

/// Latest message exchanged with another user
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationDto {
    pub user_id: i32,
    pub username: String,
    pub last_message: ChatMessageDto,
    /// Messages from this user not yet read
    pub unread_count: u64,
}
