use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn message<'a>(&'a self) -> MessageFixtures<'a> {
        MessageFixtures { setup: self }
    }
}

pub struct MessageFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> MessageFixtures<'a> {
    pub async fn insert_notification(
        &self,
        recipient_id: i32,
        message: &str,
    ) -> Result<entity::notification::Model, TestError> {
        Ok(
            entity::prelude::Notification::insert(entity::notification::ActiveModel {
                recipient_id: ActiveValue::Set(recipient_id),
                message: ActiveValue::Set(message.to_string()),
                is_read: ActiveValue::Set(false),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert an unread chat message sent `minutes_ago` minutes in the past
    pub async fn insert_chat_message(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
        minutes_ago: i64,
    ) -> Result<entity::chat_message::Model, TestError> {
        Ok(
            entity::prelude::ChatMessage::insert(entity::chat_message::ActiveModel {
                sender_id: ActiveValue::Set(sender_id),
                receiver_id: ActiveValue::Set(receiver_id),
                content: ActiveValue::Set(content.to_string()),
                is_read: ActiveValue::Set(false),
                sent_at: ActiveValue::Set(Utc::now().naive_utc() - Duration::minutes(minutes_ago)),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Number of notifications stored for the recipient, read or not
    pub async fn count_notifications(&self, recipient_id: i32) -> Result<u64, TestError> {
        Ok(entity::prelude::Notification::find()
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .count(&self.setup.db)
            .await?)
    }
}
