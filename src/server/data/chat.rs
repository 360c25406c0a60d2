use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::{Page, Repository},
    model::db::ChatMessageModel,
};

pub struct ChatRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ChatRepository<'a, C> {
    /// Creates a new instance of [`ChatRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::chat_message::Entity> {
        Repository::new(self.db)
    }

    pub async fn create(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: String,
    ) -> Result<ChatMessageModel, DbErr> {
        self.base()
            .save(entity::chat_message::ActiveModel {
                sender_id: ActiveValue::Set(sender_id),
                receiver_id: ActiveValue::Set(receiver_id),
                content: ActiveValue::Set(content),
                is_read: ActiveValue::Set(false),
                sent_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await
    }

    fn between(user_id: i32, other_id: i32) -> Condition {
        Condition::any()
            .add(
                Condition::all()
                    .add(entity::chat_message::Column::SenderId.eq(user_id))
                    .add(entity::chat_message::Column::ReceiverId.eq(other_id)),
            )
            .add(
                Condition::all()
                    .add(entity::chat_message::Column::SenderId.eq(other_id))
                    .add(entity::chat_message::Column::ReceiverId.eq(user_id)),
            )
    }

    /// Messages exchanged between two users, oldest first
    pub async fn get_conversation_page(
        &self,
        user_id: i32,
        other_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<ChatMessageModel>, DbErr> {
        let select = entity::prelude::ChatMessage::find()
            .filter(Self::between(user_id, other_id))
            .order_by_asc(entity::chat_message::Column::SentAt);

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    /// Id of the latest message exchanged with each chat partner, keyed by partner id
    pub async fn get_latest_ids_by_partner(
        &self,
        user_id: i32,
    ) -> Result<HashMap<i32, i32>, DbErr> {
        let sent: Vec<(i32, i32)> = entity::prelude::ChatMessage::find()
            .select_only()
            .column(entity::chat_message::Column::ReceiverId)
            .column_as(entity::chat_message::Column::Id.max(), "latest_id")
            .filter(entity::chat_message::Column::SenderId.eq(user_id))
            .group_by(entity::chat_message::Column::ReceiverId)
            .into_tuple()
            .all(self.db)
            .await?;

        let received: Vec<(i32, i32)> = entity::prelude::ChatMessage::find()
            .select_only()
            .column(entity::chat_message::Column::SenderId)
            .column_as(entity::chat_message::Column::Id.max(), "latest_id")
            .filter(entity::chat_message::Column::ReceiverId.eq(user_id))
            .group_by(entity::chat_message::Column::SenderId)
            .into_tuple()
            .all(self.db)
            .await?;

        let mut latest: HashMap<i32, i32> = HashMap::new();
        for (partner_id, message_id) in sent.into_iter().chain(received) {
            let entry = latest.entry(partner_id).or_insert(message_id);
            *entry = (*entry).max(message_id);
        }

        Ok(latest)
    }

    /// Messages with the given ids, newest first
    pub async fn get_by_ids(&self, message_ids: &[i32]) -> Result<Vec<ChatMessageModel>, DbErr> {
        entity::prelude::ChatMessage::find()
            .filter(entity::chat_message::Column::Id.is_in(message_ids.iter().copied()))
            .order_by_desc(entity::chat_message::Column::SentAt)
            .order_by_desc(entity::chat_message::Column::Id)
            .all(self.db)
            .await
    }

    /// Unread messages to `receiver_id`, counted per sender
    pub async fn count_unread_by_sender(
        &self,
        receiver_id: i32,
    ) -> Result<HashMap<i32, u64>, DbErr> {
        let counts: Vec<(i32, i64)> = entity::prelude::ChatMessage::find()
            .select_only()
            .column(entity::chat_message::Column::SenderId)
            .column_as(entity::chat_message::Column::Id.count(), "unread")
            .filter(entity::chat_message::Column::ReceiverId.eq(receiver_id))
            .filter(entity::chat_message::Column::IsRead.eq(false))
            .group_by(entity::chat_message::Column::SenderId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(sender_id, count)| (sender_id, count.max(0) as u64))
            .collect())
    }

    pub async fn count_unread(&self, receiver_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ChatMessage::find()
            .filter(entity::chat_message::Column::ReceiverId.eq(receiver_id))
            .filter(entity::chat_message::Column::IsRead.eq(false))
            .count(self.db)
            .await
    }

    /// Marks messages from `sender_id` to `receiver_id` read, returning rows affected
    pub async fn mark_read(&self, sender_id: i32, receiver_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::ChatMessage::update_many()
            .col_expr(entity::chat_message::Column::IsRead, Expr::value(true))
            .filter(entity::chat_message::Column::SenderId.eq(sender_id))
            .filter(entity::chat_message::Column::ReceiverId.eq(receiver_id))
            .filter(entity::chat_message::Column::IsRead.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
