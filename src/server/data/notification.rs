use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{Page, Repository},
    model::db::NotificationModel,
};

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    /// Creates a new instance of [`NotificationRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::notification::Entity> {
        Repository::new(self.db)
    }

    /// Creates one unread notification per recipient
    pub async fn create_many(&self, recipient_ids: &[i32], message: &str) -> Result<(), DbErr> {
        if recipient_ids.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let notifications = recipient_ids
            .iter()
            .map(|recipient_id| entity::notification::ActiveModel {
                recipient_id: ActiveValue::Set(*recipient_id),
                message: ActiveValue::Set(message.to_string()),
                is_read: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            });

        entity::prelude::Notification::insert_many(notifications)
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn get(&self, notification_id: i32) -> Result<Option<NotificationModel>, DbErr> {
        self.base().get_by_id(notification_id).await
    }

    /// Notifications for the recipient, newest first
    pub async fn get_page_for_recipient(
        &self,
        recipient_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<Page<NotificationModel>, DbErr> {
        let select = entity::prelude::Notification::find()
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id);

        self.base()
            .get_with_pagination_filtered(select, page, page_size)
            .await
    }

    pub async fn count_unread(&self, recipient_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Notification::find()
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .filter(entity::notification::Column::IsRead.eq(false))
            .count(self.db)
            .await
    }

    /// Marks one of the recipient's notifications read, returning rows affected
    pub async fn mark_read(&self, notification_id: i32, recipient_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .col_expr(entity::notification::Column::IsRead, Expr::value(true))
            .filter(entity::notification::Column::Id.eq(notification_id))
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Marks every unread notification of the recipient read, returning rows affected
    pub async fn mark_all_read(&self, recipient_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .col_expr(entity::notification::Column::IsRead, Expr::value(true))
            .filter(entity::notification::Column::RecipientId.eq(recipient_id))
            .filter(entity::notification::Column::IsRead.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, notification_id: i32) -> Result<DeleteResult, DbErr> {
        self.base().delete(notification_id).await
    }
}
