use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryOrder,
};

use crate::server::model::db::DropboxTokenModel;

/// Access to the single stored Dropbox OAuth token
pub struct DropboxTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DropboxTokenRepository<'a, C> {
    /// Creates a new instance of [`DropboxTokenRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self) -> Result<Option<DropboxTokenModel>, DbErr> {
        entity::prelude::DropboxToken::find()
            .order_by_asc(entity::dropbox_token::Column::Id)
            .one(self.db)
            .await
    }

    /// Replaces the stored token, inserting the row if none exists yet
    pub async fn upsert(
        &self,
        access_token: String,
        refresh_token: String,
        expires_at: NaiveDateTime,
    ) -> Result<DropboxTokenModel, DbErr> {
        let now = Utc::now().naive_utc();

        match self.get().await? {
            Some(existing) => {
                let mut token_am = existing.into_active_model();
                token_am.access_token = ActiveValue::Set(access_token);
                token_am.refresh_token = ActiveValue::Set(refresh_token);
                token_am.expires_at = ActiveValue::Set(expires_at);
                token_am.updated_at = ActiveValue::Set(now);

                token_am.update(self.db).await
            }
            None => {
                entity::dropbox_token::ActiveModel {
                    access_token: ActiveValue::Set(access_token),
                    refresh_token: ActiveValue::Set(refresh_token),
                    expires_at: ActiveValue::Set(expires_at),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }
}
