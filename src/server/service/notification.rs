use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{PageDto, PageParams, UnreadCountDto},
        notification::NotificationDto,
        user::Role,
    },
    server::{
        data::{notification::NotificationRepository, user::UserRepository},
        error::Error,
        model::auth::CurrentUser,
        service::CrudService,
    },
};

/// In-app notifications.
///
/// Other services notify users through the `*_quietly` methods, which log failures instead of
/// failing the operation that triggered them.
pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    /// Creates a new instance of [`NotificationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn notify(&self, recipient_ids: &[i32], message: &str) -> Result<(), Error> {
        NotificationRepository::new(self.db)
            .create_many(recipient_ids, message)
            .await?;

        Ok(())
    }

    /// Notify every admin and manager
    pub async fn notify_staff(&self, message: &str) -> Result<(), Error> {
        let staff = UserRepository::new(self.db)
            .find_by_role_names(&[Role::Admin.as_str(), Role::Manager.as_str()])
            .await?;
        let staff_ids: Vec<i32> = staff.iter().map(|user| user.id).collect();

        self.notify(&staff_ids, message).await
    }

    pub async fn notify_quietly(&self, recipient_ids: &[i32], message: &str) {
        if let Err(e) = self.notify(recipient_ids, message).await {
            tracing::warn!(
                recipients = ?recipient_ids,
                "Failed to store notification: {}",
                e
            );
        }
    }

    pub async fn notify_staff_quietly(&self, message: &str) {
        if let Err(e) = self.notify_staff(message).await {
            tracing::warn!("Failed to store staff notification: {}", e);
        }
    }

    /// The caller's notifications, newest first
    pub async fn get_notifications(
        &self,
        user: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<NotificationDto>, Error> {
        let page = NotificationRepository::new(self.db)
            .get_page_for_recipient(user.id, params.page(), params.page_size())
            .await?;

        Ok(page.try_map(NotificationDto::try_from)?.into())
    }

    pub async fn count_unread(&self, user: &CurrentUser) -> Result<UnreadCountDto, Error> {
        let count = NotificationRepository::new(self.db)
            .count_unread(user.id)
            .await?;

        Ok(UnreadCountDto { count })
    }

    /// # Returns
    /// - `Ok(())` - Notification marked read
    /// - `Err(Error::NotFound)` - No notification with this id addressed to the caller
    pub async fn mark_read(&self, user: &CurrentUser, notification_id: i32) -> Result<(), Error> {
        let updated = NotificationRepository::new(self.db)
            .mark_read(notification_id, user.id)
            .await?;

        if updated == 0 {
            return Err(Error::not_found("notification", notification_id));
        }

        Ok(())
    }

    /// Returns how many notifications were unread
    pub async fn mark_all_read(&self, user: &CurrentUser) -> Result<UnreadCountDto, Error> {
        let count = NotificationRepository::new(self.db)
            .mark_all_read(user.id)
            .await?;

        Ok(UnreadCountDto { count })
    }

    /// Deletes one of the caller's notifications; other users' notifications are reported as
    /// not found
    pub async fn delete(&self, user: &CurrentUser, notification_id: i32) -> Result<(), Error> {
        let notification = NotificationRepository::new(self.db)
            .get(notification_id)
            .await?;

        match notification {
            Some(notification) if notification.recipient_id == user.id => {
                CrudService::<entity::notification::Entity, NotificationDto>::new(
                    self.db,
                    "notification",
                )
                .delete(notification_id)
                .await
            }
            _ => Err(Error::not_found("notification", notification_id)),
        }
    }
}
