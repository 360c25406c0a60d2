use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{PageDto, PageParams, UnreadCountDto},
        chat::{ChatMessageDto, ConversationDto, SendMessageDto},
    },
    server::{
        data::{chat::ChatRepository, user::UserRepository},
        error::Error,
        model::{
            auth::CurrentUser,
            db::{ChatMessageModel, UserModel},
        },
        service::notification::NotificationService,
    },
};

/// Direct messages between users
pub struct ChatService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ChatService<'a> {
    /// Creates a new instance of [`ChatService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn send_message(
        &self,
        caller: &CurrentUser,
        receiver_id: i32,
        dto: SendMessageDto,
    ) -> Result<ChatMessageDto, Error> {
        if caller.id == receiver_id {
            return Err(Error::BadRequest("Cannot send a message to yourself".to_string()));
        }

        if UserRepository::new(self.db).get(receiver_id).await?.is_none() {
            return Err(Error::not_found("user", receiver_id));
        }

        let message = ChatRepository::new(self.db)
            .create(caller.id, receiver_id, dto.content)
            .await?;

        NotificationService::new(self.db)
            .notify_quietly(
                &[receiver_id],
                &format!("New message from {}", caller.username),
            )
            .await;

        Ok(message.into())
    }

    /// Messages exchanged with `other_id`, oldest first
    ///
    /// Messages the other user sent to the caller are marked read.
    pub async fn get_conversation(
        &self,
        caller: &CurrentUser,
        other_id: i32,
        params: PageParams,
    ) -> Result<PageDto<ChatMessageDto>, Error> {
        if UserRepository::new(self.db).get(other_id).await?.is_none() {
            return Err(Error::not_found("user", other_id));
        }

        let chat_repo = ChatRepository::new(self.db);
        let page = chat_repo
            .get_conversation_page(caller.id, other_id, params.page(), params.page_size())
            .await?;

        let marked = chat_repo.mark_read(other_id, caller.id).await?;
        if marked > 0 {
            tracing::debug!(user_id = caller.id, other_id, marked, "Marked chat messages read");
        }

        Ok(page.try_map(ChatMessageDto::try_from)?.into())
    }

    /// One entry per chat partner with the latest message, most recent conversation first
    pub async fn get_conversations(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<ConversationDto>, Error> {
        let chat_repo = ChatRepository::new(self.db);

        let latest_ids: Vec<i32> = chat_repo
            .get_latest_ids_by_partner(caller.id)
            .await?
            .into_values()
            .collect();
        if latest_ids.is_empty() {
            return Ok(Vec::new());
        }

        let messages = chat_repo.get_by_ids(&latest_ids).await?;
        let unread = chat_repo.count_unread_by_sender(caller.id).await?;

        let partner_ids: Vec<i32> = messages
            .iter()
            .map(|message| Self::partner_of(caller.id, message))
            .collect();
        let mut partners: HashMap<i32, UserModel> = UserRepository::new(self.db)
            .get_many(&partner_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let conversations = messages
            .into_iter()
            .filter_map(|message| {
                let partner = partners.remove(&Self::partner_of(caller.id, &message))?;

                Some(ConversationDto {
                    unread_count: unread.get(&partner.id).copied().unwrap_or(0),
                    user_id: partner.id,
                    username: partner.username,
                    last_message: message.into(),
                })
            })
            .collect();

        Ok(conversations)
    }

    fn partner_of(user_id: i32, message: &ChatMessageModel) -> i32 {
        if message.sender_id == user_id {
            message.receiver_id
        } else {
            message.sender_id
        }
    }

    pub async fn count_unread(&self, caller: &CurrentUser) -> Result<UnreadCountDto, Error> {
        let count = ChatRepository::new(self.db).count_unread(caller.id).await?;

        Ok(UnreadCountDto { count })
    }
}
