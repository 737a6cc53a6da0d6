//! Discord-backed implementations of the engine's chat and identity ports.

use async_trait::async_trait;
use serenity::{
    all::{ChannelId, CreateMessage, GuildId, MessageId, UserId},
    http::{Http, HttpError},
};
use std::{collections::HashMap, sync::Arc};

use crate::{
    bot::builder,
    engine::port::{IdentityResolver, Notifier},
    error::AppError,
    model::notification::{MessageContent, MessageRef},
};

/// Whether Discord answered that the target does not exist.
fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

/// Posts draft messages through the Discord REST API.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<MessageRef, AppError> {
        let message = builder::create_message(content)?;
        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, message)
            .await?;

        Ok(MessageRef {
            channel_id,
            message_id: sent.id.get(),
        })
    }

    async fn edit(&self, target: MessageRef, content: &MessageContent) -> Result<(), AppError> {
        let edit = builder::edit_message(content)?;

        match self
            .http
            .edit_message(
                ChannelId::new(target.channel_id),
                MessageId::new(target.message_id),
                &edit,
                vec![],
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => {
                tracing::debug!(
                    "Message {} in channel {} is gone, skipping edit",
                    target.message_id,
                    target.channel_id
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, target: MessageRef) -> Result<(), AppError> {
        match self
            .http
            .delete_message(
                ChannelId::new(target.channel_id),
                MessageId::new(target.message_id),
                None,
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, target: MessageRef) -> Result<bool, AppError> {
        match self
            .http
            .get_message(
                ChannelId::new(target.channel_id),
                MessageId::new(target.message_id),
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn direct(&self, user_id: u64, text: &str) -> Result<(), AppError> {
        UserId::new(user_id)
            .direct_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(())
    }
}

/// Resolves guild display names (nickname, then global name, then username).
pub struct DiscordIdentityResolver {
    http: Arc<Http>,
}

impl DiscordIdentityResolver {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl IdentityResolver for DiscordIdentityResolver {
    async fn resolve_display_names(
        &self,
        guild_id: u64,
        ids: &[u64],
    ) -> Result<HashMap<u64, String>, AppError> {
        let guild_id = GuildId::new(guild_id);
        let mut names = HashMap::with_capacity(ids.len());

        for &id in ids {
            match self.http.get_member(guild_id, UserId::new(id)).await {
                Ok(member) => {
                    names.insert(id, member.display_name().to_string());
                }
                // Members who left the guild keep their stored name
                Err(e) if is_not_found(&e) => {
                    tracing::debug!("Member {} is no longer in guild {}", id, guild_id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(names)
    }
}
