//! Board button presses: join, leave, and ready.

use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use std::time::Duration;

use crate::{
    engine::registry::DraftRegistry,
    error::{draft::DraftError, AppError},
    model::notification::DraftAction,
};

/// How long the ephemeral outcome of a button press stays visible.
const REPLY_LIFETIME: Duration = Duration::from_secs(5);

/// Handles a button press on a draft board.
///
/// Presses on foreign components are ignored. The outcome is replied ephemerally and
/// deleted again after a few seconds.
pub async fn handle_component(
    registry: &DraftRegistry,
    ctx: &Context,
    component: &ComponentInteraction,
) {
    let Some(action) = DraftAction::from_custom_id(&component.data.custom_id) else {
        return;
    };

    let text = match press(registry, action, component).await {
        Ok(text) => text,
        Err(e) => e.user_message(),
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        tracing::error!("Failed to reply to {} press: {}", action.label(), e);
        return;
    }

    let http = ctx.http.clone();
    let interaction = component.clone();
    tokio::spawn(async move {
        tokio::time::sleep(REPLY_LIFETIME).await;
        if let Err(e) = interaction.delete_response(&http).await {
            tracing::debug!("Failed to delete button reply: {}", e);
        }
    });
}

/// Applies a press to the guild's draft and returns the outcome text.
async fn press(
    registry: &DraftRegistry,
    action: DraftAction,
    component: &ComponentInteraction,
) -> Result<String, AppError> {
    let guild_id = component
        .guild_id
        .ok_or_else(|| AppError::BadRequest("Drafts only run in servers".to_string()))?;
    let handle = registry
        .get(guild_id.get())
        .await
        .ok_or(DraftError::NoActiveDraft)?;

    // Buttons on boards of earlier drafts stay clickable in the channel history
    let board = handle.with_draft(|draft| draft.messages().embed).await;
    if board != Some(component.message.id.get()) {
        return Err(AppError::NotFound(
            "This draft is no longer active".to_string(),
        ));
    }

    let user_id = component.user.id.get();
    let name = match &component.member {
        Some(member) => member.display_name().to_string(),
        None => component.user.display_name().to_string(),
    };

    match action {
        DraftAction::Join => {
            handle.join(user_id, &name).await?;
            Ok(format!("{} has joined the draft!", name))
        }
        DraftAction::Leave => {
            handle.leave(user_id).await?;
            Ok(format!("{} has left the draft", name))
        }
        DraftAction::Ready => match handle.toggle_ready(user_id).await? {
            true => Ok(format!("{} is ready", name)),
            false => Ok(format!("{} is no longer ready", name)),
        },
    }
}
