//! Converts engine message content into Discord message builders.

use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter, CreateMessage,
    EditMessage, Timestamp,
};

use crate::{
    error::{internal::InternalError, AppError},
    model::notification::{ActionButton, DraftAction, DraftBoard, MessageContent},
};

/// Builds a new channel message from engine content.
///
/// # Returns
/// - `Ok(CreateMessage)` - Message with the board embed and buttons attached
/// - `Err(AppError::InternalErr)` - Board timestamp out of Discord's range
pub fn create_message(content: &MessageContent) -> Result<CreateMessage, AppError> {
    let mut message = CreateMessage::new().content(content.text.clone());

    if let Some(board) = &content.board {
        message = message.embed(board_embed(board)?);
    }
    if !content.buttons.is_empty() {
        message = message.components(vec![action_row(&content.buttons)]);
    }

    Ok(message)
}

/// Builds an edit replacing every part of a posted message.
///
/// Embeds and components are always set, so content without a board clears them.
pub fn edit_message(content: &MessageContent) -> Result<EditMessage, AppError> {
    let embeds = match &content.board {
        Some(board) => vec![board_embed(board)?],
        None => Vec::new(),
    };
    let components = if content.buttons.is_empty() {
        Vec::new()
    } else {
        vec![action_row(&content.buttons)]
    };

    Ok(EditMessage::new()
        .content(content.text.clone())
        .embeds(embeds)
        .components(components))
}

fn board_embed(board: &DraftBoard) -> Result<CreateEmbed, AppError> {
    let mut embed = CreateEmbed::new()
        .title(board.title.clone())
        .color(board.color)
        .fields(
            board
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
        );

    if let Some(footer) = &board.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer.clone()));
    }
    if let Some(time) = board.timestamp {
        let timestamp = Timestamp::from_unix_timestamp(time.timestamp()).map_err(|e| {
            InternalError::InvalidDiscordTimestamp {
                timestamp: time.timestamp(),
                reason: e.to_string(),
            }
        })?;
        embed = embed.timestamp(timestamp);
    }

    Ok(embed)
}

fn action_row(buttons: &[ActionButton]) -> CreateActionRow {
    CreateActionRow::Buttons(
        buttons
            .iter()
            .map(|button| {
                CreateButton::new(button.action.custom_id())
                    .label(button.action.label())
                    .style(button_style(button.action))
                    .disabled(!button.enabled)
            })
            .collect(),
    )
}

fn button_style(action: DraftAction) -> ButtonStyle {
    match action {
        DraftAction::Join => ButtonStyle::Success,
        DraftAction::Leave => ButtonStyle::Danger,
        DraftAction::Ready => ButtonStyle::Primary,
    }
}
