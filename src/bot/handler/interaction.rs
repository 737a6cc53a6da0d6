//! Interaction handler routing slash commands and board buttons.

use serenity::all::{CommandInteraction, Context, EditInteractionResponse, Interaction};

use crate::{
    bot::{audit, command, command::Invocation, component, handler::Handler},
    error::AppError,
    service::settings::SettingsService,
};

/// Handles an interaction, replying to the invoking member in every case.
pub async fn handle_interaction(handler: &Handler, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Command(command) => handle_command(handler, &ctx, &command).await,
        Interaction::Component(press) => {
            component::handle_component(&handler.registry, &ctx, &press).await
        }
        _ => {}
    }
}

/// Runs a slash command behind a deferred ephemeral reply.
///
/// Creating a draft posts the board before replying, so every command is deferred to
/// stay within Discord's initial response window.
async fn handle_command(handler: &Handler, ctx: &Context, command: &CommandInteraction) {
    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer /{}: {}", command.data.name, e);
        return;
    }

    let reply = match Invocation::from_command(command) {
        Ok(invocation) => {
            let result = run_command(handler, &invocation).await;
            if invocation.command == "draft" {
                audit_command(handler, ctx, &invocation).await;
            }
            result
        }
        Err(e) => Err(e),
    };

    let text = match reply {
        Ok(text) => text,
        Err(e) => e.user_message(),
    };

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(text))
        .await
    {
        tracing::error!("Failed to reply to /{}: {}", command.data.name, e);
    }
}

async fn run_command(handler: &Handler, invocation: &Invocation<'_>) -> Result<String, AppError> {
    match invocation.command {
        "draft" => command::draft::run(handler, invocation).await,
        "team" => command::team::run(handler, invocation).await,
        "player" => command::player::run(handler, invocation).await,
        "settings" => command::settings::run(handler, invocation).await,
        other => Err(AppError::BadRequest(format!("Unknown command '{}'", other))),
    }
}

async fn audit_command(handler: &Handler, ctx: &Context, invocation: &Invocation<'_>) {
    let settings = match SettingsService::new(&handler.db).get(invocation.guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                "Failed to read audit channel of guild {}: {}",
                invocation.guild_id,
                e
            );
            return;
        }
    };

    if let Some(channel_id) = settings.audit_log_channel_id {
        audit::post(&ctx.http, channel_id, invocation).await;
    }
}
