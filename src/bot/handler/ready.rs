//! Ready event handler for bot initialization.
//!
//! This module handles the `ready` event which is fired when the bot connects to
//! Discord's gateway and completes the initial handshake. It registers the slash
//! commands and restores the drafts that were running before the last shutdown.

use serenity::all::{Command, Context, Ready};

use crate::{
    bot::{command, handler::Handler},
    service::draft::DraftService,
};

/// Handles the ready event when the bot connects to Discord.
///
/// Drafts already running in the registry are left alone, so a reconnect that fires
/// `ready` again does not restore anything twice.
///
/// # Arguments
/// - `handler` - Event handler holding the database and draft registry
/// - `ctx` - Discord context used to register commands
/// - `ready` - Ready event data containing the bot user and its guilds
pub async fn handle_ready(handler: &Handler, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    if let Err(e) = Command::set_global_commands(&ctx.http, command::definitions()).await {
        tracing::error!("Failed to register slash commands: {}", e);
    }

    let guild_ids: Vec<u64> = ready.guilds.iter().map(|guild| guild.id.get()).collect();
    let service = DraftService::new(&handler.db, &handler.registry, &handler.defaults);
    let restored = service.recover(&guild_ids).await;

    tracing::info!(
        "Restored {} draft(s) across {} guild(s)",
        restored,
        guild_ids.len()
    );
}
