use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;

use crate::{
    bot::handler::Handler, config::Config, engine::registry::DraftRegistry, error::AppError,
};

/// Starts the Discord bot in a blocking manner
///
/// This function creates and starts the Discord bot client. It should be called from within
/// a tokio::spawn task or awaited last since it will block until the bot shuts down.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token and draft defaults
/// - `db` - Database connection for guild settings
/// - `registry` - Draft registry shared with the flush scheduler
///
/// # Returns
/// - `Ok(())` if the bot starts and runs successfully
/// - `Err(AppError)` if bot initialization or connection fails
pub async fn start_bot(
    config: &Config,
    db: DatabaseConnection,
    registry: Arc<DraftRegistry>,
) -> Result<(), AppError> {
    let intents = GatewayIntents::GUILDS;

    let handler = Handler::new(db, registry, config.draft_defaults());

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
