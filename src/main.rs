mod bot;
mod config;
mod data;
mod engine;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;

use serenity::http::Http;
use std::sync::Arc;

use crate::{
    bot::discord::{DiscordIdentityResolver, DiscordNotifier},
    config::Config,
    data::store::{SeaOrmDraftStore, SeaOrmStatsRecorder},
    engine::{clock::SystemClock, port::EngineContext, registry::DraftRegistry},
    error::AppError,
    scheduler::draft_flush,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    startup::init_tracing();

    let db = startup::connect_to_database(&config).await?;

    // REST client for draft messages, separate from the gateway client's own
    let discord_http = Arc::new(Http::new(&config.discord_bot_token));

    let registry = Arc::new(DraftRegistry::new(EngineContext {
        store: Arc::new(SeaOrmDraftStore::new(db.clone())),
        notifier: Arc::new(DiscordNotifier::new(discord_http.clone())),
        stats: Arc::new(SeaOrmStatsRecorder::new(db.clone())),
        identity: Arc::new(DiscordIdentityResolver::new(discord_http)),
        clock: Arc::new(SystemClock),
        config: config.engine_config(),
    }));

    let scheduler_registry = registry.clone();
    let flush_interval = config.flush_interval_minutes;
    tokio::spawn(async move {
        if let Err(e) = draft_flush::start_scheduler(scheduler_registry, flush_interval).await {
            tracing::error!("Draft flush scheduler error: {}", e);
        }
    });

    let bot_result = bot::start::start_bot(&config, db, registry.clone()).await;

    // Persist whatever the debounced writes had not reached yet
    registry.flush_all().await;

    bot_result
}
