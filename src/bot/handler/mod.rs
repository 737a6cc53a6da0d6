use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Interaction, Ready};
use serenity::async_trait;
use std::sync::Arc;

use crate::{engine::registry::DraftRegistry, model::draft::DraftDefaults};

pub mod interaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub registry: Arc<DraftRegistry>,
    pub defaults: DraftDefaults,
}

impl Handler {
    pub fn new(
        db: DatabaseConnection,
        registry: Arc<DraftRegistry>,
        defaults: DraftDefaults,
    ) -> Self {
        Self {
            db,
            registry,
            defaults,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(self, ctx, ready).await;
    }

    /// Called when a slash command is used or a board button is pressed
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(self, ctx, interaction).await;
    }
}
