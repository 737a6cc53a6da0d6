use sea_orm::DatabaseConnection;

use crate::{
    data::guild_settings::GuildSettingsRepository,
    error::AppError,
    model::settings::{GuildSettings, UpdateGuildSettingsParams},
};

pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a guild's settings, falling back to the unconfigured defaults
    pub async fn get(&self, guild_id: u64) -> Result<GuildSettings, AppError> {
        let repo = GuildSettingsRepository::new(self.db);

        Ok(repo
            .get(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::unconfigured(guild_id)))
    }

    /// Updates the given fields of a guild's settings
    pub async fn update(
        &self,
        guild_id: u64,
        params: UpdateGuildSettingsParams,
    ) -> Result<GuildSettings, AppError> {
        let repo = GuildSettingsRepository::new(self.db);

        let settings = repo.upsert(guild_id, params).await?;

        tracing::info!("Updated draft settings of guild {}", guild_id);

        Ok(settings)
    }
}
