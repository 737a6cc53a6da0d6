//! Guild settings repository.
//!
//! One row per guild, created on the first `/settings` call.

use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::{
    error::AppError,
    model::settings::{GuildSettings, UpdateGuildSettingsParams},
};

pub struct GuildSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the settings of a guild.
    ///
    /// # Returns
    /// - `Ok(Some(GuildSettings))` - Guild has stored settings
    /// - `Ok(None)` - Guild never configured
    /// - `Err(AppError)` - Database error or unparseable stored ID
    pub async fn get(&self, guild_id: u64) -> Result<Option<GuildSettings>, AppError> {
        entity::prelude::GuildSettings::find_by_id(guild_id.to_string())
            .one(self.db)
            .await?
            .map(GuildSettings::from_entity)
            .transpose()
    }

    /// Updates the settings of a guild, creating the row if needed.
    ///
    /// Fields left as `None` in `params` keep their stored value.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `params` - Fields to change
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - Settings after the update
    /// - `Err(AppError)` - Database error
    pub async fn upsert(
        &self,
        guild_id: u64,
        params: UpdateGuildSettingsParams,
    ) -> Result<GuildSettings, AppError> {
        use entity::guild_settings::Column;

        let current = self
            .get(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::unconfigured(guild_id));

        let merged = GuildSettings {
            guild_id,
            draft_channel_id: params.draft_channel_id.or(current.draft_channel_id),
            moderator_role_id: params.moderator_role_id.or(current.moderator_role_id),
            player_role_id: params.player_role_id.or(current.player_role_id),
            audit_log_channel_id: params.audit_log_channel_id.or(current.audit_log_channel_id),
        };

        let entity = entity::prelude::GuildSettings::insert(entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            draft_channel_id: ActiveValue::Set(merged.draft_channel_id.map(|id| id.to_string())),
            moderator_role_id: ActiveValue::Set(merged.moderator_role_id.map(|id| id.to_string())),
            player_role_id: ActiveValue::Set(merged.player_role_id.map(|id| id.to_string())),
            audit_log_channel_id: ActiveValue::Set(
                merged.audit_log_channel_id.map(|id| id.to_string()),
            ),
        })
        .on_conflict(
            OnConflict::column(Column::GuildId)
                .update_columns([
                    Column::DraftChannelId,
                    Column::ModeratorRoleId,
                    Column::PlayerRoleId,
                    Column::AuditLogChannelId,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        GuildSettings::from_entity(entity)
    }
}
