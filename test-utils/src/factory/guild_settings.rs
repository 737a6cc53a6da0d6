//! Guild settings factory for creating test settings rows.

use crate::factory::helpers::next_snowflake;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating guild settings with customizable fields.
///
/// Defaults populate every channel and role with a unique snowflake.
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    draft_channel_id: Option<String>,
    moderator_role_id: Option<String>,
    player_role_id: Option<String>,
    audit_log_channel_id: Option<String>,
}

impl<'a> GuildSettingsFactory<'a> {
    /// Creates a new GuildSettingsFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Discord guild ID the settings belong to
    ///
    /// # Returns
    /// - `GuildSettingsFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            draft_channel_id: Some(next_snowflake()),
            moderator_role_id: Some(next_snowflake()),
            player_role_id: Some(next_snowflake()),
            audit_log_channel_id: Some(next_snowflake()),
        }
    }

    /// Sets the channel drafts must be created in.
    pub fn draft_channel_id(mut self, draft_channel_id: Option<String>) -> Self {
        self.draft_channel_id = draft_channel_id;
        self
    }

    /// Sets the role required for draft management commands.
    pub fn moderator_role_id(mut self, moderator_role_id: Option<String>) -> Self {
        self.moderator_role_id = moderator_role_id;
        self
    }

    /// Sets the role pinged for draft announcements.
    pub fn player_role_id(mut self, player_role_id: Option<String>) -> Self {
        self.player_role_id = player_role_id;
        self
    }

    /// Builds and inserts the settings entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created settings entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            draft_channel_id: ActiveValue::Set(self.draft_channel_id),
            moderator_role_id: ActiveValue::Set(self.moderator_role_id),
            player_role_id: ActiveValue::Set(self.player_role_id),
            audit_log_channel_id: ActiveValue::Set(self.audit_log_channel_id),
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild settings with default values.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Discord guild ID the settings belong to
///
/// # Returns
/// - `Ok(entity::guild_settings::Model)` - Created settings entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_guild_settings(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db, guild_id).build().await
}
