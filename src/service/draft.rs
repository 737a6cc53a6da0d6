use sea_orm::DatabaseConnection;

use crate::{
    data::guild_settings::GuildSettingsRepository,
    engine::{
        registry::{DraftRegistry, RecoveryTarget},
        runtime::DraftHandle,
    },
    error::{draft::DraftError, AppError},
    model::{
        draft::{CreateDraftParams, DraftConfig, DraftDefaults},
        settings::GuildSettings,
    },
    util::parse::parse_start_time,
};

/// Coordinates guild settings with the draft registry.
///
/// Commands go through this service for everything that needs both the stored guild
/// settings and the running draft: creation in the right channel with the right ping
/// role, moderator checks, and restoring drafts when the bot connects.
pub struct DraftService<'a> {
    db: &'a DatabaseConnection,
    registry: &'a DraftRegistry,
    defaults: &'a DraftDefaults,
}

impl<'a> DraftService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        registry: &'a DraftRegistry,
        defaults: &'a DraftDefaults,
    ) -> Self {
        Self {
            db,
            registry,
            defaults,
        }
    }

    /// Creates and posts a new draft.
    ///
    /// # Arguments
    /// - `params` - Command options; missing values are taken from the defaults
    ///
    /// # Returns
    /// - `Ok(DraftHandle)` - The running draft with its board posted
    /// - `Err(AppError::DraftErr(WrongChannel))` - Guild restricts drafts to another channel
    /// - `Err(AppError::DraftErr(Invalid))` - Start time or configuration was rejected
    /// - `Err(AppError::DraftErr(AlreadyActive))` - Guild already runs a draft
    /// - `Err(AppError)` - Database or Discord error
    pub async fn create(&self, params: CreateDraftParams) -> Result<DraftHandle, AppError> {
        let settings = self.settings(params.guild_id).await?;

        if let Some(channel_id) = settings.draft_channel_id {
            if channel_id != params.channel_id {
                return Err(DraftError::WrongChannel(channel_id).into());
            }
        }

        let now = self.registry.context().clock.now();
        let scheduled_at = parse_start_time(
            params.start_time.as_deref(),
            now,
            self.defaults.time_offset_minutes,
        )
        .map_err(DraftError::from)?;

        let config = DraftConfig {
            guild_id: params.guild_id,
            channel_id: params.channel_id,
            host_id: params.host_id,
            scheduled_at,
            location: params
                .location
                .unwrap_or_else(|| self.defaults.location.clone()),
            description: params.description,
            required_count: params
                .required_count
                .unwrap_or(self.defaults.required_count),
            open_pool: params.open_pool,
            skip_open_ping: params.skip_open_ping,
            ready_wait_minutes: params
                .ready_wait_minutes
                .unwrap_or(self.defaults.ready_wait_minutes),
        };

        self.registry.create(config, settings.player_role_id).await
    }

    /// Gets the running draft of a guild.
    ///
    /// # Returns
    /// - `Ok(DraftHandle)` - The guild's draft
    /// - `Err(AppError::DraftErr(NoActiveDraft))` - Nothing is running
    pub async fn active(&self, guild_id: u64) -> Result<DraftHandle, AppError> {
        self.registry
            .get(guild_id)
            .await
            .ok_or_else(|| DraftError::NoActiveDraft.into())
    }

    pub async fn cancel(&self, guild_id: u64, actor: u64) -> Result<(), AppError> {
        self.registry.cancel(guild_id, actor).await?;
        Ok(())
    }

    /// Checks that a member may run draft management commands.
    ///
    /// Members holding the configured moderator role pass, as does the host of the
    /// guild's running draft. Without a configured role everyone passes.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the command was used in
    /// - `user_id` - Invoking member
    /// - `member_roles` - Role IDs of the invoking member
    ///
    /// # Returns
    /// - `Ok(())` - Member may manage drafts
    /// - `Err(AppError::DraftErr(MissingRole))` - Member lacks the moderator role
    pub async fn authorize(
        &self,
        guild_id: u64,
        user_id: u64,
        member_roles: &[u64],
    ) -> Result<(), AppError> {
        let settings = self.settings(guild_id).await?;
        let Err(denied) = settings.check_moderator(member_roles) else {
            return Ok(());
        };

        if let Some(handle) = self.registry.get(guild_id).await {
            if handle.config().await.host_id == user_id {
                return Ok(());
            }
        }

        Err(denied.into())
    }

    /// Restores the running draft of each guild after the bot connects.
    ///
    /// A guild whose settings cannot be read is restored without a ping role.
    ///
    /// # Returns
    /// - Number of drafts restored
    pub async fn recover(&self, guild_ids: &[u64]) -> usize {
        let mut targets = Vec::with_capacity(guild_ids.len());
        for &guild_id in guild_ids {
            let ping_role = match self.settings(guild_id).await {
                Ok(settings) => settings.player_role_id,
                Err(e) => {
                    tracing::warn!("Failed to read settings of guild {}: {}", guild_id, e);
                    None
                }
            };
            targets.push(RecoveryTarget {
                guild_id,
                ping_role,
            });
        }

        self.registry.recover(targets).await
    }

    async fn settings(&self, guild_id: u64) -> Result<GuildSettings, AppError> {
        Ok(GuildSettingsRepository::new(self.db)
            .get(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::unconfigured(guild_id)))
    }
}
