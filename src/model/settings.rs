//! Per-guild draft settings.

use crate::{
    error::{draft::DraftError, AppError},
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

/// Draft settings configured with `/settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: u64,
    /// Channel drafts must be created in, unrestricted when `None`.
    pub draft_channel_id: Option<u64>,
    /// Role required for management commands, unrestricted when `None`.
    pub moderator_role_id: Option<u64>,
    /// Role mentioned in sign-up pings, no pings when `None`.
    pub player_role_id: Option<u64>,
    /// Channel receiving the `/draft` command audit log.
    pub audit_log_channel_id: Option<u64>,
}

impl GuildSettings {
    /// Converts an entity model to guild settings at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - The converted settings
    /// - `Err(AppError::InternalErr)` - A stored ID could not be parsed
    pub fn from_entity(entity: entity::guild_settings::Model) -> Result<Self, AppError> {
        Ok(Self {
            guild_id: parse_u64_from_string(entity.guild_id)?,
            draft_channel_id: parse_optional_u64(entity.draft_channel_id)?,
            moderator_role_id: parse_optional_u64(entity.moderator_role_id)?,
            player_role_id: parse_optional_u64(entity.player_role_id)?,
            audit_log_channel_id: parse_optional_u64(entity.audit_log_channel_id)?,
        })
    }

    /// Checks the invoking member's roles against the moderator role.
    ///
    /// # Returns
    /// - `Ok(())` - No moderator role configured, or the member holds it
    /// - `Err(DraftError::MissingRole)` - The member lacks the configured role
    pub fn check_moderator(&self, member_roles: &[u64]) -> Result<(), DraftError> {
        match self.moderator_role_id {
            Some(role) if !member_roles.contains(&role) => Err(DraftError::MissingRole(role)),
            _ => Ok(()),
        }
    }

    /// Settings used for guilds that never ran `/settings`.
    pub fn unconfigured(guild_id: u64) -> Self {
        Self {
            guild_id,
            ..Default::default()
        }
    }
}

/// Parameters for updating guild settings.
///
/// Merge semantics: fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateGuildSettingsParams {
    pub draft_channel_id: Option<u64>,
    pub moderator_role_id: Option<u64>,
    pub player_role_id: Option<u64>,
    pub audit_log_channel_id: Option<u64>,
}
