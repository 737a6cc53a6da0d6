//! `/settings` command: per-guild draft channel and roles.

use serenity::all::{ChannelType, CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

use crate::{
    bot::{command::Invocation, handler::Handler},
    error::AppError,
    model::settings::{GuildSettings, UpdateGuildSettingsParams},
    service::settings::SettingsService,
};

pub fn definition() -> CreateCommand {
    CreateCommand::new("settings")
        .description("Configure drafts for this server")
        .dm_permission(false)
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                "draft_channel",
                "Channel drafts must be created in",
            )
            .channel_types(vec![ChannelType::Text]),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::Role,
            "moderator_role",
            "Role allowed to manage drafts",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Role,
            "player_role",
            "Role pinged when sign-ups open or the draft fills",
        ))
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                "audit_channel",
                "Channel receiving a log of draft commands",
            )
            .channel_types(vec![ChannelType::Text]),
        )
}

/// Updates the supplied settings and replies with the resulting configuration.
pub async fn run(handler: &Handler, invocation: &Invocation<'_>) -> Result<String, AppError> {
    let service = SettingsService::new(&handler.db);
    let options = &invocation.options;

    let params = UpdateGuildSettingsParams {
        draft_channel_id: options.channel("draft_channel"),
        moderator_role_id: options.role("moderator_role"),
        player_role_id: options.role("player_role"),
        audit_log_channel_id: options.channel("audit_channel"),
    };

    let settings = if params.draft_channel_id.is_none()
        && params.moderator_role_id.is_none()
        && params.player_role_id.is_none()
        && params.audit_log_channel_id.is_none()
    {
        service.get(invocation.guild_id).await?
    } else {
        service.update(invocation.guild_id, params).await?
    };

    Ok(summary(&settings))
}

fn summary(settings: &GuildSettings) -> String {
    let channel = |id: Option<u64>| id.map_or("not set".to_string(), |id| format!("<#{}>", id));
    let role = |id: Option<u64>| id.map_or("not set".to_string(), |id| format!("<@&{}>", id));

    format!(
        "Draft channel: {}\nModerator role: {}\nPlayer role: {}\nAudit log: {}",
        channel(settings.draft_channel_id),
        role(settings.moderator_role_id),
        role(settings.player_role_id),
        channel(settings.audit_log_channel_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_settings() {
        let settings = GuildSettings {
            draft_channel_id: Some(5),
            player_role_id: Some(7),
            ..GuildSettings::unconfigured(1)
        };

        assert_eq!(
            summary(&settings),
            "Draft channel: <#5>\nModerator role: not set\nPlayer role: <@&7>\nAudit log: not set"
        );
    }
}
