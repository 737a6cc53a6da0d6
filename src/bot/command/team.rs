//! `/team` command: team captains and members of the running draft.

use serenity::all::CreateCommand;

use crate::{
    bot::{
        command::{subcommand, team_option, user_option, Invocation},
        handler::Handler,
    },
    error::AppError,
    service::draft::DraftService,
};

pub fn definition() -> CreateCommand {
    CreateCommand::new("team")
        .description("Manage the teams of the draft")
        .dm_permission(false)
        .add_option(
            subcommand("captain", "Make a player captain of a team")
                .add_sub_option(user_option("player", "New captain"))
                .add_sub_option(team_option()),
        )
        .add_option(
            subcommand("add", "Add a player to a team")
                .add_sub_option(user_option("player", "Player to add"))
                .add_sub_option(team_option()),
        )
        .add_option(
            subcommand("remove", "Remove a player from a team")
                .add_sub_option(user_option("player", "Player to remove"))
                .add_sub_option(team_option()),
        )
        .add_option(
            subcommand("swap", "Move a player to the other team")
                .add_sub_option(user_option("player", "Player to move")),
        )
        .add_option(
            subcommand("pick", "Pick a player for your team")
                .add_sub_option(user_option("player", "Player to pick")),
        )
        .add_option(
            subcommand("kick", "Remove a player from your team")
                .add_sub_option(user_option("player", "Player to remove")),
        )
        .add_option(subcommand("reset", "Clear both teams"))
}

/// Runs a `/team` subcommand.
///
/// `pick` and `kick` act on the invoking captain's own team; everything else requires
/// the moderator role or being the host.
pub async fn run(handler: &Handler, invocation: &Invocation<'_>) -> Result<String, AppError> {
    let service = DraftService::new(&handler.db, &handler.registry, &handler.defaults);
    let options = &invocation.options;

    if !matches!(invocation.subcommand, "pick" | "kick") {
        service
            .authorize(invocation.guild_id, invocation.user_id, &invocation.roles)
            .await?;
    }

    let handle = service.active(invocation.guild_id).await?;

    match invocation.subcommand {
        "captain" => {
            let player = options.required_user("player")?;
            let team = options.team()?;
            handle.set_team_captain(player.id, team).await?;
            Ok(format!("{} is now captain of team {}", player.name, team))
        }
        "add" => {
            let player = options.required_user("player")?;
            let team = options.team()?;
            handle.add_to_team(player.id, team).await?;
            Ok(format!("{} has been added to team {}", player.name, team))
        }
        "remove" => {
            let player = options.required_user("player")?;
            let team = options.team()?;
            handle.remove_from_team(player.id, team).await?;
            Ok(format!("{} has been removed from team {}", player.name, team))
        }
        "swap" => {
            let player = options.required_user("player")?;
            let team = handle.swap_team(player.id).await?;
            Ok(format!("{} has been moved to team {}", player.name, team))
        }
        "pick" => {
            let player = options.required_user("player")?;
            let team = handle
                .pick_for_captain(invocation.user_id, player.id)
                .await?;
            Ok(format!("{} has been picked for team {}", player.name, team))
        }
        "kick" => {
            let player = options.required_user("player")?;
            let team = handle
                .kick_for_captain(invocation.user_id, player.id)
                .await?;
            Ok(format!("{} has been removed from team {}", player.name, team))
        }
        "reset" => {
            handle.reset_teams().await?;
            Ok("Teams have been reset".to_string())
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown subcommand '{}'",
            other
        ))),
    }
}
