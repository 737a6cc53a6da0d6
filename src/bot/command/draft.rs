//! `/draft` command: creating, running, and canceling the guild's draft.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

use crate::{
    bot::{
        command::{subcommand, team_option, user_option, Invocation},
        handler::Handler,
    },
    error::AppError,
    model::draft::{CreateDraftParams, DraftEdit, MAX_READY_WAIT_MINUTES, MAX_REQUIRED_COUNT},
    service::draft::DraftService,
};

pub fn definition() -> CreateCommand {
    CreateCommand::new("draft")
        .description("Manage the draft of this server")
        .dm_permission(false)
        .add_option(
            subcommand("create", "Create a new draft")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "time",
                    "Start time as HH:mm, defaults to now",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "location",
                    "Meeting location",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "description",
                    "Extra information shown on the board",
                ))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "count",
                        "Number of players needed",
                    )
                    .min_int_value(1)
                    .max_int_value(MAX_REQUIRED_COUNT as u64),
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "open_pool",
                    "Allow picking teams from the whole roster",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "skip_ping",
                    "Do not ping the player role",
                ))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "ready_wait",
                        "Minutes players in the count have to ready up",
                    )
                    .min_int_value(1)
                    .max_int_value(MAX_READY_WAIT_MINUTES as u64),
                ),
        )
        .add_option(subcommand("cancel", "Cancel the draft"))
        .add_option(subcommand("start", "Start the draft once everyone is ready"))
        .add_option(
            subcommand("edit", "Change details of the draft")
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "host",
                    "New host",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "location",
                    "Meeting location",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "description",
                    "Extra information shown on the board",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "open_pool",
                    "Allow picking teams from the whole roster",
                )),
        )
        .add_option(
            subcommand("add", "Add a player to the draft")
                .add_sub_option(user_option("player", "Player to add")),
        )
        .add_option(
            subcommand("remove", "Remove a player from the draft")
                .add_sub_option(user_option("player", "Player to remove")),
        )
        .add_option(
            subcommand("move", "Move a player to another position")
                .add_sub_option(user_option("player", "Player to move"))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "position",
                        "New position, starting at 1",
                    )
                    .required(true)
                    .min_int_value(1),
                ),
        )
        .add_option(
            subcommand("winner", "Declare the winning team")
                .add_sub_option(team_option()),
        )
}

/// Runs a `/draft` subcommand.
///
/// Every subcommand requires the moderator role, or being the host of the running
/// draft.
///
/// # Returns
/// - `Ok(String)` - Reply for the invoking member
/// - `Err(AppError)` - Rejection to report back
pub async fn run(handler: &Handler, invocation: &Invocation<'_>) -> Result<String, AppError> {
    let service = DraftService::new(&handler.db, &handler.registry, &handler.defaults);
    let options = &invocation.options;

    service
        .authorize(invocation.guild_id, invocation.user_id, &invocation.roles)
        .await?;

    match invocation.subcommand {
        "create" => {
            let handle = service
                .create(CreateDraftParams {
                    guild_id: invocation.guild_id,
                    channel_id: invocation.channel_id,
                    host_id: invocation.user_id,
                    start_time: options.string("time").map(str::to_string),
                    location: options.string("location").map(str::to_string),
                    description: options
                        .string("description")
                        .unwrap_or_default()
                        .to_string(),
                    required_count: options.integer("count").map(clamp_u32),
                    open_pool: options.boolean("open_pool").unwrap_or(false),
                    skip_open_ping: options.boolean("skip_ping").unwrap_or(false),
                    ready_wait_minutes: options.integer("ready_wait").map(clamp_u32),
                })
                .await?;
            let id = handle.with_draft(|draft| draft.id()).await;
            Ok(format!("Draft #{} has been created", id))
        }
        "cancel" => {
            service
                .cancel(invocation.guild_id, invocation.user_id)
                .await?;
            Ok("The draft has been canceled".to_string())
        }
        "start" => {
            service.active(invocation.guild_id).await?.start().await?;
            Ok("The draft has started, good luck!".to_string())
        }
        "edit" => {
            let edit = DraftEdit {
                host_id: options.user("host").map(|user| user.id),
                location: options.string("location").map(str::to_string),
                description: options.string("description").map(str::to_string),
                open_pool: options.boolean("open_pool"),
            };
            if edit.is_empty() {
                return Err(AppError::BadRequest("Nothing to change".to_string()));
            }
            service.active(invocation.guild_id).await?.edit(edit).await?;
            Ok("The draft has been updated".to_string())
        }
        "add" => {
            let player = options.required_user("player")?;
            let added = service
                .active(invocation.guild_id)
                .await?
                .add_participant(player.id, &player.name)
                .await?;
            Ok(match added {
                true => format!("{} has been added to the draft", player.name),
                false => format!("{} is already in the draft", player.name),
            })
        }
        "remove" => {
            let player = options.required_user("player")?;
            let removed = service
                .active(invocation.guild_id)
                .await?
                .remove_participant(player.id)
                .await?;
            Ok(match removed {
                true => format!("{} has been removed from the draft", player.name),
                false => format!("{} is not in the draft", player.name),
            })
        }
        "move" => {
            let player = options.required_user("player")?;
            let position = roster_position(options.required_integer("position")?)?;
            service
                .active(invocation.guild_id)
                .await?
                .reorder_participant(player.id, position - 1)
                .await?;
            Ok(format!("{} has been moved to position {}", player.name, position))
        }
        "winner" => {
            let team = options.team()?;
            service
                .active(invocation.guild_id)
                .await?
                .declare_winner(team)
                .await?;
            Ok(format!("Team {} has been declared the winner", team))
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown subcommand '{}'",
            other
        ))),
    }
}

/// Clamps an integer option into `u32`; values past the limits fail validation later.
fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Reads a 1-based roster position.
fn roster_position(value: i64) -> Result<usize, AppError> {
    usize::try_from(value.max(1))
        .map_err(|_| AppError::BadRequest(format!("Invalid position {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_positions_and_counts() {
        assert_eq!(roster_position(0).unwrap(), 1);
        assert_eq!(roster_position(4).unwrap(), 4);
        assert_eq!(clamp_u32(-3), 0);
        assert_eq!(clamp_u32(i64::MAX), u32::MAX);
    }
}
