//! `/player` command: a member's own draft results.

use serenity::all::CreateCommand;

use crate::{
    bot::{
        command::{subcommand, Invocation},
        handler::Handler,
    },
    error::AppError,
    service::player::PlayerService,
};

pub fn definition() -> CreateCommand {
    CreateCommand::new("player")
        .description("Player information")
        .dm_permission(false)
        .add_option(subcommand("stats", "View your stats"))
}

pub async fn run(handler: &Handler, invocation: &Invocation<'_>) -> Result<String, AppError> {
    match invocation.subcommand {
        "stats" => {
            let stats = PlayerService::new(&handler.db)
                .stats(invocation.user_id)
                .await?;
            Ok(stats.summary())
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown subcommand '{}'",
            other
        ))),
    }
}
