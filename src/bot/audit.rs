//! Audit log of `/draft` commands.

use serenity::{
    all::{ChannelId, CreateMessage},
    http::Http,
};
use std::sync::Arc;

use crate::bot::command::Invocation;

/// Formats one audit entry as a code block.
pub fn entry(invocation: &Invocation<'_>) -> String {
    let mut command = format!("/{}", invocation.command);
    if !invocation.subcommand.is_empty() {
        command.push(' ');
        command.push_str(invocation.subcommand);
    }

    format_entry(
        &command,
        &invocation.display_name,
        invocation.user_id,
        &invocation.options.describe(),
    )
}

fn format_entry(
    command: &str,
    executor: &str,
    executor_id: u64,
    params: &[(String, String)],
) -> String {
    let mut text = format!(
        "```\nCommand: {}\nExecutor: {} ({})\n",
        command, executor, executor_id
    );
    if params.is_empty() {
        text.push_str("Parameters: none\n");
    } else {
        text.push_str("Parameters:\n");
        for (name, value) in params {
            // Keep user input from closing the code block early
            text.push_str(&format!("  {}: {}\n", name, value.replace("```", "'''")));
        }
    }
    text.push_str("```");
    text
}

/// Posts an audit entry, logging failures instead of returning them.
pub async fn post(http: &Arc<Http>, channel_id: u64, invocation: &Invocation<'_>) {
    let message = CreateMessage::new().content(entry(invocation));

    if let Err(e) = ChannelId::new(channel_id).send_message(http, message).await {
        tracing::warn!(
            "Failed to post audit log to channel {} in guild {}: {}",
            channel_id,
            invocation.guild_id,
            e
        );
    }
}
