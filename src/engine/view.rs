//! Message content for the draft board, pings, and cancellation summary.

use chrono::{DateTime, Utc};

use crate::{
    engine::draft::{Draft, Ping},
    model::{
        draft::{Phase, UsageEntry},
        notification::{ActionButton, BoardField, DraftAction, DraftBoard, MessageContent},
    },
};

/// Discord rejects message content longer than 2000 characters.
const MAX_CONTENT_LEN: usize = 1900;

/// Discord rejects embed field values longer than 1024 characters.
const MAX_FIELD_LEN: usize = 1024;

const DIVIDER: &str = "-----";

fn phase_color(phase: Phase) -> u32 {
    match phase {
        Phase::Scheduled => 0x3498db,
        Phase::Open => 0x2ecc71,
        Phase::Filled => 0xf1c40f,
        Phase::Started => 0x9b59b6,
        Phase::Canceled => 0xe74c3c,
    }
}

fn field(name: &str, value: impl Into<String>, inline: bool) -> BoardField {
    BoardField {
        name: name.to_string(),
        value: truncate(value.into(), MAX_FIELD_LEN),
        inline,
    }
}

/// Cuts free text down to `limit` characters, marking the cut with an ellipsis.
fn truncate(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let mut cut: String = text.chars().take(limit.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Joins list lines into one field value, dropping trailing lines that do not fit.
fn list_value(lines: &[String]) -> String {
    if lines.is_empty() {
        return "None".to_string();
    }

    let mut kept = lines.len();
    loop {
        let hidden = lines.len() - kept;
        let mut parts: Vec<String> = lines[..kept].to_vec();
        if hidden > 0 {
            parts.push(format!("...and {} more", hidden));
        }
        let value = parts.join("\n");
        if kept == 0 || value.chars().count() <= MAX_FIELD_LEN {
            return value;
        }
        kept -= 1;
    }
}

/// Renders the draft board with its join/leave/ready buttons.
pub fn board(draft: &Draft, now: DateTime<Utc>) -> MessageContent {
    let config = draft.config();
    let count = draft.count();
    let start = config.scheduled_at.timestamp();

    let headline = if config.scheduled_at > draft.created_at() {
        "A draft has been scheduled"
    } else {
        "A draft has been created"
    };

    let mut fields = vec![field(
        "Start Time",
        if now >= config.scheduled_at {
            format!("~~<t:{}>~~ In Progress", start)
        } else {
            format!("<t:{}>", start)
        },
        false,
    )];
    fields.push(field("Meeting Location", config.location.clone(), false));
    if !config.description.trim().is_empty() {
        fields.push(field("Description", config.description.clone(), false));
    }
    fields.push(field("Player Count", count.to_string(), false));
    fields.push(field("Host", format!("<@{}>", config.host_id), false));
    fields.push(field("\u{200b}", DIVIDER, false));

    let signups: Vec<String> = draft
        .roster()
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let divider = if i == count {
                format!("{}\n", DIVIDER)
            } else {
                String::new()
            };
            let ready = if draft.is_ready(entry.id) { "✓ " } else { "" };
            format!("{}{}. {}{}", divider, i + 1, ready, entry.display_name)
        })
        .collect();
    fields.push(field("Signups", list_value(&signups), false));

    for (team, members) in draft.teams().as_map() {
        let names: Vec<String> = members
            .iter()
            .enumerate()
            .map(|(i, id)| format!("{}. {}", i + 1, display_name(draft, *id)))
            .collect();
        fields.push(field(&format!("Team {}", team), list_value(&names), true));
    }

    let signups_live = draft.is_past_signup_time(now) && !draft.phase().is_terminal();

    MessageContent {
        text: format!("{} by <@{}>", headline, config.host_id),
        board: Some(DraftBoard {
            title: format!("Draft #{}", draft.id()),
            color: phase_color(draft.phase()),
            fields,
            footer: Some(draft.phase().as_str().to_string()),
            timestamp: Some(config.scheduled_at),
        }),
        buttons: vec![
            ActionButton {
                action: DraftAction::Ready,
                enabled: draft.can_indicate_ready(now),
            },
            ActionButton {
                action: DraftAction::Join,
                enabled: signups_live,
            },
            ActionButton {
                action: DraftAction::Leave,
                enabled: signups_live,
            },
        ],
    }
}

fn display_name(draft: &Draft, id: u64) -> String {
    draft
        .roster()
        .get(id)
        .map(|e| e.display_name.clone())
        .or_else(|| draft.usage().get(id).map(|e| e.display_name.clone()))
        .unwrap_or_else(|| format!("<@{}>", id))
}

/// Text of a role ping, suffixed with the role mention.
pub fn ping(ping: &Ping, role_id: u64) -> MessageContent {
    let text = match ping {
        Ping::SignupsOpen => "Sign-ups are open, register now!".to_string(),
        Ping::NearlyFull { count } => format!(
            "Draft is close to filling ({}/{}) Join now!",
            count.saturating_sub(1),
            count
        ),
        Ping::Full { minutes } => format!(
            "The draft has enough players to begin, please hit \"Ready\" within the next {} minutes or be moved to the back of the queue.",
            minutes
        ),
    };
    MessageContent::text(format!("{} <@&{}>", text, role_id))
}

pub fn now_in_count(ready_wait_minutes: u32) -> String {
    format!(
        "You are now in the draft count, please be ready within {} minutes",
        ready_wait_minutes
    )
}

/// Summary posted on cancellation; the only message the draft leaves behind.
pub fn cancel_summary(draft: &Draft, now: DateTime<Utc>) -> MessageContent {
    let config = draft.config();
    let actor = draft.canceled_by().unwrap_or(config.host_id);
    let elapsed_ms = (now - config.scheduled_at).num_milliseconds().max(0);

    let mut text = format!(
        "~~<@{}> has started a draft~~\n\nDraft has been canceled by <@{}> after {}",
        config.host_id,
        actor,
        format_duration(elapsed_ms)
    );

    let usage = draft.usage().entries();
    if !usage.is_empty() {
        text.push_str("\n\nThe following players joined the draft:\n");
        text.push_str(&usage_table(usage, MAX_CONTENT_LEN.saturating_sub(text.len())));
    }

    MessageContent::text(text)
}

/// Formats milliseconds as words, e.g. "1 hour 5 minutes".
pub fn format_duration(ms: i64) -> String {
    let total_minutes = ms / 60_000;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    let unit = |n: i64, word: &str| format!("{} {}{}", n, word, if n == 1 { "" } else { "s" });

    match (hours, minutes) {
        (0, 0) => "less than a minute".to_string(),
        (0, m) => unit(m, "minute"),
        (h, 0) => unit(h, "hour"),
        (h, m) => format!("{} {}", unit(h, "hour"), unit(m, "minute")),
    }
}

/// Formats milliseconds as `h:mm`.
fn clock(ms: i64) -> String {
    let total_minutes = ms.max(0) / 60_000;
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Renders the usage log as an aligned code block no longer than `limit` characters.
fn usage_table(usage: &[UsageEntry], limit: usize) -> String {
    let mut rows = vec![[
        String::new(),
        "Name".to_string(),
        "In Draft".to_string(),
        "In Count".to_string(),
        "% In Count".to_string(),
    ]];
    for (i, entry) in usage.iter().enumerate() {
        let share = if entry.in_draft_ms > 0 {
            entry.in_count_ms * 100 / entry.in_draft_ms
        } else {
            0
        };
        rows.push([
            format!("{}.", i + 1),
            entry.display_name.clone(),
            clock(entry.in_draft_ms),
            clock(entry.in_count_ms),
            format!("{}%", share),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(widths.iter())
                .map(|(cell, w)| format!("{:<width$}", cell, width = w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect();

    let mut total: usize = lines.iter().map(|l| l.len() + 1).sum::<usize>() + 6;
    let mut dropped = 0;
    while total > limit && lines.len() > 1 {
        if let Some(line) = lines.pop() {
            total -= line.len() + 1;
            dropped += 1;
        }
    }
    if dropped > 0 {
        lines.push(format!("...and {} more", dropped));
    }

    format!("```{}```", lines.join("\n"))
}
