//! Transport-neutral message content produced by the engine.
//!
//! The bot layer renders these into Discord embeds and buttons; the engine only knows
//! button identities and whether they are enabled.

use chrono::{DateTime, Utc};

/// Handle to a message posted through the `Notifier` port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Button actions attached to the draft board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftAction {
    Join,
    Leave,
    Ready,
}

impl DraftAction {
    pub const ALL: [DraftAction; 3] = [DraftAction::Join, DraftAction::Leave, DraftAction::Ready];

    pub fn custom_id(&self) -> &'static str {
        match self {
            DraftAction::Join => "draft:join",
            DraftAction::Leave => "draft:leave",
            DraftAction::Ready => "draft:ready",
        }
    }

    /// Resolves a component custom ID back into an action, `None` for foreign buttons.
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.custom_id() == custom_id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftAction::Join => "Join",
            DraftAction::Leave => "Leave",
            DraftAction::Ready => "Ready",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub action: DraftAction,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Structured board rendered as an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftBoard {
    pub title: String,
    pub color: u32,
    pub fields: Vec<BoardField>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Content of one posted or edited message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    pub text: String,
    pub board: Option<DraftBoard>,
    pub buttons: Vec<ActionButton>,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}
