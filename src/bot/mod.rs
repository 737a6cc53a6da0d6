//! Discord bot integration for running drafts.
//!
//! This module connects the draft engine to Discord. The gateway client registers the
//! `/draft`, `/team`, and `/settings` slash commands, routes command and button
//! interactions into the draft registry, and restores running drafts when it
//! connects. `discord` implements the engine's notifier and identity ports over the
//! REST API, rendering engine content through `builder`.
//!
//! # Gateway Intents
//!
//! The bot only requires the `GUILDS` intent: interactions are delivered regardless of
//! intents, and member names are fetched over REST when drafts are restored.

pub mod audit;
pub mod builder;
pub mod command;
pub mod component;
pub mod discord;
pub mod handler;
pub mod start;
