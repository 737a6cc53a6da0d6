//! Collaborator interfaces the engine drives.
//!
//! Implementations live in `data` (SeaORM store, stats) and `bot` (Discord notifier,
//! identity resolution). Engine tests use in-memory fakes.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};

use crate::{
    engine::clock::Clock,
    error::AppError,
    model::{
        draft::DraftRecord,
        notification::{MessageContent, MessageRef},
    },
};

/// Durable store for draft records.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Inserts a new record and returns its assigned ID.
    async fn create(&self, record: &DraftRecord) -> Result<i32, AppError>;

    /// Writes every field of `record` over the stored row, inserting it if missing.
    ///
    /// Must be safe to repeat with the same or overlapping content.
    async fn upsert_merge(&self, record: &DraftRecord) -> Result<(), AppError>;

    async fn get(&self, id: i32) -> Result<Option<DraftRecord>, AppError>;

    /// Latest non-canceled record for a guild.
    async fn find_active_by_guild(&self, guild_id: u64) -> Result<Option<DraftRecord>, AppError>;
}

/// Chat surface the draft posts to.
///
/// Edit and delete are no-ops when the target no longer exists.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel_id: u64, content: &MessageContent)
        -> Result<MessageRef, AppError>;

    async fn edit(&self, target: MessageRef, content: &MessageContent) -> Result<(), AppError>;

    async fn delete(&self, target: MessageRef) -> Result<(), AppError>;

    /// Whether a previously sent message can still be found.
    async fn exists(&self, target: MessageRef) -> Result<bool, AppError>;

    /// Sends a direct message to a user.
    async fn direct(&self, user_id: u64, text: &str) -> Result<(), AppError>;
}

/// Win/loss bookkeeping.
#[async_trait]
pub trait StatsRecorder: Send + Sync {
    async fn record_win(&self, player_id: u64) -> Result<(), AppError>;

    async fn record_loss(&self, player_id: u64) -> Result<(), AppError>;
}

/// Looks up current display names when a draft is restored.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns names for the IDs it could resolve; unresolved IDs are simply absent.
    async fn resolve_display_names(
        &self,
        guild_id: u64,
        ids: &[u64],
    ) -> Result<HashMap<u64, String>, AppError>;
}

/// Debounce windows applied by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub persist_debounce: Duration,
    pub refresh_debounce: Duration,
    pub ping_debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persist_debounce: Duration::from_secs(2),
            refresh_debounce: Duration::from_secs(5),
            ping_debounce: Duration::from_secs(30),
        }
    }
}

/// Shared collaborators handed to every draft runtime.
#[derive(Clone)]
pub struct EngineContext {
    pub store: Arc<dyn DraftStore>,
    pub notifier: Arc<dyn Notifier>,
    pub stats: Arc<dyn StatsRecorder>,
    pub identity: Arc<dyn IdentityResolver>,
    pub clock: Arc<dyn Clock>,
    pub config: EngineConfig,
}
