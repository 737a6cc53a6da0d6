//! Per-guild index of running drafts.
//!
//! The registry enforces at most one active draft per guild and restores drafts from the
//! store after a restart. It is constructed once at startup and shared by reference.

use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

use crate::{
    engine::{draft::Draft, port::EngineContext, runtime::DraftHandle},
    error::{draft::DraftError, AppError},
    model::{draft::DraftConfig, notification::MessageRef},
};

/// A guild whose latest active draft should be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryTarget {
    pub guild_id: u64,
    pub ping_role: Option<u64>,
}

pub struct DraftRegistry {
    drafts: RwLock<HashMap<u64, DraftHandle>>,
    /// Guilds whose draft is still being stored and posted.
    pending: Mutex<HashSet<u64>>,
    ctx: EngineContext,
}

impl DraftRegistry {
    pub fn new(ctx: EngineContext) -> Self {
        Self {
            drafts: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashSet::new()),
            ctx,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Creates, stores, and publishes a new draft for the config's guild.
    ///
    /// # Arguments
    /// - `config` - Validated draft configuration
    /// - `ping_role` - Role mentioned by milestone pings
    ///
    /// # Returns
    /// - `Ok(DraftHandle)` - Running draft with its board posted
    /// - `Err(AppError::DraftErr(AlreadyActive))` - The guild already has a live draft
    /// - `Err(AppError)` - Validation, store, or notifier failure
    pub async fn create(
        &self,
        config: DraftConfig,
        ping_role: Option<u64>,
    ) -> Result<DraftHandle, AppError> {
        let guild_id = config.guild_id;
        self.reserve(guild_id).await?;

        let result = self.launch_new(config, ping_role).await;
        let outcome = match result {
            Ok(handle) => {
                let mut drafts = self.drafts.write().await;
                if drafts.contains_key(&guild_id) {
                    drop(drafts);
                    handle.discard().await;
                    Err(DraftError::AlreadyActive.into())
                } else {
                    drafts.insert(guild_id, handle.clone());
                    Ok(handle)
                }
            }
            Err(e) => Err(e),
        };

        self.pending.lock().await.remove(&guild_id);
        outcome
    }

    /// Claims the guild for a draft being created.
    ///
    /// Store and Discord I/O run after the claim, outside the registry lock.
    async fn reserve(&self, guild_id: u64) -> Result<(), DraftError> {
        let mut pending = self.pending.lock().await;
        if pending.contains(&guild_id) || self.drafts.read().await.contains_key(&guild_id) {
            return Err(DraftError::AlreadyActive);
        }
        pending.insert(guild_id);
        Ok(())
    }

    async fn launch_new(
        &self,
        config: DraftConfig,
        ping_role: Option<u64>,
    ) -> Result<DraftHandle, AppError> {
        let mut draft = Draft::new(0, config, self.ctx.clock.now(), ping_role)?;
        let id = self.ctx.store.create(&draft.to_record()).await?;
        draft.set_id(id);

        let handle = DraftHandle::launch(draft, self.ctx.clone()).await;
        if let Err(e) = handle.publish().await {
            handle.discard().await;
            return Err(e);
        }

        tracing::info!("Created draft {} in guild {}", id, handle.guild_id());
        Ok(handle)
    }

    /// Registers an already running draft.
    pub async fn add(&self, handle: DraftHandle) -> Result<(), DraftError> {
        let mut drafts = self.drafts.write().await;
        if drafts.contains_key(&handle.guild_id()) {
            return Err(DraftError::AlreadyActive);
        }
        drafts.insert(handle.guild_id(), handle);
        Ok(())
    }

    pub async fn get(&self, guild_id: u64) -> Option<DraftHandle> {
        self.drafts.read().await.get(&guild_id).cloned()
    }

    pub async fn remove(&self, guild_id: u64) -> Option<DraftHandle> {
        self.drafts.write().await.remove(&guild_id)
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }

    /// Cancels the guild's draft and drops it from the registry.
    ///
    /// # Returns
    /// - `Ok(DraftHandle)` - The canceled draft, finishing its cleanup in the background
    /// - `Err(DraftError::NoActiveDraft)` - The guild has no running draft
    pub async fn cancel(&self, guild_id: u64, actor: u64) -> Result<DraftHandle, DraftError> {
        let handle = self.get(guild_id).await.ok_or(DraftError::NoActiveDraft)?;
        handle.cancel(actor).await?;

        let mut drafts = self.drafts.write().await;
        if drafts
            .get(&guild_id)
            .is_some_and(|current| current.same_draft(&handle))
        {
            drafts.remove(&guild_id);
        }
        tracing::info!("Canceled draft in guild {} by {}", guild_id, actor);
        Ok(handle)
    }

    /// Writes every running draft to the store.
    pub async fn flush_all(&self) {
        let handles: Vec<DraftHandle> = self.drafts.read().await.values().cloned().collect();
        for handle in handles {
            handle.flush().await;
        }
    }

    /// Restores the latest active draft of each guild.
    ///
    /// A guild is skipped when it has no active record, the record never got a board,
    /// the board message is gone or cannot be checked, or display names cannot be
    /// resolved. Skips are logged and never abort recovery of other guilds.
    ///
    /// # Returns
    /// - Number of drafts restored
    pub async fn recover(&self, targets: Vec<RecoveryTarget>) -> usize {
        let mut restored = 0;
        for target in targets {
            match self.recover_guild(target).await {
                Ok(true) => restored += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    "Skipping draft recovery for guild {}: {}",
                    target.guild_id,
                    e
                ),
            }
        }
        if restored > 0 {
            tracing::info!("Restored {} active draft(s)", restored);
        }
        restored
    }

    async fn recover_guild(&self, target: RecoveryTarget) -> Result<bool, AppError> {
        if self.get(target.guild_id).await.is_some() {
            return Ok(false);
        }

        let Some(record) = self.ctx.store.find_active_by_guild(target.guild_id).await? else {
            return Ok(false);
        };
        let Some(embed) = record.messages.embed else {
            tracing::warn!(
                "Draft {} in guild {} has no board message, not restoring",
                record.id,
                target.guild_id
            );
            return Ok(false);
        };

        let board = MessageRef {
            channel_id: record.config.channel_id,
            message_id: embed,
        };
        if !self.ctx.notifier.exists(board).await? {
            tracing::warn!(
                "Board of draft {} in guild {} was deleted, not restoring",
                record.id,
                target.guild_id
            );
            return Ok(false);
        }

        let ids: Vec<u64> = record.roster.iter().map(|e| e.id).collect();
        let names = self
            .ctx
            .identity
            .resolve_display_names(target.guild_id, &ids)
            .await?;

        let draft = Draft::from_record(record, &names, self.ctx.clock.now(), target.ping_role)?;
        let handle = DraftHandle::launch(draft, self.ctx.clone()).await;
        if self.add(handle.clone()).await.is_err() {
            handle.shutdown().await;
            return Ok(false);
        }
        handle.refresh().await;
        Ok(true)
    }
}
