//! In-memory collaborators for engine tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{
    engine::{
        clock::TokioClock,
        port::{
            DraftStore, EngineConfig, EngineContext, IdentityResolver, Notifier, StatsRecorder,
        },
    },
    error::AppError,
    model::{
        draft::{DraftConfig, DraftRecord},
        notification::{MessageContent, MessageRef},
    },
};

mod draft;
mod runtime;

pub const GUILD: u64 = 100;
pub const CHANNEL: u64 = 200;
pub const HOST: u64 = 300;
pub const ROLE: u64 = 400;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap()
}

pub fn config(count: u32) -> DraftConfig {
    DraftConfig {
        guild_id: GUILD,
        channel_id: CHANNEL,
        host_id: HOST,
        scheduled_at: now(),
        location: "Great Temple of Balthazar - AE1".to_string(),
        description: String::new(),
        required_count: count,
        open_pool: false,
        skip_open_ping: false,
        ready_wait_minutes: 5,
    }
}

pub fn scheduled_in(count: u32, offset: Duration) -> DraftConfig {
    DraftConfig {
        scheduled_at: now() + offset,
        ..config(count)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<HashMap<i32, DraftRecord>>,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
    next_id: AtomicI32,
}

impl MemoryStore {
    pub fn record(&self, id: i32) -> Option<DraftRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn insert(&self, record: DraftRecord) -> i32 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut record = record;
        record.id = id;
        self.records.lock().unwrap().insert(id, record);
        id
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn create(&self, record: &DraftRecord) -> Result<i32, AppError> {
        Ok(self.insert(record.clone()))
    }

    async fn upsert_merge(&self, record: &DraftRecord) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::NotFound("store offline".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: i32) -> Result<Option<DraftRecord>, AppError> {
        Ok(self.record(id))
    }

    async fn find_active_by_guild(&self, guild_id: u64) -> Result<Option<DraftRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.config.guild_id == guild_id && r.canceled_at.is_none())
            .max_by_key(|r| (r.created_at, r.id))
            .cloned())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(MessageRef, MessageContent)>>,
    pub edits: Mutex<Vec<(MessageRef, MessageContent)>>,
    pub deleted: Mutex<Vec<MessageRef>>,
    pub directs: Mutex<Vec<(u64, String)>>,
    /// Message IDs reported as gone by `exists`.
    pub missing: Mutex<HashSet<u64>>,
    pub fail_exists: AtomicBool,
    /// Seconds each `send` waits before answering.
    pub send_delay_secs: AtomicU64,
    next_id: AtomicU64,
}

impl RecordingNotifier {
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.text.clone())
            .collect()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    pub fn deleted_ids(&self) -> Vec<u64> {
        self.deleted
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.message_id)
            .collect()
    }

    pub fn directed_to(&self) -> Vec<u64> {
        self.directs.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<MessageRef, AppError> {
        let delay = self.send_delay_secs.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
        }
        let target = MessageRef {
            channel_id,
            message_id: 1000 + self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        self.sent.lock().unwrap().push((target, content.clone()));
        Ok(target)
    }

    async fn edit(&self, target: MessageRef, content: &MessageContent) -> Result<(), AppError> {
        self.edits.lock().unwrap().push((target, content.clone()));
        Ok(())
    }

    async fn delete(&self, target: MessageRef) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(target);
        Ok(())
    }

    async fn exists(&self, target: MessageRef) -> Result<bool, AppError> {
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(AppError::NotFound("gateway offline".to_string()));
        }
        Ok(!self.missing.lock().unwrap().contains(&target.message_id))
    }

    async fn direct(&self, user_id: u64, text: &str) -> Result<(), AppError> {
        self.directs
            .lock()
            .unwrap()
            .push((user_id, text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStats {
    pub wins: Mutex<Vec<u64>>,
    pub losses: Mutex<Vec<u64>>,
}

#[async_trait]
impl StatsRecorder for MemoryStats {
    async fn record_win(&self, player_id: u64) -> Result<(), AppError> {
        self.wins.lock().unwrap().push(player_id);
        Ok(())
    }

    async fn record_loss(&self, player_id: u64) -> Result<(), AppError> {
        self.losses.lock().unwrap().push(player_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct StaticIdentity {
    pub names: Mutex<HashMap<u64, String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve_display_names(
        &self,
        _guild_id: u64,
        ids: &[u64],
    ) -> Result<HashMap<u64, String>, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::NotFound("member lookup failed".to_string()));
        }
        let names = self.names.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| names.get(id).map(|n| (*id, n.clone())))
            .collect())
    }
}

/// Fakes behind an `EngineContext`, kept around for assertions.
pub struct Fakes {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub stats: Arc<MemoryStats>,
    pub identity: Arc<StaticIdentity>,
}

/// Builds a context whose clock starts at `now()` and follows tokio's paused time.
pub fn context() -> (EngineContext, Fakes) {
    let fakes = Fakes {
        store: Arc::new(MemoryStore::default()),
        notifier: Arc::new(RecordingNotifier::default()),
        stats: Arc::new(MemoryStats::default()),
        identity: Arc::new(StaticIdentity::default()),
    };
    let ctx = EngineContext {
        store: fakes.store.clone(),
        notifier: fakes.notifier.clone(),
        stats: fakes.stats.clone(),
        identity: fakes.identity.clone(),
        clock: Arc::new(TokioClock::new(now())),
        config: EngineConfig::default(),
    };
    (ctx, fakes)
}

/// Lets spawned jobs run without moving paused time forward meaningfully.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
}

/// Advances paused time by whole seconds.
pub async fn advance_secs(secs: u64) {
    tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
}
