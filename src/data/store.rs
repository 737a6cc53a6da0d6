//! SeaORM-backed implementations of the engine's persistence ports.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{
    data::{draft::DraftRepository, player::PlayerRepository},
    engine::port::{DraftStore, StatsRecorder},
    error::AppError,
    model::draft::DraftRecord,
};

#[derive(Clone)]
pub struct SeaOrmDraftStore {
    db: DatabaseConnection,
}

impl SeaOrmDraftStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DraftStore for SeaOrmDraftStore {
    async fn create(&self, record: &DraftRecord) -> Result<i32, AppError> {
        let created = DraftRepository::new(&self.db).create(record).await?;
        Ok(created.id)
    }

    async fn upsert_merge(&self, record: &DraftRecord) -> Result<(), AppError> {
        DraftRepository::new(&self.db).upsert(record).await
    }

    async fn get(&self, id: i32) -> Result<Option<DraftRecord>, AppError> {
        DraftRepository::new(&self.db).get_by_id(id).await
    }

    async fn find_active_by_guild(&self, guild_id: u64) -> Result<Option<DraftRecord>, AppError> {
        DraftRepository::new(&self.db)
            .find_active_by_guild(guild_id)
            .await
    }
}

#[derive(Clone)]
pub struct SeaOrmStatsRecorder {
    db: DatabaseConnection,
}

impl SeaOrmStatsRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRecorder for SeaOrmStatsRecorder {
    async fn record_win(&self, player_id: u64) -> Result<(), AppError> {
        PlayerRepository::new(&self.db).add_win(player_id).await?;
        Ok(())
    }

    async fn record_loss(&self, player_id: u64) -> Result<(), AppError> {
        PlayerRepository::new(&self.db).add_loss(player_id).await?;
        Ok(())
    }
}
