use sea_orm::DatabaseConnection;

use crate::{data::player::PlayerRepository, error::AppError, model::player::PlayerStats};

pub struct PlayerService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlayerService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a player's win/loss record.
    ///
    /// # Arguments
    /// - `discord_id` - Discord ID of the player
    ///
    /// # Returns
    /// - `Ok(PlayerStats)` - Recorded results, all zero for players without any
    /// - `Err(AppError)` - Database error
    pub async fn stats(&self, discord_id: u64) -> Result<PlayerStats, AppError> {
        Ok(PlayerRepository::new(self.db)
            .get(discord_id)
            .await?
            .unwrap_or_else(|| PlayerStats::unplayed(discord_id)))
    }
}
