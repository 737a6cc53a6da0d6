//! Player win/loss repository.

use migration::OnConflict;
use sea_orm::{
    sea_query::{Expr, ExprTrait},
    ActiveValue, DatabaseConnection, DbErr, EntityTrait,
};

use crate::{error::AppError, model::player::PlayerStats};

pub struct PlayerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds one win to a player, creating their row on first result.
    pub async fn add_win(&self, discord_id: u64) -> Result<(), DbErr> {
        self.increment(discord_id, true).await
    }

    /// Adds one loss to a player, creating their row on first result.
    pub async fn add_loss(&self, discord_id: u64) -> Result<(), DbErr> {
        self.increment(discord_id, false).await
    }

    pub async fn get(&self, discord_id: u64) -> Result<Option<PlayerStats>, AppError> {
        entity::prelude::Player::find_by_id(discord_id.to_string())
            .one(self.db)
            .await?
            .map(PlayerStats::from_entity)
            .transpose()
    }

    /// Increments one counter in a single statement so concurrent results don't race.
    async fn increment(&self, discord_id: u64, is_win: bool) -> Result<(), DbErr> {
        let column = match is_win {
            true => entity::player::Column::Wins,
            false => entity::player::Column::Losses,
        };

        entity::prelude::Player::insert(entity::player::ActiveModel {
            discord_id: ActiveValue::Set(discord_id.to_string()),
            wins: ActiveValue::Set(if is_win { 1 } else { 0 }),
            losses: ActiveValue::Set(if is_win { 0 } else { 1 }),
        })
        .on_conflict(
            OnConflict::column(entity::player::Column::DiscordId)
                .value(column, Expr::col(column).add(1))
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }
}
