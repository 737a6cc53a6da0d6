//! Player factory for creating win/loss records.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a player record with the given tallies.
///
/// # Arguments
/// - `db` - Database connection
/// - `discord_id` - Discord user ID of the player
/// - `wins` - Starting win count
/// - `losses` - Starting loss count
///
/// # Returns
/// - `Ok(entity::player::Model)` - Created player entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_player(
    db: &DatabaseConnection,
    discord_id: impl Into<String>,
    wins: i32,
    losses: i32,
) -> Result<entity::player::Model, DbErr> {
    entity::player::ActiveModel {
        discord_id: ActiveValue::Set(discord_id.into()),
        wins: ActiveValue::Set(wins),
        losses: ActiveValue::Set(losses),
    }
    .insert(db)
    .await
}
