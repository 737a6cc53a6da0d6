use crate::{error::AppError, util::parse::parse_u64_from_string};

/// Win/loss tallies for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub discord_id: u64,
    pub wins: i32,
    pub losses: i32,
}

impl PlayerStats {
    /// Stats of a player without any recorded result.
    pub fn unplayed(discord_id: u64) -> Self {
        Self {
            discord_id,
            wins: 0,
            losses: 0,
        }
    }

    /// Share of recorded games won, in percent; 0 without any games.
    pub fn win_rate(&self) -> f64 {
        let games = self.wins + self.losses;
        if games <= 0 {
            return 0.0;
        }
        f64::from(self.wins) * 100.0 / f64::from(games)
    }

    pub fn summary(&self) -> String {
        format!(
            "Wins: {} | Losses: {} | Win Rate: {:.2}%",
            self.wins,
            self.losses,
            self.win_rate()
        )
    }

    /// Converts an entity model to player stats at the repository boundary.
    pub fn from_entity(entity: entity::player::Model) -> Result<Self, AppError> {
        Ok(Self {
            discord_id: parse_u64_from_string(entity.discord_id)?,
            wins: entity.wins,
            losses: entity.losses,
        })
    }
}
