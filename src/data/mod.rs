//! Database repository layer.
//!
//! Repositories wrap SeaORM entity operations for drafts, guild settings, and player
//! stats, converting entity models into domain models at this boundary. `store` adapts
//! them to the engine's persistence ports.

pub mod draft;
pub mod guild_settings;
pub mod player;
pub mod store;

#[cfg(test)]
mod test;
