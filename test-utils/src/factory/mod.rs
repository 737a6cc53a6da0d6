//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Overview
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let draft = factory::create_draft(&db, "1000").await?;
//! let settings = factory::create_guild_settings(&db, "1000").await?;
//!
//! let canceled = factory::draft::DraftFactory::new(&db, "1000")
//!     .canceled_at(Some(Utc::now()))
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `draft` - Create draft entities
//! - `guild_settings` - Create guild settings entities
//! - `player` - Create player record entities
//! - `helpers` - Shared ID generation

pub mod draft;
pub mod guild_settings;
pub mod helpers;
pub mod player;

pub use draft::create_draft;
pub use guild_settings::create_guild_settings;
pub use player::create_player;
