//! Draft factory for creating test draft entities.
//!
//! Rows are created with an empty roster, two empty teams, and no posted messages.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::{json, Value};

/// Factory for creating test drafts with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::draft::DraftFactory;
///
/// let draft = DraftFactory::new(&db, "1000")
///     .phase("Filled")
///     .required_count(2)
///     .embed_message_id(Some("555".to_string()))
///     .build()
///     .await?;
/// ```
pub struct DraftFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    host_id: String,
    scheduled_at: DateTime<Utc>,
    required_count: i32,
    phase: String,
    roster: Value,
    canceled_at: Option<DateTime<Utc>>,
    embed_message_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'a> DraftFactory<'a> {
    /// Creates a new DraftFactory with default values.
    ///
    /// Defaults:
    /// - channel_id / host_id: unique snowflakes
    /// - scheduled_at: now
    /// - required_count: `16`
    /// - phase: `"Open"`
    /// - roster: empty
    /// - canceled_at / embed_message_id: `None`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Discord guild ID owning the draft
    ///
    /// # Returns
    /// - `DraftFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            channel_id: next_snowflake(),
            host_id: next_snowflake(),
            scheduled_at: Utc::now(),
            required_count: 16,
            phase: "Open".to_string(),
            roster: json!([]),
            canceled_at: None,
            embed_message_id: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the channel the draft lives in.
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Sets the scheduled start time.
    pub fn scheduled_at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = scheduled_at;
        self
    }

    /// Sets the player count.
    pub fn required_count(mut self, required_count: i32) -> Self {
        self.required_count = required_count;
        self
    }

    /// Sets the stored phase name.
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Sets the raw roster JSON.
    pub fn roster(mut self, roster: Value) -> Self {
        self.roster = roster;
        self
    }

    /// Marks the draft canceled at the given instant.
    pub fn canceled_at(mut self, canceled_at: Option<DateTime<Utc>>) -> Self {
        self.canceled_at = canceled_at;
        self
    }

    /// Sets the posted embed message ID.
    pub fn embed_message_id(mut self, embed_message_id: Option<String>) -> Self {
        self.embed_message_id = embed_message_id;
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the draft entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::draft::Model)` - Created draft entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::draft::Model, DbErr> {
        entity::draft::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            host_id: ActiveValue::Set(self.host_id),
            scheduled_at: ActiveValue::Set(self.scheduled_at),
            location: ActiveValue::Set("Great Temple of Balthazar - AE1".to_string()),
            description: ActiveValue::Set(String::new()),
            required_count: ActiveValue::Set(self.required_count),
            open_pool: ActiveValue::Set(false),
            skip_open_ping: ActiveValue::Set(false),
            ready_wait_minutes: ActiveValue::Set(5),
            phase: ActiveValue::Set(self.phase),
            canceled_at: ActiveValue::Set(self.canceled_at),
            canceled_by: ActiveValue::Set(None),
            roster: ActiveValue::Set(self.roster),
            teams: ActiveValue::Set(json!({ "1": [], "2": [] })),
            usage_log: ActiveValue::Set(json!([])),
            ready: ActiveValue::Set(json!([])),
            ready_deadline: ActiveValue::Set(None),
            embed_message_id: ActiveValue::Set(self.embed_message_id),
            opened_message_id: ActiveValue::Set(None),
            full_message_id: ActiveValue::Set(None),
            canceled_message_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a draft with default values for the given guild.
///
/// Shorthand for `DraftFactory::new(db, guild_id).build().await`.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Discord guild ID owning the draft
///
/// # Returns
/// - `Ok(entity::draft::Model)` - Created draft entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_draft(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::draft::Model, DbErr> {
    DraftFactory::new(db, guild_id).build().await
}
