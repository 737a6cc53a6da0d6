//! Draft data repository for database operations.
//!
//! Stores the durable draft record: configuration, phase, cancellation metadata, the
//! JSON-encoded roster/teams/usage/ready columns, and the IDs of posted messages.
//! Discord IDs are stored as strings.

use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::{
    error::{internal::InternalError, AppError},
    model::draft::DraftRecord,
};

pub struct DraftRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DraftRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new draft record.
    ///
    /// The record's `id` is ignored and assigned by the database.
    ///
    /// # Arguments
    /// - `record` - Draft state to insert
    ///
    /// # Returns
    /// - `Ok(DraftRecord)` - The inserted record with its assigned ID
    /// - `Err(AppError)` - Database or JSON encoding error
    pub async fn create(&self, record: &DraftRecord) -> Result<DraftRecord, AppError> {
        let mut model = active_model(record)?;
        model.id = ActiveValue::NotSet;

        let entity = model.insert(self.db).await?;

        DraftRecord::from_entity(entity)
    }

    /// Writes a full draft record, inserting it if the row does not exist.
    ///
    /// Every column except the guild and creation time is overwritten, so repeating the
    /// call with the same record is harmless.
    ///
    /// # Arguments
    /// - `record` - Latest draft state
    ///
    /// # Returns
    /// - `Ok(())` - Record written
    /// - `Err(AppError)` - Database or JSON encoding error
    pub async fn upsert(&self, record: &DraftRecord) -> Result<(), AppError> {
        use entity::draft::Column;

        entity::prelude::Draft::insert(active_model(record)?)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::ChannelId,
                        Column::HostId,
                        Column::ScheduledAt,
                        Column::Location,
                        Column::Description,
                        Column::RequiredCount,
                        Column::OpenPool,
                        Column::SkipOpenPing,
                        Column::ReadyWaitMinutes,
                        Column::Phase,
                        Column::CanceledAt,
                        Column::CanceledBy,
                        Column::Roster,
                        Column::Teams,
                        Column::UsageLog,
                        Column::Ready,
                        Column::ReadyDeadline,
                        Column::EmbedMessageId,
                        Column::OpenedMessageId,
                        Column::FullMessageId,
                        Column::CanceledMessageId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Gets a draft record by ID.
    ///
    /// # Returns
    /// - `Ok(Some(DraftRecord))` - Draft found
    /// - `Ok(None)` - No draft with that ID
    /// - `Err(AppError)` - Database error or undecodable row
    pub async fn get_by_id(&self, id: i32) -> Result<Option<DraftRecord>, AppError> {
        entity::prelude::Draft::find_by_id(id)
            .one(self.db)
            .await?
            .map(DraftRecord::from_entity)
            .transpose()
    }

    /// Gets the most recently created non-canceled draft of a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Some(DraftRecord))` - Latest active draft
    /// - `Ok(None)` - Guild has no active draft
    /// - `Err(AppError)` - Database error or undecodable row
    pub async fn find_active_by_guild(
        &self,
        guild_id: u64,
    ) -> Result<Option<DraftRecord>, AppError> {
        entity::prelude::Draft::find()
            .filter(entity::draft::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::draft::Column::CanceledAt.is_null())
            .order_by_desc(entity::draft::Column::CreatedAt)
            .order_by_desc(entity::draft::Column::Id)
            .one(self.db)
            .await?
            .map(DraftRecord::from_entity)
            .transpose()
    }
}

/// Builds the row for a draft record, encoding IDs as strings and collections as JSON.
fn active_model(record: &DraftRecord) -> Result<entity::draft::ActiveModel, AppError> {
    let config = &record.config;
    let messages = &record.messages;

    Ok(entity::draft::ActiveModel {
        id: ActiveValue::Set(record.id),
        guild_id: ActiveValue::Set(config.guild_id.to_string()),
        channel_id: ActiveValue::Set(config.channel_id.to_string()),
        host_id: ActiveValue::Set(config.host_id.to_string()),
        scheduled_at: ActiveValue::Set(config.scheduled_at),
        location: ActiveValue::Set(config.location.clone()),
        description: ActiveValue::Set(config.description.clone()),
        required_count: ActiveValue::Set(to_column("required_count", config.required_count)?),
        open_pool: ActiveValue::Set(config.open_pool),
        skip_open_ping: ActiveValue::Set(config.skip_open_ping),
        ready_wait_minutes: ActiveValue::Set(to_column(
            "ready_wait_minutes",
            config.ready_wait_minutes,
        )?),
        phase: ActiveValue::Set(record.phase.as_str().to_string()),
        canceled_at: ActiveValue::Set(record.canceled_at),
        canceled_by: ActiveValue::Set(record.canceled_by.map(|id| id.to_string())),
        roster: ActiveValue::Set(serde_json::to_value(&record.roster)?),
        teams: ActiveValue::Set(serde_json::to_value(&record.teams)?),
        usage_log: ActiveValue::Set(serde_json::to_value(&record.usage_log)?),
        ready: ActiveValue::Set(serde_json::to_value(&record.ready)?),
        ready_deadline: ActiveValue::Set(record.ready_deadline),
        embed_message_id: ActiveValue::Set(messages.embed.map(|id| id.to_string())),
        opened_message_id: ActiveValue::Set(messages.opened.map(|id| id.to_string())),
        full_message_id: ActiveValue::Set(messages.full.map(|id| id.to_string())),
        canceled_message_id: ActiveValue::Set(messages.canceled.map(|id| id.to_string())),
        created_at: ActiveValue::Set(record.created_at),
    })
}

fn to_column(field: &'static str, value: u32) -> Result<i32, InternalError> {
    i32::try_from(value).map_err(|_| InternalError::ValueOutOfRange {
        field,
        value: value as u64,
    })
}
