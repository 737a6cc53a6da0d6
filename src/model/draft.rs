//! Domain models for draft data operations.
//!
//! Defines the draft configuration, the persisted draft record, and the small value
//! types stored inside it (roster entries, usage entries, message references).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    error::{draft::ValidationError, internal::InternalError, AppError},
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

/// Default player count when a draft is created without one.
pub const DEFAULT_REQUIRED_COUNT: u32 = 16;

/// Largest player count a draft accepts.
pub const MAX_REQUIRED_COUNT: u32 = 100;

/// Longest ready-check grace period, one day.
pub const MAX_READY_WAIT_MINUTES: u32 = 1440;

/// How long before the scheduled start sign-ups open.
pub const SIGNUP_LEAD_HOURS: i64 = 1;

/// Lifecycle phase of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, sign-ups not yet open.
    Scheduled,
    /// Accepting sign-ups, count not yet reached.
    Open,
    /// Roster has reached the required count; ready checks are running.
    Filled,
    /// All players in the count readied and the draft was started.
    Started,
    /// Canceled by a moderator. Terminal.
    Canceled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Scheduled => "Scheduled",
            Phase::Open => "Open",
            Phase::Filled => "Filled",
            Phase::Started => "Started",
            Phase::Canceled => "Canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Scheduled" => Some(Phase::Scheduled),
            "Open" => Some(Phase::Open),
            "Filled" => Some(Phase::Filled),
            "Started" => Some(Phase::Started),
            "Canceled" => Some(Phase::Canceled),
            _ => None,
        }
    }

    /// Whether timers keep running for a draft in this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Started | Phase::Canceled)
    }
}

/// Configuration block of a draft.
///
/// Fixed at creation except for the fields `DraftEdit` can change.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftConfig {
    /// Discord guild owning the draft.
    pub guild_id: u64,
    /// Channel the draft board and pings are posted to.
    pub channel_id: u64,
    /// Discord ID of the host.
    pub host_id: u64,
    /// Scheduled start time.
    pub scheduled_at: DateTime<Utc>,
    /// Meeting location shown on the board.
    pub location: String,
    /// Free text shown on the board.
    pub description: String,
    /// Number of players in the count.
    pub required_count: u32,
    /// Whether teams may be picked from the whole roster instead of only the count.
    pub open_pool: bool,
    /// Suppresses all role pings for this draft.
    pub skip_open_ping: bool,
    /// Grace period for players in the count to ready up.
    pub ready_wait_minutes: u32,
}

impl DraftConfig {
    /// Validates values supplied by the command layer.
    ///
    /// # Returns
    /// - `Ok(())` - Configuration is usable
    /// - `Err(ValidationError)` - First rule that failed
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.required_count < 1 {
            return Err(ValidationError::RequiredCountTooSmall);
        }
        if self.required_count > MAX_REQUIRED_COUNT {
            return Err(ValidationError::RequiredCountTooLarge(MAX_REQUIRED_COUNT));
        }
        if self.ready_wait_minutes < 1 {
            return Err(ValidationError::ReadyWaitTooShort);
        }
        if self.ready_wait_minutes > MAX_READY_WAIT_MINUTES {
            return Err(ValidationError::ReadyWaitTooLong(MAX_READY_WAIT_MINUTES));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        Ok(())
    }

    pub fn signup_opens_at(&self) -> DateTime<Utc> {
        self.scheduled_at - Duration::hours(SIGNUP_LEAD_HOURS)
    }

    pub fn ready_wait(&self) -> Duration {
        Duration::minutes(self.ready_wait_minutes as i64)
    }
}

/// Partial update applied by `/draft edit`; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftEdit {
    pub host_id: Option<u64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub open_pool: Option<bool>,
}

impl DraftEdit {
    pub fn is_empty(&self) -> bool {
        self.host_id.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.open_pool.is_none()
    }
}

/// Signed-up participant in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u64,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Accumulated time for one participant, kept for everyone who ever joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub id: u64,
    pub display_name: String,
    /// Milliseconds spent anywhere on the roster.
    pub in_draft_ms: i64,
    /// Milliseconds spent inside the count.
    pub in_count_ms: i64,
}

/// IDs of the messages a draft posted to its channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageRefs {
    /// The draft board with the join/leave/ready buttons.
    pub embed: Option<u64>,
    /// Latest "sign-ups open" or "close to filling" ping.
    pub opened: Option<u64>,
    /// Latest "enough players" ping.
    pub full: Option<u64>,
    /// The cancellation summary, kept after cancel.
    pub canceled: Option<u64>,
}

/// Durable snapshot of a draft.
///
/// Written by the engine through the `DraftStore` port and read back during recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    /// Row ID, `0` until the record is first inserted.
    pub id: i32,
    pub config: DraftConfig,
    pub phase: Phase,
    pub canceled_at: Option<DateTime<Utc>>,
    pub canceled_by: Option<u64>,
    pub roster: Vec<RosterEntry>,
    /// Team number to member IDs, captain first.
    pub teams: BTreeMap<u8, Vec<u64>>,
    pub usage_log: Vec<UsageEntry>,
    /// Players in the count who pressed ready.
    pub ready: Vec<u64>,
    /// Absolute deadline of the pending ready check.
    pub ready_deadline: Option<DateTime<Utc>>,
    pub messages: MessageRefs,
    pub created_at: DateTime<Utc>,
}

impl DraftRecord {
    /// Converts an entity model to a draft record at the repository boundary.
    ///
    /// Parses the string-encoded Discord IDs and decodes the JSON columns.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(DraftRecord)` - The converted record
    /// - `Err(AppError::InternalErr)` - Stored ID or phase could not be parsed
    /// - `Err(AppError::JsonErr)` - A JSON column did not match the expected shape
    pub fn from_entity(entity: entity::draft::Model) -> Result<Self, AppError> {
        let phase = Phase::parse(&entity.phase).ok_or_else(|| InternalError::UnknownPhase {
            id: entity.id,
            phase: entity.phase.clone(),
        })?;

        Ok(Self {
            id: entity.id,
            config: DraftConfig {
                guild_id: parse_u64_from_string(entity.guild_id)?,
                channel_id: parse_u64_from_string(entity.channel_id)?,
                host_id: parse_u64_from_string(entity.host_id)?,
                scheduled_at: entity.scheduled_at,
                location: entity.location,
                description: entity.description,
                required_count: entity.required_count.max(0) as u32,
                open_pool: entity.open_pool,
                skip_open_ping: entity.skip_open_ping,
                ready_wait_minutes: entity.ready_wait_minutes.max(0) as u32,
            },
            phase,
            canceled_at: entity.canceled_at,
            canceled_by: parse_optional_u64(entity.canceled_by)?,
            roster: serde_json::from_value(entity.roster)?,
            teams: serde_json::from_value(entity.teams)?,
            usage_log: serde_json::from_value(entity.usage_log)?,
            ready: serde_json::from_value(entity.ready)?,
            ready_deadline: entity.ready_deadline,
            messages: MessageRefs {
                embed: parse_optional_u64(entity.embed_message_id)?,
                opened: parse_optional_u64(entity.opened_message_id)?,
                full: parse_optional_u64(entity.full_message_id)?,
                canceled: parse_optional_u64(entity.canceled_message_id)?,
            },
            created_at: entity.created_at,
        })
    }
}

/// Values filled in when `/draft create` leaves an option out.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDefaults {
    pub location: String,
    pub required_count: u32,
    pub ready_wait_minutes: u32,
    /// Offset of the community's timezone from UTC, used to read typed start times.
    pub time_offset_minutes: i32,
}

/// Parameters for creating a draft from a slash command.
///
/// Optional fields fall back to `DraftDefaults`.
#[derive(Debug, Clone, Default)]
pub struct CreateDraftParams {
    pub guild_id: u64,
    pub channel_id: u64,
    pub host_id: u64,
    /// Raw `HH:mm` start time as typed.
    pub start_time: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub required_count: Option<u32>,
    pub open_pool: bool,
    pub skip_open_ping: bool,
    pub ready_wait_minutes: Option<u32>,
}
