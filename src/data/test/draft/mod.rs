use crate::{
    data::draft::DraftRepository,
    error::{internal::InternalError, AppError},
    model::draft::{DraftConfig, DraftRecord, MessageRefs, Phase, RosterEntry, UsageEntry},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod find_active_by_guild;
mod get_by_id;
mod upsert;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap()
}

/// Builds a filled record with one team and a posted board.
fn record(guild_id: u64) -> DraftRecord {
    let roster: Vec<RosterEntry> = [(11, "Alpha"), (12, "Bravo"), (13, "Charlie")]
        .into_iter()
        .map(|(id, name)| RosterEntry {
            id,
            display_name: name.to_string(),
            joined_at: now(),
        })
        .collect();
    let usage_log = roster
        .iter()
        .map(|e| UsageEntry {
            id: e.id,
            display_name: e.display_name.clone(),
            in_draft_ms: 60_000,
            in_count_ms: 30_000,
        })
        .collect();

    DraftRecord {
        id: 0,
        config: DraftConfig {
            guild_id,
            channel_id: 200,
            host_id: 300,
            scheduled_at: now() + Duration::minutes(30),
            location: "Great Temple of Balthazar - AE1".to_string(),
            description: "Weekly draft".to_string(),
            required_count: 2,
            open_pool: false,
            skip_open_ping: true,
            ready_wait_minutes: 5,
        },
        phase: Phase::Filled,
        canceled_at: None,
        canceled_by: None,
        roster,
        teams: BTreeMap::from([(1, vec![11]), (2, vec![])]),
        usage_log,
        ready: vec![11],
        ready_deadline: Some(now() + Duration::minutes(35)),
        messages: MessageRefs {
            embed: Some(5000),
            opened: None,
            full: Some(5001),
            canceled: None,
        },
        created_at: now(),
    }
}
