use chrono::Duration;
use std::collections::HashMap;

use super::*;
use crate::{
    engine::draft::{Draft, DraftEffect, Ping},
    error::draft::{DraftError, ValidationError},
    model::draft::{DraftEdit, Phase},
};

fn open_draft(count: u32) -> Draft {
    let mut draft = Draft::new(1, config(count), now(), Some(ROLE)).unwrap();
    draft.drain_effects();
    draft
}

fn join_all(draft: &mut Draft, ids: impl IntoIterator<Item = u64>) {
    for id in ids {
        draft.join(id, &format!("P{}", id), now()).unwrap();
    }
}

/// Tests that only the first `count` roster members form the count.
///
/// Expected: window is the positional prefix, players behind it cannot ready
#[test]
fn count_is_roster_prefix() {
    let mut draft = open_draft(16);
    join_all(&mut draft, 1..=20);

    assert_eq!(draft.phase(), Phase::Filled);
    assert_eq!(draft.window_ids(), (1..=16).collect::<Vec<u64>>());
    assert!(draft.in_count(16));
    assert!(!draft.in_count(17));
    assert_eq!(draft.toggle_ready(17, now()), Err(DraftError::NotInCount));
}

/// Tests the Open/Filled transitions as the roster crosses the count.
///
/// Expected: ready check armed on fill, disarmed when a player leaves
#[test]
fn fills_and_reopens_with_roster() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2]);

    let deadline = now() + Duration::minutes(5);
    assert_eq!(draft.phase(), Phase::Filled);
    assert_eq!(draft.ready_deadline(), Some(deadline));
    let effects = draft.drain_effects();
    assert!(effects.contains(&DraftEffect::ArmReadyWait(deadline)));
    assert!(effects.contains(&DraftEffect::Ping(Ping::Full { minutes: 5 })));

    draft.leave(2, now()).unwrap();

    assert_eq!(draft.phase(), Phase::Open);
    assert_eq!(draft.ready_deadline(), None);
    assert!(draft.drain_effects().contains(&DraftEffect::DisarmReadyWait));
}

/// Tests that ready toggles wait for the scheduled start.
///
/// Expected: CannotReadyYet before start, accepted after
#[test]
fn ready_waits_for_start_time() {
    let mut draft = Draft::new(1, scheduled_in(1, Duration::minutes(30)), now(), None).unwrap();
    join_all(&mut draft, [1]);

    assert_eq!(draft.phase(), Phase::Filled);
    assert_eq!(draft.toggle_ready(1, now()), Err(DraftError::CannotReadyYet));
    assert_eq!(draft.toggle_ready(1, now() + Duration::minutes(30)), Ok(true));
    assert_eq!(draft.toggle_ready(1, now() + Duration::minutes(31)), Ok(false));
}

/// Tests that the ready-check deadline requeues only non-ready players in the count.
///
/// Expected: stale player moved behind the queue, next player notified, new deadline armed
#[test]
fn ready_deadline_requeues_stale_players() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.toggle_ready(1, now()).unwrap();
    draft.drain_effects();

    let deadline = now() + Duration::minutes(5);
    assert!(draft.expire_ready_wait(deadline));

    assert_eq!(draft.roster().ids(), vec![1, 3, 2]);
    assert!(draft.is_ready(1));
    assert_eq!(draft.phase(), Phase::Filled);
    assert_eq!(draft.ready_deadline(), Some(deadline + Duration::minutes(5)));

    let effects = draft.drain_effects();
    assert!(effects.contains(&DraftEffect::NowInCount(3)));
    assert!(!effects.contains(&DraftEffect::NowInCount(2)));
}

/// Tests that an early deadline callback re-arms instead of requeueing.
///
/// Expected: nothing requeued, timer re-armed for the stored deadline
#[test]
fn early_ready_callback_rearms() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2]);
    draft.drain_effects();

    let deadline = now() + Duration::minutes(5);
    assert!(!draft.expire_ready_wait(now() + Duration::minutes(1)));

    assert_eq!(draft.roster().ids(), vec![1, 2]);
    assert_eq!(draft.drain_effects(), vec![DraftEffect::ArmReadyWait(deadline)]);
}

/// Tests that a player entering the count pushes the deadline out.
///
/// Expected: deadline becomes max(existing, now + wait)
#[test]
fn entrant_extends_ready_deadline() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.drain_effects();

    let later = now() + Duration::minutes(4);
    draft.leave(2, later).unwrap();

    assert_eq!(draft.window_ids(), vec![1, 3]);
    assert_eq!(draft.ready_deadline(), Some(later + Duration::minutes(5)));
    assert!(draft.drain_effects().contains(&DraftEffect::NowInCount(3)));
}

/// Tests that moving a player into the count notifies them.
///
/// Expected: roster reordered, mover notified
#[test]
fn reorder_into_count_notifies() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.drain_effects();

    draft.reorder_participant(3, 0, now()).unwrap();

    assert_eq!(draft.roster().ids(), vec![3, 1, 2]);
    assert!(draft.drain_effects().contains(&DraftEffect::NowInCount(3)));
    assert_eq!(
        draft.reorder_participant(9, 0, now()),
        Err(DraftError::NotInDraft)
    );
}

/// Tests that sign-ups stay closed until an hour before the start.
///
/// Expected: SignupsNotOpen, then Open with a sign-up ping
#[test]
fn signups_open_an_hour_before_start() {
    let mut draft = Draft::new(1, scheduled_in(2, Duration::hours(3)), now(), Some(ROLE)).unwrap();
    assert_eq!(draft.phase(), Phase::Scheduled);
    assert!(!draft
        .drain_effects()
        .iter()
        .any(|e| matches!(e, DraftEffect::Ping(_))));

    assert_eq!(draft.join(1, "P1", now()), Err(DraftError::SignupsNotOpen));

    let opens = now() + Duration::hours(2);
    assert!(draft.open_signups(opens));
    assert_eq!(draft.phase(), Phase::Open);
    assert!(draft
        .drain_effects()
        .contains(&DraftEffect::Ping(Ping::SignupsOpen)));
    assert_eq!(draft.join(1, "P1", opens), Ok(()));
}

/// Tests the "close to filling" ping and its suppression.
///
/// Expected: ping at count - 1, none when pings are skipped
#[test]
fn nearly_full_ping() {
    let mut draft = open_draft(3);
    join_all(&mut draft, [1, 2]);
    assert!(draft
        .drain_effects()
        .contains(&DraftEffect::Ping(Ping::NearlyFull { count: 3 })));

    let mut quiet = Draft::new(
        1,
        DraftConfig {
            skip_open_ping: true,
            ..config(3)
        },
        now(),
        Some(ROLE),
    )
    .unwrap();
    join_all(&mut quiet, [1, 2, 3]);
    assert!(!quiet
        .drain_effects()
        .iter()
        .any(|e| matches!(e, DraftEffect::Ping(_))));
}

/// Tests that re-joining keeps a single usage entry.
///
/// Expected: one roster entry and one usage entry
#[test]
fn rejoin_keeps_single_usage_entry() {
    let mut draft = open_draft(4);
    join_all(&mut draft, [1]);
    draft.leave(1, now()).unwrap();
    join_all(&mut draft, [1]);

    assert_eq!(draft.roster().len(), 1);
    assert_eq!(draft.usage().entries().len(), 1);
    assert_eq!(draft.join(1, "P1", now()), Err(DraftError::AlreadyJoined));
    assert_eq!(draft.add_participant(1, "P1", now()), Ok(false));
    assert_eq!(draft.remove_participant(7, now()), Ok(false));
    assert_eq!(draft.leave(7, now()), Err(DraftError::NotInDraft));
}

/// Tests team membership rules.
///
/// Expected: captains from the count, one team per player, removal clears teams
#[test]
fn team_membership_rules() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);

    assert_eq!(draft.set_team_captain(3, 1), Err(DraftError::NotInCount));
    assert_eq!(draft.set_team_captain(1, 9), Err(DraftError::UnknownTeam(9)));
    draft.set_team_captain(1, 1).unwrap();
    assert_eq!(draft.set_team_captain(1, 2), Err(DraftError::AlreadyCaptain));

    draft.add_to_team(2, 1).unwrap();
    assert_eq!(draft.add_to_team(2, 1), Err(DraftError::AlreadyOnTeam));
    assert_eq!(draft.add_to_team(2, 2), Err(DraftError::OnAnotherTeam));
    assert_eq!(draft.add_to_team(3, 2), Err(DraftError::NotInCount));

    assert_eq!(draft.swap_team(2), Ok(2));
    assert_eq!(draft.teams().team_of(2), Some(2));

    draft.leave(2, now()).unwrap();
    assert_eq!(draft.teams().team_of(2), None);
    assert_eq!(draft.remove_from_team(2, 2), Err(DraftError::NotOnTeam));
}

/// Tests that a new captain takes the first slot and the old one stays on the team.
///
/// Expected: members ordered new captain, previous captain
#[test]
fn new_captain_displaces_previous() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2]);

    draft.set_team_captain(1, 1).unwrap();
    draft.add_to_team(2, 1).unwrap();
    draft.set_team_captain(2, 1).unwrap();

    assert_eq!(draft.teams().members(1), &[2, 1]);
    assert_eq!(draft.teams().captain(1), Some(2));
}

/// Tests captain picks and kicks, including the open pool.
///
/// Expected: only captains pick, captains cannot kick themselves
#[test]
fn captains_pick_and_kick() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.set_team_captain(1, 1).unwrap();

    assert_eq!(draft.pick_for_captain(2, 1), Err(DraftError::NotACaptain));
    assert_eq!(draft.pick_for_captain(1, 2), Ok(1));
    assert_eq!(draft.pick_for_captain(1, 3), Err(DraftError::NotInCount));
    assert_eq!(draft.kick_for_captain(1, 1), Err(DraftError::AlreadyCaptain));
    assert_eq!(draft.kick_for_captain(1, 2), Ok(1));

    draft
        .edit(DraftEdit {
            open_pool: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(draft.pick_for_captain(1, 3), Ok(1));
}

/// Tests winner declaration and its cool-down.
///
/// Expected: one result per cool-down window, winners and losers split by team
#[test]
fn declare_winner_records_once_per_cooldown() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2]);
    draft.set_team_captain(1, 1).unwrap();
    draft.set_team_captain(2, 2).unwrap();
    draft.drain_effects();

    draft.declare_winner(1, now()).unwrap();
    assert_eq!(
        draft.drain_effects(),
        vec![DraftEffect::RecordResult {
            winners: vec![1],
            losers: vec![2],
        }]
    );

    assert_eq!(
        draft.declare_winner(2, now() + Duration::minutes(1)),
        Err(DraftError::WinnerRecentlyDeclared)
    );
    assert_eq!(draft.declare_winner(2, now() + Duration::minutes(3)), Ok(()));
}

/// Tests that start requires a full, ready count and freezes the roster.
///
/// Expected: NotFilled, NotAllReady, then Started with teams still editable
#[test]
fn start_requires_everyone_ready() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1]);
    assert_eq!(draft.start(now()), Err(DraftError::NotFilled));

    join_all(&mut draft, [2]);
    draft.toggle_ready(1, now()).unwrap();
    assert_eq!(draft.start(now()), Err(DraftError::NotAllReady(1)));

    draft.toggle_ready(2, now()).unwrap();
    draft.drain_effects();
    draft.start(now()).unwrap();

    assert_eq!(draft.phase(), Phase::Started);
    assert_eq!(draft.ready_deadline(), None);
    assert!(draft.drain_effects().contains(&DraftEffect::DisarmReadyWait));
    assert_eq!(draft.join(3, "P3", now()), Err(DraftError::AlreadyStarted));
    assert_eq!(draft.set_team_captain(1, 1), Ok(()));
}

/// Tests that cancel is terminal.
///
/// Expected: every later mutation fails with Canceled
#[test]
fn cancel_is_terminal() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2]);
    draft.drain_effects();

    let at = now() + Duration::minutes(10);
    draft.cancel(HOST, at).unwrap();

    assert_eq!(draft.phase(), Phase::Canceled);
    assert_eq!(draft.canceled_at(), Some(at));
    assert_eq!(draft.canceled_by(), Some(HOST));
    assert_eq!(draft.ready_deadline(), None);
    assert_eq!(draft.drain_effects()[0], DraftEffect::Canceled);

    assert_eq!(draft.join(3, "P3", at), Err(DraftError::Canceled));
    assert_eq!(draft.cancel(HOST, at), Err(DraftError::Canceled));
    assert_eq!(draft.reset_teams(), Err(DraftError::Canceled));
    assert!(!draft.accumulate_usage(at + Duration::minutes(1)));
    assert_eq!(draft.usage().get(1).unwrap().in_count_ms, 600_000);
}

/// Tests that edits validate the location.
///
/// Expected: blank location rejected, other fields applied
#[test]
fn edit_rejects_blank_location() {
    let mut draft = open_draft(2);

    let blank = DraftEdit {
        location: Some("  ".to_string()),
        ..Default::default()
    };
    assert_eq!(
        draft.edit(blank),
        Err(DraftError::Invalid(ValidationError::EmptyLocation))
    );

    draft
        .edit(DraftEdit {
            host_id: Some(42),
            description: Some("Bring snacks".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(draft.config().host_id, 42);
    assert_eq!(draft.config().description, "Bring snacks");
}

/// Tests rebuilding a draft from its record.
///
/// Expected: state preserved, names refreshed, stale team and ready entries pruned
#[test]
fn restores_from_record() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.set_team_captain(1, 1).unwrap();
    draft.toggle_ready(1, now()).unwrap();
    draft.messages_mut().embed = Some(55);

    let mut record = draft.to_record();
    record.teams.insert(2, vec![999]);
    record.ready.push(3);

    let names = HashMap::from([(1, "Renamed".to_string())]);
    let restored = Draft::from_record(record, &names, now(), Some(ROLE)).unwrap();

    assert_eq!(restored.phase(), Phase::Filled);
    assert_eq!(restored.roster().ids(), vec![1, 2, 3]);
    assert_eq!(restored.roster().get(1).unwrap().display_name, "Renamed");
    assert_eq!(restored.roster().get(2).unwrap().display_name, "P2");
    assert_eq!(restored.teams().members(1), &[1]);
    assert!(restored.teams().members(2).is_empty());
    assert!(restored.is_ready(1));
    assert!(!restored.is_ready(3));
    assert_eq!(restored.messages().embed, Some(55));
    assert_eq!(restored.ready_deadline(), draft.ready_deadline());
}

/// Tests that restoring a record without intervening changes reproduces it exactly.
///
/// Expected: record rebuilt from itself is unchanged
#[test]
fn record_round_trips_through_restore() {
    let mut draft = open_draft(2);
    join_all(&mut draft, [1, 2, 3]);
    draft.set_team_captain(1, 1).unwrap();
    draft.add_to_team(2, 2).unwrap();
    draft.toggle_ready(1, now()).unwrap();
    draft.accumulate_usage(now() + Duration::seconds(90));
    draft.messages_mut().embed = Some(55);
    draft.messages_mut().full = Some(56);

    let record = draft.to_record();
    let restored = Draft::from_record(record.clone(), &HashMap::new(), now(), Some(ROLE)).unwrap();

    assert_eq!(restored.to_record(), record);
}

/// Tests the upper bounds on player count and ready wait.
///
/// Expected: Err(Invalid) past either limit, Ok at the limits
#[test]
fn rejects_oversized_config() {
    use crate::model::draft::{MAX_READY_WAIT_MINUTES, MAX_REQUIRED_COUNT};

    assert_eq!(
        Draft::new(1, config(MAX_REQUIRED_COUNT + 1), now(), None).err(),
        Some(DraftError::Invalid(ValidationError::RequiredCountTooLarge(
            MAX_REQUIRED_COUNT
        )))
    );

    let mut long_wait = config(2);
    long_wait.ready_wait_minutes = MAX_READY_WAIT_MINUTES + 1;
    assert_eq!(
        Draft::new(1, long_wait, now(), None).err(),
        Some(DraftError::Invalid(ValidationError::ReadyWaitTooLong(
            MAX_READY_WAIT_MINUTES
        )))
    );

    let mut at_limits = config(MAX_REQUIRED_COUNT);
    at_limits.ready_wait_minutes = MAX_READY_WAIT_MINUTES;
    assert!(Draft::new(1, at_limits, now(), None).is_ok());
}
