use std::sync::atomic::Ordering;

use super::*;
use crate::{
    engine::registry::DraftRegistry, error::draft::DraftError, model::draft::Phase,
};

async fn join_all(handle: &crate::engine::runtime::DraftHandle, ids: impl IntoIterator<Item = u64>) {
    for id in ids {
        handle.join(id, &format!("P{}", id)).await.unwrap();
    }
}

/// Tests that a burst of changes produces one store write.
///
/// Expected: no write before the debounce window ends, exactly one after
#[tokio::test(start_paused = true)]
async fn persistence_coalesces_bursts() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(16), Some(ROLE)).await.unwrap();

    join_all(&handle, 1..=5).await;
    assert_eq!(fakes.store.writes(), 0);

    advance_secs(3).await;

    assert_eq!(fakes.store.writes(), 1);
    let stored = fakes.store.record(handle.snapshot().await.id).unwrap();
    assert_eq!(stored.roster.len(), 5);
    assert!(stored.messages.embed.is_some());
}

/// Tests that board refreshes inside the window collapse into one trailing edit.
///
/// Expected: one edit showing the latest roster
#[tokio::test(start_paused = true)]
async fn board_refresh_trails_bursts() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(16), Some(ROLE)).await.unwrap();
    settle().await;
    let before = fakes.notifier.edit_count();

    join_all(&handle, 1..=3).await;
    settle().await;
    assert_eq!(fakes.notifier.edit_count(), before);

    advance_secs(6).await;

    let edits = fakes.notifier.edits.lock().unwrap();
    assert_eq!(edits.len(), before + 1);
    let board = edits.last().unwrap().1.board.clone().unwrap();
    let signups = board.fields.iter().find(|f| f.name == "Signups").unwrap();
    assert_eq!(signups.value, "1. P1\n2. P2\n3. P3");
}

/// Tests that role pings are rate limited with the latest ping winning.
///
/// Expected: the "close to filling" ping is superseded by the "enough players" ping
#[tokio::test(start_paused = true)]
async fn pings_coalesce_to_latest() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(3), Some(ROLE)).await.unwrap();

    join_all(&handle, 1..=3).await;
    advance_secs(31).await;

    let pings: Vec<String> = fakes
        .notifier
        .sent_texts()
        .into_iter()
        .filter(|t| t.ends_with("<@&400>"))
        .collect();
    assert_eq!(pings.len(), 2);
    assert!(pings[0].starts_with("Sign-ups are open"));
    assert!(pings[1].starts_with("The draft has enough players to begin"));
    assert!(handle.snapshot().await.messages.full.is_some());
}

/// Tests the ready-check timer end to end.
///
/// Expected: the non-ready player in the count is requeued and the next player notified
#[tokio::test(start_paused = true)]
async fn ready_timer_requeues_stale_player() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(2), Some(ROLE)).await.unwrap();

    join_all(&handle, [1, 2, 3]).await;
    handle.toggle_ready(1).await.unwrap();

    advance_secs(5 * 60 + 1).await;

    let record = handle.snapshot().await;
    assert_eq!(record.roster.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    assert_eq!(record.ready, vec![1]);
    assert!(fakes.notifier.directed_to().contains(&3));
}

/// Tests that the deadline is re-evaluated against the live roster.
///
/// Expected: a player who left before the deadline lets the next one in without requeues
#[tokio::test(start_paused = true)]
async fn ready_timer_uses_live_roster() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(2), Some(ROLE)).await.unwrap();

    join_all(&handle, [1, 2, 3]).await;
    advance_secs(4 * 60).await;
    handle.leave(2).await.unwrap();
    advance_secs(61).await;

    let record = handle.snapshot().await;
    assert_eq!(record.roster.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
    assert!(fakes.notifier.directed_to().contains(&3));
}

/// Tests that cancel removes the draft and nothing fires afterwards.
///
/// Expected: board deleted, summary posted, final state stored, no later activity
#[tokio::test(start_paused = true)]
async fn cancel_is_final() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(2), Some(ROLE)).await.unwrap();
    join_all(&handle, [1, 2]).await;
    settle().await;

    registry.cancel(GUILD, HOST).await.unwrap();
    settle().await;

    assert!(registry.get(GUILD).await.is_none());
    let record = handle.snapshot().await;
    assert_eq!(record.phase, Phase::Canceled);
    assert_eq!(record.messages.embed, None);
    assert!(record.messages.canceled.is_some());

    let board_id = fakes
        .notifier
        .sent
        .lock()
        .unwrap()
        .iter()
        .find(|(_, c)| c.board.is_some())
        .map(|(m, _)| m.message_id)
        .unwrap();
    assert!(fakes.notifier.deleted_ids().contains(&board_id));
    assert!(fakes
        .notifier
        .sent_texts()
        .last()
        .unwrap()
        .contains("Draft has been canceled by <@300>"));

    let stored = fakes.store.record(record.id).unwrap();
    assert!(stored.canceled_at.is_some());

    let sent = fakes.notifier.sent.lock().unwrap().len();
    let edits = fakes.notifier.edit_count();
    let writes = fakes.store.writes();

    advance_secs(60 * 60).await;

    assert_eq!(fakes.notifier.sent.lock().unwrap().len(), sent);
    assert_eq!(fakes.notifier.edit_count(), edits);
    assert_eq!(fakes.store.writes(), writes);
    assert_eq!(handle.join(9, "P9").await, Err(DraftError::Canceled));
}

/// Tests that a declared winner reaches the stats recorder.
///
/// Expected: one win for team 1, one loss for team 2
#[tokio::test(start_paused = true)]
async fn winner_updates_stats() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(2), Some(ROLE)).await.unwrap();
    join_all(&handle, [1, 2]).await;
    handle.set_team_captain(1, 1).await.unwrap();
    handle.set_team_captain(2, 2).await.unwrap();

    handle.declare_winner(1).await.unwrap();
    settle().await;

    assert_eq!(*fakes.stats.wins.lock().unwrap(), vec![1]);
    assert_eq!(*fakes.stats.losses.lock().unwrap(), vec![2]);
    assert_eq!(
        handle.declare_winner(1).await,
        Err(DraftError::WinnerRecentlyDeclared)
    );
}

/// Tests that a failed write is retried by the next flush.
///
/// Expected: no write while the store fails, latest state written afterwards
#[tokio::test(start_paused = true)]
async fn failed_persist_is_retried() {
    let (ctx, fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(4), Some(ROLE)).await.unwrap();

    fakes.store.fail_writes.store(true, Ordering::SeqCst);
    join_all(&handle, [1]).await;
    advance_secs(3).await;
    assert_eq!(fakes.store.writes(), 0);

    fakes.store.fail_writes.store(false, Ordering::SeqCst);
    registry.flush_all().await;

    assert_eq!(fakes.store.writes(), 1);
    let stored = fakes.store.record(handle.snapshot().await.id).unwrap();
    assert_eq!(stored.roster.len(), 1);
}

/// Tests that usage time accrues while the draft runs.
///
/// Expected: roughly one minute of count time after a minute
#[tokio::test(start_paused = true)]
async fn usage_accrues_over_time() {
    let (ctx, _fakes) = context();
    let registry = DraftRegistry::new(ctx);
    let handle = registry.create(config(1), Some(ROLE)).await.unwrap();
    join_all(&handle, [1, 2]).await;

    advance_secs(60).await;

    let record = handle.snapshot().await;
    let first = record.usage_log.iter().find(|e| e.id == 1).unwrap();
    let second = record.usage_log.iter().find(|e| e.id == 2).unwrap();
    assert!(first.in_count_ms >= 59_000);
    assert!(second.in_draft_ms >= 59_000);
    assert_eq!(second.in_count_ms, 0);
}
