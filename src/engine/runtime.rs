//! Per-draft runtime: serialized operations, coalesced side effects, and timers.
//!
//! A `DraftHandle` owns one `Draft` behind a mutex. Every operation locks the draft,
//! applies the state transition, turns the queued `DraftEffect`s into timer changes and
//! I/O jobs, releases the lock, and only then spawns the I/O. The state change never
//! waits on the store or the chat surface.
//!
//! Side effects are coalesced per handle:
//! - persistence is trailing-edge: the first change arms a debounce timer and the write
//!   on expiry reflects the latest state;
//! - board refreshes and role pings are leading and trailing: the first request runs
//!   immediately, further requests inside the window collapse into one trailing run,
//!   with the latest ping winning.
//!
//! Timer tasks hold a weak reference, so dropping the last handle stops them.

use chrono::{DateTime, Utc};
use std::{
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::{sync::Mutex, time::MissedTickBehavior};

use crate::{
    engine::{
        clock,
        draft::{Draft, DraftEffect, Ping, PingSlot},
        port::EngineContext,
        timer::{TimerKind, TimerSet},
        view,
    },
    error::{draft::DraftError, AppError},
    model::{
        draft::{DraftConfig, DraftEdit, DraftRecord, Phase},
        notification::MessageRef,
    },
};

/// Interval of the usage accounting tick.
pub const USAGE_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Coalesce {
    /// A change arrived that the next trailing run must pick up.
    pending: bool,
    /// The debounce window is open.
    armed: bool,
}

#[derive(Debug, Default)]
struct PingQueue {
    pending: Option<Ping>,
    armed: bool,
}

struct Inner {
    draft: Draft,
    timers: TimerSet,
    persist: Coalesce,
    refresh: Coalesce,
    ping: PingQueue,
}

enum Job {
    Persist,
    Render,
    SendPing(Ping),
    Direct { user_id: u64, text: String },
    Record { winners: Vec<u64>, losers: Vec<u64> },
    Finalize,
}

struct Shared {
    guild_id: u64,
    ctx: EngineContext,
    state: Mutex<Inner>,
    /// Serializes store writes so they land in snapshot order.
    persist_gate: Mutex<()>,
    /// Serializes board edits so the last edit shows the latest state.
    render_gate: Mutex<()>,
    ping_gate: Mutex<()>,
}

/// Cloneable handle to a running draft.
#[derive(Clone)]
pub struct DraftHandle {
    shared: Arc<Shared>,
}

impl DraftHandle {
    /// Starts the runtime for a draft.
    ///
    /// Arms the timers implied by the draft's phase and stored deadlines, then dispatches
    /// any effects queued during construction.
    pub async fn launch(draft: Draft, ctx: EngineContext) -> Self {
        let handle = Self {
            shared: Arc::new(Shared {
                guild_id: draft.config().guild_id,
                ctx,
                state: Mutex::new(Inner {
                    draft,
                    timers: TimerSet::new(),
                    persist: Coalesce::default(),
                    refresh: Coalesce::default(),
                    ping: PingQueue::default(),
                }),
                persist_gate: Mutex::new(()),
                render_gate: Mutex::new(()),
                ping_gate: Mutex::new(()),
            }),
        };

        let jobs = {
            let mut inner = handle.shared.state.lock().await;
            handle.start_timers(&mut inner);
            handle.dispatch(&mut inner)
        };
        handle.run(jobs);

        handle
    }

    pub fn guild_id(&self) -> u64 {
        self.shared.guild_id
    }

    /// Whether both handles drive the same runtime.
    pub fn same_draft(&self, other: &DraftHandle) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn now(&self) -> DateTime<Utc> {
        self.shared.ctx.clock.now()
    }

    /// Runs one operation against the draft and dispatches its effects.
    ///
    /// Operations on one handle are totally ordered by the draft lock.
    pub async fn apply<T>(
        &self,
        op: impl FnOnce(&mut Draft, DateTime<Utc>) -> Result<T, DraftError>,
    ) -> Result<T, DraftError> {
        let (result, jobs) = {
            let mut inner = self.shared.state.lock().await;
            let now = self.now();
            let result = op(&mut inner.draft, now);
            let jobs = self.dispatch(&mut inner);
            (result, jobs)
        };
        self.run(jobs);
        result
    }

    /// Reads from the draft without mutating it.
    pub async fn with_draft<T>(&self, read: impl FnOnce(&Draft) -> T) -> T {
        let inner = self.shared.state.lock().await;
        read(&inner.draft)
    }

    pub async fn snapshot(&self) -> DraftRecord {
        self.with_draft(Draft::to_record).await
    }

    pub async fn config(&self) -> DraftConfig {
        self.with_draft(|d| d.config().clone()).await
    }

    pub async fn join(&self, id: u64, name: &str) -> Result<(), DraftError> {
        self.apply(|d, now| d.join(id, name, now)).await
    }

    pub async fn leave(&self, id: u64) -> Result<(), DraftError> {
        self.apply(|d, now| d.leave(id, now)).await
    }

    pub async fn add_participant(&self, id: u64, name: &str) -> Result<bool, DraftError> {
        self.apply(|d, now| d.add_participant(id, name, now)).await
    }

    pub async fn remove_participant(&self, id: u64) -> Result<bool, DraftError> {
        self.apply(|d, now| d.remove_participant(id, now)).await
    }

    pub async fn reorder_participant(&self, id: u64, position: usize) -> Result<(), DraftError> {
        self.apply(|d, now| d.reorder_participant(id, position, now))
            .await
    }

    pub async fn toggle_ready(&self, id: u64) -> Result<bool, DraftError> {
        self.apply(|d, now| d.toggle_ready(id, now)).await
    }

    pub async fn set_team_captain(&self, id: u64, team: u8) -> Result<(), DraftError> {
        self.apply(|d, _| d.set_team_captain(id, team)).await
    }

    pub async fn add_to_team(&self, id: u64, team: u8) -> Result<(), DraftError> {
        self.apply(|d, _| d.add_to_team(id, team)).await
    }

    pub async fn remove_from_team(&self, id: u64, team: u8) -> Result<(), DraftError> {
        self.apply(|d, _| d.remove_from_team(id, team)).await
    }

    pub async fn swap_team(&self, id: u64) -> Result<u8, DraftError> {
        self.apply(|d, _| d.swap_team(id)).await
    }

    pub async fn pick_for_captain(&self, captain: u64, id: u64) -> Result<u8, DraftError> {
        self.apply(|d, _| d.pick_for_captain(captain, id)).await
    }

    pub async fn kick_for_captain(&self, captain: u64, id: u64) -> Result<u8, DraftError> {
        self.apply(|d, _| d.kick_for_captain(captain, id)).await
    }

    pub async fn reset_teams(&self) -> Result<(), DraftError> {
        self.apply(|d, _| d.reset_teams()).await
    }

    pub async fn declare_winner(&self, team: u8) -> Result<(), DraftError> {
        self.apply(|d, now| d.declare_winner(team, now)).await
    }

    pub async fn start(&self) -> Result<(), DraftError> {
        self.apply(|d, now| d.start(now)).await
    }

    pub async fn cancel(&self, actor: u64) -> Result<(), DraftError> {
        self.apply(|d, now| d.cancel(actor, now)).await
    }

    pub async fn edit(&self, edit: DraftEdit) -> Result<(), DraftError> {
        self.apply(|d, _| d.edit(edit)).await
    }

    /// Re-renders the board, used after recovery.
    pub async fn refresh(&self) {
        let _ = self
            .apply(|d, _| {
                d.request_refresh();
                Ok(())
            })
            .await;
    }

    /// Posts the draft board and remembers its message.
    ///
    /// # Returns
    /// - `Ok(())` - Board posted
    /// - `Err(AppError)` - The notifier failed to send the board
    pub async fn publish(&self) -> Result<(), AppError> {
        let _render = self.shared.render_gate.lock().await;

        let (channel_id, content) = {
            let inner = self.shared.state.lock().await;
            let channel_id = inner.draft.config().channel_id;
            (channel_id, view::board(&inner.draft, self.now()))
        };

        let sent = self.shared.ctx.notifier.send(channel_id, &content).await?;

        let mut inner = self.shared.state.lock().await;
        inner.draft.messages_mut().embed = Some(sent.message_id);
        self.mark_persist(&mut inner);
        Ok(())
    }

    /// Marks a draft that never got its board posted as canceled and stores it.
    pub async fn discard(&self) {
        let record = {
            let mut inner = self.shared.state.lock().await;
            let now = self.now();
            let host = inner.draft.config().host_id;
            let _ = inner.draft.cancel(host, now);
            inner.draft.drain_effects();
            inner.timers.cancel_all();
            inner.draft.to_record()
        };
        if let Err(e) = self.shared.ctx.store.upsert_merge(&record).await {
            tracing::error!("Failed to store discarded draft {}: {}", record.id, e);
        }
    }

    /// Stops every timer without changing the draft.
    pub async fn shutdown(&self) {
        let mut inner = self.shared.state.lock().await;
        inner.timers.cancel_all();
    }

    /// Writes the current state to the store.
    ///
    /// On failure the change stays pending and is retried by the next debounce or
    /// periodic flush.
    pub async fn flush(&self) {
        let _gate = self.shared.persist_gate.lock().await;

        let record = {
            let mut inner = self.shared.state.lock().await;
            inner.persist.pending = false;
            inner.draft.to_record()
        };

        if let Err(e) = self.shared.ctx.store.upsert_merge(&record).await {
            tracing::error!(
                "Failed to persist draft {} for guild {}: {}",
                record.id,
                self.shared.guild_id,
                e
            );
            let mut inner = self.shared.state.lock().await;
            inner.persist.pending = true;
        }
    }

    fn start_timers(&self, inner: &mut Inner) {
        let clock = self.shared.ctx.clock.as_ref();
        let draft = &inner.draft;
        let phase = draft.phase();
        let scheduled_at = draft.config().scheduled_at;

        let signup = (phase == Phase::Scheduled)
            .then(|| clock::until(clock, draft.config().signup_opens_at()));
        let start = (!phase.is_terminal() && clock.now() < scheduled_at)
            .then(|| clock::until(clock, scheduled_at));
        let ready = match (phase, draft.ready_deadline()) {
            (Phase::Filled, Some(deadline)) => Some(clock::until(clock, deadline)),
            _ => None,
        };

        if let Some(delay) = signup {
            self.arm(inner, TimerKind::SignupOpen, delay);
        }
        if let Some(delay) = start {
            self.arm(inner, TimerKind::StartTime, delay);
        }
        if let Some(delay) = ready {
            self.arm(inner, TimerKind::ReadyWait, delay);
        }
        if !phase.is_terminal() {
            self.start_usage_ticks(inner);
        }
    }

    fn arm(&self, inner: &mut Inner, kind: TimerKind, delay: Duration) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        inner.timers.schedule(kind, move |generation| async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                DraftHandle { shared }.fire(kind, generation).await;
            }
        });
    }

    fn start_usage_ticks(&self, inner: &mut Inner) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        inner
            .timers
            .schedule(TimerKind::UsageTick, move |generation| async move {
                let mut ticks = tokio::time::interval(USAGE_TICK);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticks.tick().await;
                loop {
                    ticks.tick().await;
                    let Some(shared) = weak.upgrade() else {
                        break;
                    };
                    let handle = DraftHandle { shared };
                    if !handle.tick_usage(generation).await {
                        break;
                    }
                }
            });
    }

    async fn tick_usage(&self, generation: u64) -> bool {
        let mut inner = self.shared.state.lock().await;
        let now = self.now();
        if inner.draft.accumulate_usage(now) {
            return true;
        }
        inner.timers.settle(TimerKind::UsageTick, generation);
        false
    }

    async fn fire(&self, kind: TimerKind, generation: u64) {
        let jobs = {
            let mut inner = self.shared.state.lock().await;
            if !inner.timers.settle(kind, generation) {
                return;
            }
            let now = self.now();
            let mut jobs = Vec::new();

            match kind {
                TimerKind::SignupOpen => {
                    inner.draft.open_signups(now);
                }
                TimerKind::StartTime => inner.draft.request_refresh(),
                TimerKind::ReadyWait => {
                    if inner.draft.expire_ready_wait(now) {
                        tracing::info!(
                            "Requeued players who missed the ready check in guild {}",
                            self.shared.guild_id
                        );
                    }
                }
                TimerKind::PersistDebounce => {
                    inner.persist.armed = false;
                    if inner.persist.pending {
                        jobs.push(Job::Persist);
                    }
                }
                TimerKind::RefreshDebounce => {
                    inner.refresh.armed = false;
                    if inner.refresh.pending {
                        inner.refresh.pending = false;
                        inner.refresh.armed = true;
                        jobs.push(Job::Render);
                        let window = self.shared.ctx.config.refresh_debounce;
                        self.arm(&mut inner, TimerKind::RefreshDebounce, window);
                    }
                }
                TimerKind::PingDebounce => {
                    inner.ping.armed = false;
                    if let Some(ping) = inner.ping.pending.take() {
                        inner.ping.armed = true;
                        jobs.push(Job::SendPing(ping));
                        let window = self.shared.ctx.config.ping_debounce;
                        self.arm(&mut inner, TimerKind::PingDebounce, window);
                    }
                }
                TimerKind::UsageTick => {}
            }

            jobs.extend(self.dispatch(&mut inner));
            jobs
        };
        self.run(jobs);
    }

    fn mark_persist(&self, inner: &mut Inner) {
        inner.persist.pending = true;
        if !inner.persist.armed && inner.draft.phase() != Phase::Canceled {
            inner.persist.armed = true;
            let window = self.shared.ctx.config.persist_debounce;
            self.arm(inner, TimerKind::PersistDebounce, window);
        }
    }

    /// Converts queued effects into timer changes and I/O jobs.
    fn dispatch(&self, inner: &mut Inner) -> Vec<Job> {
        let mut jobs = Vec::new();
        let canceled = inner.draft.phase() == Phase::Canceled;
        let config = self.shared.ctx.config;

        for effect in inner.draft.drain_effects() {
            match effect {
                DraftEffect::Persist => self.mark_persist(inner),
                DraftEffect::Refresh if !canceled => {
                    if inner.refresh.armed {
                        inner.refresh.pending = true;
                    } else {
                        inner.refresh.armed = true;
                        jobs.push(Job::Render);
                        self.arm(inner, TimerKind::RefreshDebounce, config.refresh_debounce);
                    }
                }
                DraftEffect::Ping(ping) if !canceled => {
                    if inner.ping.armed {
                        inner.ping.pending = Some(ping);
                    } else {
                        inner.ping.armed = true;
                        jobs.push(Job::SendPing(ping));
                        self.arm(inner, TimerKind::PingDebounce, config.ping_debounce);
                    }
                }
                DraftEffect::NowInCount(user_id) => jobs.push(Job::Direct {
                    user_id,
                    text: view::now_in_count(inner.draft.config().ready_wait_minutes),
                }),
                DraftEffect::ArmReadyWait(deadline) if !canceled => {
                    let delay = clock::until(self.shared.ctx.clock.as_ref(), deadline);
                    self.arm(inner, TimerKind::ReadyWait, delay);
                }
                DraftEffect::DisarmReadyWait => {
                    inner.timers.cancel(TimerKind::ReadyWait);
                }
                DraftEffect::RecordResult { winners, losers } => {
                    jobs.push(Job::Record { winners, losers })
                }
                DraftEffect::Canceled => {
                    inner.timers.cancel_all();
                    inner.persist.armed = false;
                    inner.refresh = Coalesce::default();
                    inner.ping = PingQueue::default();
                    jobs.push(Job::Finalize);
                }
                _ => {}
            }
        }

        jobs
    }

    fn run(&self, jobs: Vec<Job>) {
        for job in jobs {
            let handle = self.clone();
            tokio::spawn(async move { handle.perform(job).await });
        }
    }

    async fn perform(&self, job: Job) {
        match job {
            Job::Persist => self.flush().await,
            Job::Render => self.render().await,
            Job::SendPing(ping) => self.send_ping(ping).await,
            Job::Direct { user_id, text } => {
                if let Err(e) = self.shared.ctx.notifier.direct(user_id, &text).await {
                    tracing::warn!("Failed to send direct message to user {}: {}", user_id, e);
                }
            }
            Job::Record { winners, losers } => self.record_result(winners, losers).await,
            Job::Finalize => self.finalize().await,
        }
    }

    async fn render(&self) {
        let _render = self.shared.render_gate.lock().await;

        let (target, content) = {
            let inner = self.shared.state.lock().await;
            let Some(message_id) = inner.draft.messages().embed else {
                return;
            };
            let target = MessageRef {
                channel_id: inner.draft.config().channel_id,
                message_id,
            };
            (target, view::board(&inner.draft, self.now()))
        };

        if let Err(e) = self.shared.ctx.notifier.edit(target, &content).await {
            tracing::error!(
                "Failed to update draft board in guild {}: {}",
                self.shared.guild_id,
                e
            );
        }
    }

    async fn send_ping(&self, ping: Ping) {
        let _gate = self.shared.ping_gate.lock().await;

        let slot = ping.slot();
        let (channel_id, role_id, previous) = {
            let inner = self.shared.state.lock().await;
            if inner.draft.phase() == Phase::Canceled {
                return;
            }
            let messages = inner.draft.messages();
            let previous = match slot {
                PingSlot::Opened => messages.opened,
                PingSlot::Full => messages.full,
            };
            (
                inner.draft.config().channel_id,
                inner.draft.ping_role(),
                previous,
            )
        };
        let Some(role_id) = role_id else {
            return;
        };

        let notifier = &self.shared.ctx.notifier;
        if let Some(message_id) = previous {
            let target = MessageRef {
                channel_id,
                message_id,
            };
            if let Err(e) = notifier.delete(target).await {
                tracing::warn!("Failed to delete previous ping {}: {}", message_id, e);
            }
        }

        match notifier.send(channel_id, &view::ping(&ping, role_id)).await {
            Ok(sent) => {
                let mut inner = self.shared.state.lock().await;
                let messages = inner.draft.messages_mut();
                match slot {
                    PingSlot::Opened => messages.opened = Some(sent.message_id),
                    PingSlot::Full => messages.full = Some(sent.message_id),
                }
                self.mark_persist(&mut inner);
            }
            Err(e) => tracing::error!(
                "Failed to send draft ping in guild {}: {}",
                self.shared.guild_id,
                e
            ),
        }
    }

    async fn record_result(&self, winners: Vec<u64>, losers: Vec<u64>) {
        let stats = &self.shared.ctx.stats;
        for id in winners {
            if let Err(e) = stats.record_win(id).await {
                tracing::error!("Failed to record win for player {}: {}", id, e);
            }
        }
        for id in losers {
            if let Err(e) = stats.record_loss(id).await {
                tracing::error!("Failed to record loss for player {}: {}", id, e);
            }
        }
    }

    /// Deletes the board and pings, posts the summary, and stores the final state.
    async fn finalize(&self) {
        let _render = self.shared.render_gate.lock().await;
        let _ping = self.shared.ping_gate.lock().await;

        let (channel_id, messages, summary) = {
            let inner = self.shared.state.lock().await;
            (
                inner.draft.config().channel_id,
                *inner.draft.messages(),
                view::cancel_summary(&inner.draft, self.now()),
            )
        };

        let notifier = &self.shared.ctx.notifier;
        for message_id in [messages.embed, messages.opened, messages.full]
            .into_iter()
            .flatten()
        {
            let target = MessageRef {
                channel_id,
                message_id,
            };
            if let Err(e) = notifier.delete(target).await {
                tracing::warn!("Failed to delete draft message {}: {}", message_id, e);
            }
        }

        let summary_id = match notifier.send(channel_id, &summary).await {
            Ok(sent) => Some(sent.message_id),
            Err(e) => {
                tracing::error!(
                    "Failed to post cancellation summary in guild {}: {}",
                    self.shared.guild_id,
                    e
                );
                None
            }
        };

        {
            let mut inner = self.shared.state.lock().await;
            let refs = inner.draft.messages_mut();
            refs.embed = None;
            refs.opened = None;
            refs.full = None;
            refs.canceled = summary_id;
            inner.persist.pending = true;
        }

        self.flush().await;
    }
}
