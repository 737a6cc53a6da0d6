//! Draft lifecycle state machine.
//!
//! `Draft` is pure: every time-dependent operation takes `now`, and side effects are
//! queued as `DraftEffect`s that the runtime drains and dispatches after the operation
//! returns. A rejected operation returns a `DraftError` and leaves state untouched.
//!
//! Phases move `Scheduled -> Open -> Filled -> Started`, with `Filled` falling back to
//! `Open` when the roster drops below the count. `Canceled` is reachable from every
//! other phase and blocks all further mutation.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::{
    engine::{roster::Roster, team::Teams, usage::UsageLog},
    error::draft::{DraftError, ValidationError},
    model::draft::{DraftConfig, DraftEdit, DraftRecord, MessageRefs, Phase, RosterEntry},
};

/// Window in which a second winner declaration is treated as a duplicate.
pub const WINNER_COOLDOWN_MINUTES: i64 = 3;

/// Message slot a ping occupies; a new ping deletes the previous one in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingSlot {
    Opened,
    Full,
}

/// Role pings announcing roster milestones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ping {
    SignupsOpen,
    NearlyFull { count: u32 },
    Full { minutes: i64 },
}

impl Ping {
    pub fn slot(&self) -> PingSlot {
        match self {
            Ping::SignupsOpen | Ping::NearlyFull { .. } => PingSlot::Opened,
            Ping::Full { .. } => PingSlot::Full,
        }
    }
}

/// Side effects requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEffect {
    /// State changed and should be written to the store.
    Persist,
    /// The draft board should be re-rendered.
    Refresh,
    Ping(Ping),
    /// A player entered the count because someone ahead of them left or was requeued.
    NowInCount(u64),
    /// (Re)arm the ready-check timer for an absolute deadline.
    ArmReadyWait(DateTime<Utc>),
    DisarmReadyWait,
    RecordResult {
        winners: Vec<u64>,
        losers: Vec<u64>,
    },
    /// The draft was canceled; stop timers and post the summary.
    Canceled,
}

#[derive(Debug, Clone)]
pub struct Draft {
    id: i32,
    config: DraftConfig,
    phase: Phase,
    canceled_at: Option<DateTime<Utc>>,
    canceled_by: Option<u64>,
    roster: Roster,
    teams: Teams,
    usage: UsageLog,
    ready: Vec<u64>,
    ready_deadline: Option<DateTime<Utc>>,
    messages: MessageRefs,
    created_at: DateTime<Utc>,
    ping_role: Option<u64>,
    last_winner_at: Option<DateTime<Utc>>,
    last_usage_at: DateTime<Utc>,
    effects: Vec<DraftEffect>,
}

impl Draft {
    /// Creates a draft from validated configuration.
    ///
    /// The draft starts `Open` if sign-ups are already open, `Scheduled` otherwise.
    ///
    /// # Arguments
    /// - `id` - Store ID, `0` if not yet inserted
    /// - `config` - Configuration supplied by the command layer
    /// - `now` - Current instant
    /// - `ping_role` - Role mentioned by pings, pings disabled when `None`
    ///
    /// # Returns
    /// - `Ok(Draft)` - New draft with its initial effects queued
    /// - `Err(DraftError::Invalid)` - Configuration failed validation
    pub fn new(
        id: i32,
        config: DraftConfig,
        now: DateTime<Utc>,
        ping_role: Option<u64>,
    ) -> Result<Self, DraftError> {
        config.validate()?;

        let mut draft = Self {
            id,
            config,
            phase: Phase::Scheduled,
            canceled_at: None,
            canceled_by: None,
            roster: Roster::new(),
            teams: Teams::new(),
            usage: UsageLog::default(),
            ready: Vec::new(),
            ready_deadline: None,
            messages: MessageRefs::default(),
            created_at: now,
            ping_role,
            last_winner_at: None,
            last_usage_at: now,
            effects: Vec::new(),
        };
        if !draft.open_signups(now) {
            draft.touch();
        }

        Ok(draft)
    }

    /// Rebuilds a draft from a stored record.
    ///
    /// Display names found in `names` replace the stored ones; unresolved IDs keep their
    /// stored names. Team members and ready flags that no longer match the roster are
    /// dropped.
    pub fn from_record(
        record: DraftRecord,
        names: &HashMap<u64, String>,
        now: DateTime<Utc>,
        ping_role: Option<u64>,
    ) -> Result<Self, DraftError> {
        record.config.validate()?;

        let mut roster = Roster::from_entries(record.roster);
        for (id, name) in names {
            roster.set_display_name(*id, name);
        }

        let mut teams = Teams::from_map(record.teams);
        teams.retain(|id| roster.contains(id));

        let mut usage = UsageLog::from_entries(record.usage_log);
        for entry in roster.entries() {
            if usage.get(entry.id).is_none() {
                usage.ensure(entry.id, &entry.display_name);
            }
        }

        let window = roster.window_ids(record.config.required_count as usize);
        let mut ready = record.ready;
        ready.retain(|id| window.contains(id));

        Ok(Self {
            id: record.id,
            config: record.config,
            phase: record.phase,
            canceled_at: record.canceled_at,
            canceled_by: record.canceled_by,
            roster,
            teams,
            usage,
            ready,
            ready_deadline: record.ready_deadline,
            messages: record.messages,
            created_at: record.created_at,
            ping_role,
            last_winner_at: None,
            last_usage_at: now,
            effects: Vec::new(),
        })
    }

    pub fn to_record(&self) -> DraftRecord {
        DraftRecord {
            id: self.id,
            config: self.config.clone(),
            phase: self.phase,
            canceled_at: self.canceled_at,
            canceled_by: self.canceled_by,
            roster: self.roster.entries().to_vec(),
            teams: self.teams.as_map().clone(),
            usage_log: self.usage.entries().to_vec(),
            ready: self.ready.clone(),
            ready_deadline: self.ready_deadline,
            messages: self.messages,
            created_at: self.created_at,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn canceled_at(&self) -> Option<DateTime<Utc>> {
        self.canceled_at
    }

    pub fn canceled_by(&self) -> Option<u64> {
        self.canceled_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn usage(&self) -> &UsageLog {
        &self.usage
    }

    pub fn ready_deadline(&self) -> Option<DateTime<Utc>> {
        self.ready_deadline
    }

    pub fn messages(&self) -> &MessageRefs {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageRefs {
        &mut self.messages
    }

    pub fn ping_role(&self) -> Option<u64> {
        self.ping_role
    }

    pub fn is_ready(&self, id: u64) -> bool {
        self.ready.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.config.required_count as usize
    }

    pub fn window_ids(&self) -> Vec<u64> {
        self.roster.window_ids(self.count())
    }

    pub fn in_count(&self, id: u64) -> bool {
        self.roster.in_window(id, self.count())
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.count()
    }

    pub fn is_past_signup_time(&self, now: DateTime<Utc>) -> bool {
        now >= self.config.signup_opens_at()
    }

    /// Ready toggles are accepted once the start time has passed with a full count.
    pub fn can_indicate_ready(&self, now: DateTime<Utc>) -> bool {
        self.phase == Phase::Filled && now >= self.config.scheduled_at
    }

    /// Takes the effects queued since the last call.
    pub fn drain_effects(&mut self) -> Vec<DraftEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Queues a board refresh without changing state.
    pub fn request_refresh(&mut self) {
        self.effects.push(DraftEffect::Refresh);
    }

    /// Moves a `Scheduled` draft to `Open` once its sign-up time has passed.
    ///
    /// Returns `true` if the phase changed.
    pub fn open_signups(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Scheduled || !self.is_past_signup_time(now) {
            return false;
        }

        let before = self.window_ids();
        self.phase = Phase::Open;
        self.ping(Ping::SignupsOpen);
        self.settle_roster(&before, now);
        self.touch();
        true
    }

    /// Signs up a player from the board's join button.
    pub fn join(&mut self, id: u64, name: &str, now: DateTime<Utc>) -> Result<(), DraftError> {
        self.ensure_roster_mutable()?;
        if !self.is_past_signup_time(now) {
            return Err(DraftError::SignupsNotOpen);
        }
        self.open_signups(now);

        match self.add_participant(id, name, now)? {
            true => Ok(()),
            false => Err(DraftError::AlreadyJoined),
        }
    }

    /// Appends a participant to the roster.
    ///
    /// # Returns
    /// - `Ok(true)` - Participant was added
    /// - `Ok(false)` - Participant was already on the roster, nothing changed
    /// - `Err(DraftError)` - Draft is canceled or started
    pub fn add_participant(
        &mut self,
        id: u64,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DraftError> {
        self.ensure_roster_mutable()?;
        if self.roster.contains(id) {
            return Ok(false);
        }

        let before = self.window_ids();
        let was_full = self.is_full();

        self.roster.push(RosterEntry {
            id,
            display_name: name.to_string(),
            joined_at: now,
        });
        self.usage.ensure(id, name);
        self.settle_roster(&before, now);

        if !was_full && self.needs_one_more() {
            self.ping(Ping::NearlyFull {
                count: self.config.required_count,
            });
        }
        self.touch();
        Ok(true)
    }

    /// Removes a participant from the board's leave button.
    pub fn leave(&mut self, id: u64, now: DateTime<Utc>) -> Result<(), DraftError> {
        match self.remove_participant(id, now)? {
            true => Ok(()),
            false => Err(DraftError::NotInDraft),
        }
    }

    /// Removes a participant from the roster, any team, and the ready list.
    ///
    /// Players pulled into the count by the removal are notified while the draft is
    /// `Filled`.
    ///
    /// # Returns
    /// - `Ok(true)` - Participant was removed
    /// - `Ok(false)` - Participant was not on the roster, nothing changed
    /// - `Err(DraftError)` - Draft is canceled or started
    pub fn remove_participant(&mut self, id: u64, now: DateTime<Utc>) -> Result<bool, DraftError> {
        self.ensure_roster_mutable()?;
        if !self.roster.contains(id) {
            return Ok(false);
        }

        let before = self.window_ids();
        self.roster.remove(id);
        self.ready.retain(|&r| r != id);
        self.teams.remove_everywhere(id);
        self.settle_roster(&before, now);

        if self.needs_one_more() {
            self.ping(Ping::NearlyFull {
                count: self.config.required_count,
            });
        }
        self.touch();
        Ok(true)
    }

    /// Moves a participant to a zero-based roster position.
    pub fn reorder_participant(
        &mut self,
        id: u64,
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<(), DraftError> {
        self.ensure_roster_mutable()?;
        if !self.roster.contains(id) {
            return Err(DraftError::NotInDraft);
        }

        let before = self.window_ids();
        self.roster.reorder(id, position);
        self.settle_roster(&before, now);
        self.touch();
        Ok(())
    }

    /// Flips the ready flag of a player in the count.
    ///
    /// # Returns
    /// - `Ok(true)` - Player is now ready
    /// - `Ok(false)` - Player is no longer ready
    pub fn toggle_ready(&mut self, id: u64, now: DateTime<Utc>) -> Result<bool, DraftError> {
        self.ensure_roster_mutable()?;
        if !self.roster.contains(id) {
            return Err(DraftError::NotInDraft);
        }
        if !self.in_count(id) {
            return Err(DraftError::NotInCount);
        }
        if !self.can_indicate_ready(now) {
            return Err(DraftError::CannotReadyYet);
        }

        let ready = match self.ready.iter().position(|&r| r == id) {
            Some(index) => {
                self.ready.remove(index);
                false
            }
            None => {
                self.ready.push(id);
                true
            }
        };
        self.touch();
        Ok(ready)
    }

    /// Makes a player in the count the captain of `team`.
    ///
    /// The player is taken off any other team first. The previous captain stays on the
    /// team at the second position.
    pub fn set_team_captain(&mut self, id: u64, team: u8) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        self.ensure_team(team)?;
        if !self.roster.contains(id) {
            return Err(DraftError::NotInDraft);
        }
        if !self.in_count(id) {
            return Err(DraftError::NotInCount);
        }
        if self.teams.is_captain(id) {
            return Err(DraftError::AlreadyCaptain);
        }

        self.teams.remove_everywhere(id);
        self.teams.promote(team, id);
        self.touch();
        Ok(())
    }

    pub fn add_to_team(&mut self, id: u64, team: u8) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        self.ensure_team(team)?;
        self.ensure_pickable(id)?;

        match self.teams.team_of(id) {
            Some(current) if current == team => Err(DraftError::AlreadyOnTeam),
            Some(_) => Err(DraftError::OnAnotherTeam),
            None => {
                self.teams.push(team, id);
                self.touch();
                Ok(())
            }
        }
    }

    pub fn remove_from_team(&mut self, id: u64, team: u8) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        self.ensure_team(team)?;

        if !self.teams.remove(team, id) {
            return Err(DraftError::NotOnTeam);
        }
        self.touch();
        Ok(())
    }

    /// Moves a player to the other team in one step.
    ///
    /// # Returns
    /// - `Ok(u8)` - The team the player is now on
    /// - `Err(DraftError::NotOnTeam)` - Player is not on any team
    pub fn swap_team(&mut self, id: u64) -> Result<u8, DraftError> {
        self.ensure_mutable()?;
        let from = self.teams.team_of(id).ok_or(DraftError::NotOnTeam)?;
        let to = self.teams.other(from).ok_or(DraftError::UnknownTeam(from))?;

        self.teams.remove(from, id);
        self.teams.push(to, id);
        self.touch();
        Ok(to)
    }

    /// Adds a player to the team `captain` leads.
    pub fn pick_for_captain(&mut self, captain: u64, id: u64) -> Result<u8, DraftError> {
        self.ensure_mutable()?;
        let team = self.teams.captained_by(captain).ok_or(DraftError::NotACaptain)?;
        self.add_to_team(id, team)?;
        Ok(team)
    }

    /// Removes a player from the team `captain` leads.
    pub fn kick_for_captain(&mut self, captain: u64, id: u64) -> Result<u8, DraftError> {
        self.ensure_mutable()?;
        let team = self.teams.captained_by(captain).ok_or(DraftError::NotACaptain)?;
        if id == captain {
            return Err(DraftError::AlreadyCaptain);
        }
        self.remove_from_team(id, team)?;
        Ok(team)
    }

    pub fn reset_teams(&mut self) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        self.teams.clear();
        self.touch();
        Ok(())
    }

    /// Records a win for every member of `team` and a loss for everyone on the other team.
    ///
    /// A second declaration within the cool-down window is rejected.
    pub fn declare_winner(&mut self, team: u8, now: DateTime<Utc>) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        self.ensure_team(team)?;
        if self
            .last_winner_at
            .is_some_and(|at| now - at < Duration::minutes(WINNER_COOLDOWN_MINUTES))
        {
            return Err(DraftError::WinnerRecentlyDeclared);
        }

        self.last_winner_at = Some(now);
        self.effects.push(DraftEffect::RecordResult {
            winners: self.teams.members(team).to_vec(),
            losers: self.teams.opponents(team),
        });
        Ok(())
    }

    /// Starts a `Filled` draft once everyone in the count is ready.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), DraftError> {
        self.ensure_roster_mutable()?;
        if self.phase != Phase::Filled {
            return Err(DraftError::NotFilled);
        }
        let waiting = self
            .window_ids()
            .iter()
            .filter(|id| !self.ready.contains(id))
            .count();
        if waiting > 0 {
            return Err(DraftError::NotAllReady(waiting));
        }

        self.accumulate_usage(now);
        self.phase = Phase::Started;
        self.ready.clear();
        if self.ready_deadline.take().is_some() {
            self.effects.push(DraftEffect::DisarmReadyWait);
        }
        self.touch();
        Ok(())
    }

    /// Cancels the draft. Irreversible.
    pub fn cancel(&mut self, actor: u64, now: DateTime<Utc>) -> Result<(), DraftError> {
        self.ensure_mutable()?;

        self.accumulate_usage(now);
        self.phase = Phase::Canceled;
        self.canceled_at = Some(now);
        self.canceled_by = Some(actor);
        self.ready_deadline = None;
        self.effects.push(DraftEffect::Canceled);
        self.effects.push(DraftEffect::Persist);
        Ok(())
    }

    /// Applies a partial configuration update. Always refreshes the board.
    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), DraftError> {
        self.ensure_mutable()?;
        if let Some(location) = edit.location.as_deref() {
            if location.trim().is_empty() {
                return Err(ValidationError::EmptyLocation.into());
            }
        }

        if let Some(host_id) = edit.host_id {
            self.config.host_id = host_id;
        }
        if let Some(location) = edit.location {
            self.config.location = location;
        }
        if let Some(description) = edit.description {
            self.config.description = description;
        }
        if let Some(open_pool) = edit.open_pool {
            self.config.open_pool = open_pool;
        }
        self.touch();
        Ok(())
    }

    /// Handles the ready-check deadline.
    ///
    /// Membership is evaluated against the live roster: only players in the count who are
    /// still not ready are requeued. A call before the stored deadline re-arms the timer.
    ///
    /// Returns `true` if anyone was requeued.
    pub fn expire_ready_wait(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Filled {
            return false;
        }
        let Some(deadline) = self.ready_deadline else {
            return false;
        };
        if now < deadline {
            self.effects.push(DraftEffect::ArmReadyWait(deadline));
            return false;
        }

        self.ready_deadline = None;
        let before = self.window_ids();
        let stale: Vec<u64> = before
            .iter()
            .copied()
            .filter(|id| !self.ready.contains(id))
            .collect();
        if stale.is_empty() {
            self.effects.push(DraftEffect::Persist);
            return false;
        }

        for id in &stale {
            self.roster.requeue(*id);
        }
        self.settle_roster(&before, now);

        let waiting = self.window_ids().iter().any(|id| !self.ready.contains(id));
        if self.ready_deadline.is_none() && waiting {
            let deadline = self.fresh_ready_deadline(now);
            self.arm_ready_wait(deadline);
        }
        self.touch();
        true
    }

    /// Adds the time since the previous call to the usage log.
    ///
    /// Returns `false` once the draft is started or canceled; the caller stops ticking.
    pub fn accumulate_usage(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        let delta = (now - self.last_usage_at).num_milliseconds();
        self.last_usage_at = now;
        self.usage.accumulate(self.roster.entries(), self.count(), delta);
        true
    }

    fn ensure_mutable(&self) -> Result<(), DraftError> {
        match self.phase {
            Phase::Canceled => Err(DraftError::Canceled),
            _ => Ok(()),
        }
    }

    fn ensure_roster_mutable(&self) -> Result<(), DraftError> {
        match self.phase {
            Phase::Canceled => Err(DraftError::Canceled),
            Phase::Started => Err(DraftError::AlreadyStarted),
            _ => Ok(()),
        }
    }

    fn ensure_team(&self, team: u8) -> Result<(), DraftError> {
        match self.teams.exists(team) {
            true => Ok(()),
            false => Err(DraftError::UnknownTeam(team)),
        }
    }

    /// Team picks draw from the count unless the draft uses an open pool.
    fn ensure_pickable(&self, id: u64) -> Result<(), DraftError> {
        if !self.roster.contains(id) {
            return Err(DraftError::NotInDraft);
        }
        if !self.config.open_pool && !self.in_count(id) {
            return Err(DraftError::NotInCount);
        }
        Ok(())
    }

    fn needs_one_more(&self) -> bool {
        self.phase != Phase::Scheduled
            && self.count() > 1
            && self.roster.len() == self.count() - 1
    }

    fn fresh_ready_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.config.scheduled_at) + self.config.ready_wait()
    }

    fn arm_ready_wait(&mut self, deadline: DateTime<Utc>) {
        if self.ready_deadline != Some(deadline) {
            self.ready_deadline = Some(deadline);
            self.effects.push(DraftEffect::ArmReadyWait(deadline));
        }
    }

    fn ping(&mut self, ping: Ping) {
        if self.config.skip_open_ping || self.ping_role.is_none() {
            return;
        }
        self.effects.push(DraftEffect::Ping(ping));
    }

    fn touch(&mut self) {
        self.effects.push(DraftEffect::Persist);
        self.effects.push(DraftEffect::Refresh);
    }

    /// Reconciles phase, ready flags, and the ready-check after the roster changed.
    ///
    /// `before` is the count as it was before the change.
    fn settle_roster(&mut self, before: &[u64], now: DateTime<Utc>) {
        let window = self.window_ids();
        self.ready.retain(|id| window.contains(id));

        match self.phase {
            Phase::Open if self.is_full() => {
                self.phase = Phase::Filled;
                let deadline = self.fresh_ready_deadline(now);
                self.arm_ready_wait(deadline);
                let minutes = ((deadline - now).num_seconds().max(0) + 59) / 60;
                self.ping(Ping::Full { minutes });
            }
            Phase::Filled if !self.is_full() => {
                self.phase = Phase::Open;
                self.ready.clear();
                if self.ready_deadline.take().is_some() {
                    self.effects.push(DraftEffect::DisarmReadyWait);
                }
            }
            Phase::Filled => {
                let entrants: Vec<u64> = window
                    .iter()
                    .copied()
                    .filter(|id| !before.contains(id))
                    .collect();
                if entrants.is_empty() {
                    return;
                }
                for id in entrants {
                    self.effects.push(DraftEffect::NowInCount(id));
                }
                let fresh = self.fresh_ready_deadline(now);
                let deadline = self.ready_deadline.map_or(fresh, |d| d.max(fresh));
                self.arm_ready_wait(deadline);
            }
            _ => {}
        }
    }
}
