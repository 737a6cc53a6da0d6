//! Named, cancellable timers owned by one draft.
//!
//! Each armed timer carries a generation number. A firing task passes its generation to
//! `settle`, which only succeeds if the timer was not re-armed or canceled in between.

use std::{collections::HashMap, future::Future};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Fires once at the sign-up open time.
    SignupOpen,
    /// Fires once at the scheduled start to re-render the board.
    StartTime,
    /// Fires at the ready-check deadline.
    ReadyWait,
    /// Periodic usage accounting while the draft is live.
    UsageTick,
    /// Trailing edge of the persistence debounce.
    PersistDebounce,
    /// Trailing edge of the board refresh debounce.
    RefreshDebounce,
    /// Trailing edge of the role ping debounce.
    PingDebounce,
}

struct Armed {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct TimerSet {
    armed: HashMap<TimerKind, Armed>,
    next_generation: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` as the timer for `kind`, aborting whatever was armed before.
    ///
    /// The task receives its generation and should hand it back to `settle` when it fires.
    pub fn schedule<F, Fut>(&mut self, kind: TimerKind, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.next_generation += 1;
        let generation = self.next_generation;

        if let Some(previous) = self.armed.remove(&kind) {
            previous.handle.abort();
        }

        let handle = tokio::spawn(task(generation));
        self.armed.insert(kind, Armed { generation, handle });
        generation
    }

    /// Marks a firing timer as done without aborting it.
    ///
    /// Returns `false` for a stale generation, in which case the caller must not act.
    pub fn settle(&mut self, kind: TimerKind, generation: u64) -> bool {
        match self.armed.get(&kind) {
            Some(armed) if armed.generation == generation => {
                self.armed.remove(&kind);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.armed.remove(&kind) {
            Some(armed) => {
                armed.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, armed) in self.armed.drain() {
            armed.handle.abort();
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
