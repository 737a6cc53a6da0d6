//! Per-participant time accounting.
//!
//! Entries are created on first join and retained after the participant leaves.

use crate::model::draft::{RosterEntry, UsageEntry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageLog {
    entries: Vec<UsageEntry>,
}

impl UsageLog {
    pub fn from_entries(entries: Vec<UsageEntry>) -> Self {
        let mut log = Self::default();
        for entry in entries {
            if log.get(entry.id).is_none() {
                log.entries.push(entry);
            }
        }
        log
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&UsageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Creates the entry for `id` if this is its first join, refreshing the name otherwise.
    pub fn ensure(&mut self, id: u64, display_name: &str) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.display_name = display_name.to_string(),
            None => self.entries.push(UsageEntry {
                id,
                display_name: display_name.to_string(),
                in_draft_ms: 0,
                in_count_ms: 0,
            }),
        }
    }

    /// Adds `delta_ms` of draft time to every roster member and count time to the window.
    pub fn accumulate(&mut self, roster: &[RosterEntry], count: usize, delta_ms: i64) {
        if delta_ms <= 0 {
            return;
        }
        for (position, member) in roster.iter().enumerate() {
            if self.get(member.id).is_none() {
                self.ensure(member.id, &member.display_name);
            }
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == member.id) {
                entry.in_draft_ms += delta_ms;
                if position < count {
                    entry.in_count_ms += delta_ms;
                }
            }
        }
    }
}
