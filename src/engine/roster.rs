//! Ordered, duplicate-free participant list.
//!
//! The in-count window is always the positional prefix `entries[..count]`.

use crate::model::draft::RosterEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from stored entries, keeping the first occurrence of each ID.
    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        let mut roster = Self::new();
        for entry in entries {
            roster.push(entry);
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: u64) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Appends an entry. Returns `false` without change if the ID is already present.
    pub fn push(&mut self, entry: RosterEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<RosterEntry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Moves an entry to `position`, clamped to the end of the remaining roster.
    pub fn reorder(&mut self, id: u64, position: usize) -> bool {
        let Some(entry) = self.remove(id) else {
            return false;
        };
        let position = position.min(self.entries.len());
        self.entries.insert(position, entry);
        true
    }

    /// Sends an entry to the back of the queue.
    pub fn requeue(&mut self, id: u64) -> bool {
        self.reorder(id, usize::MAX)
    }

    pub fn window(&self, count: usize) -> &[RosterEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn window_ids(&self, count: usize) -> Vec<u64> {
        self.window(count).iter().map(|e| e.id).collect()
    }

    pub fn in_window(&self, id: u64, count: usize) -> bool {
        self.position(id).is_some_and(|p| p < count)
    }

    pub fn set_display_name(&mut self, id: u64, name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.display_name = name.to_string();
        }
    }
}
