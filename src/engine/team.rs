//! Team membership lists, captain first.
//!
//! The structure does not enforce "one team per participant"; `Draft` sequences its
//! mutations so that invariant holds between operations.

use std::collections::BTreeMap;

/// Team numbers every draft has.
pub const TEAM_NUMBERS: [u8; 2] = [1, 2];

#[derive(Debug, Clone, PartialEq)]
pub struct Teams {
    teams: BTreeMap<u8, Vec<u64>>,
}

impl Default for Teams {
    fn default() -> Self {
        Self {
            teams: TEAM_NUMBERS.iter().map(|&t| (t, Vec::new())).collect(),
        }
    }
}

impl Teams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores teams from a stored map, adding any missing standard team.
    pub fn from_map(mut teams: BTreeMap<u8, Vec<u64>>) -> Self {
        for team in TEAM_NUMBERS {
            teams.entry(team).or_default();
        }
        Self { teams }
    }

    pub fn as_map(&self) -> &BTreeMap<u8, Vec<u64>> {
        &self.teams
    }

    pub fn exists(&self, team: u8) -> bool {
        self.teams.contains_key(&team)
    }

    pub fn members(&self, team: u8) -> &[u64] {
        self.teams.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn captain(&self, team: u8) -> Option<u64> {
        self.members(team).first().copied()
    }

    pub fn team_of(&self, id: u64) -> Option<u8> {
        self.teams
            .iter()
            .find(|(_, members)| members.contains(&id))
            .map(|(&team, _)| team)
    }

    /// Team this ID captains, if any.
    pub fn captained_by(&self, id: u64) -> Option<u8> {
        self.teams
            .iter()
            .find(|(_, members)| members.first() == Some(&id))
            .map(|(&team, _)| team)
    }

    pub fn is_captain(&self, id: u64) -> bool {
        self.captained_by(id).is_some()
    }

    /// Places `id` at the head of `team`, shifting the previous captain down.
    pub fn promote(&mut self, team: u8, id: u64) {
        if let Some(members) = self.teams.get_mut(&team) {
            members.insert(0, id);
        }
    }

    pub fn push(&mut self, team: u8, id: u64) {
        if let Some(members) = self.teams.get_mut(&team) {
            members.push(id);
        }
    }

    pub fn remove(&mut self, team: u8, id: u64) -> bool {
        match self.teams.get_mut(&team) {
            Some(members) => {
                let before = members.len();
                members.retain(|&m| m != id);
                members.len() != before
            }
            None => false,
        }
    }

    pub fn remove_everywhere(&mut self, id: u64) -> bool {
        let mut removed = false;
        for members in self.teams.values_mut() {
            let before = members.len();
            members.retain(|&m| m != id);
            removed |= members.len() != before;
        }
        removed
    }

    /// Drops members that fail `keep`, used to heal restored state.
    pub fn retain(&mut self, mut keep: impl FnMut(u64) -> bool) {
        for members in self.teams.values_mut() {
            members.retain(|&m| keep(m));
        }
    }

    pub fn clear(&mut self) {
        for members in self.teams.values_mut() {
            members.clear();
        }
    }

    /// The first team other than `team`.
    pub fn other(&self, team: u8) -> Option<u8> {
        self.teams.keys().copied().find(|&t| t != team)
    }

    /// Everyone on a team other than `team`.
    pub fn opponents(&self, team: u8) -> Vec<u64> {
        self.teams
            .iter()
            .filter(|(&t, _)| t != team)
            .flat_map(|(_, members)| members.iter().copied())
            .collect()
    }
}
