use std::collections::BTreeMap;

use super::types::{Match, PlayerSummary, ScheduleState, TimeSlot};

impl ScheduleState {
    pub fn matches_at(&self, slot: TimeSlot) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.slot == slot)
    }

    /// Names seated in any match of the slot
    pub fn assigned_at(&self, slot: TimeSlot) -> Vec<&str> {
        self.matches_at(slot).flat_map(Match::seated).collect()
    }

    pub fn idle_at(&self, slot: TimeSlot) -> &[String] {
        self.idle.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// Everyone present at the slot: seated first, then idle
    pub fn eligible_at(&self, slot: TimeSlot) -> Vec<&str> {
        let mut names = self.assigned_at(slot);
        names.extend(self.idle_at(slot).iter().map(String::as_str));
        names
    }

    /// Games and idle turns per player, recomputed from the current state
    pub fn player_summaries(&self) -> Vec<PlayerSummary> {
        let mut summaries: BTreeMap<&str, PlayerSummary> = BTreeMap::new();
        for (name, &games) in &self.games_played {
            summaries.entry(name.as_str()).or_insert_with(|| blank(name)).games = games;
        }
        for name in self.idle.values().flatten() {
            summaries.entry(name.as_str()).or_insert_with(|| blank(name)).idle += 1;
        }

        summaries.into_values().collect()
    }
}

fn blank(name: &str) -> PlayerSummary {
    PlayerSummary {
        name: name.to_string(),
        games: 0,
        idle: 0,
    }
}
