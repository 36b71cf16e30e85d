use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use super::types::{Match, MatchId, ScheduleState};

/// What a swap actually did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwapOutcome {
    /// The player already held that position
    Unchanged,
    /// An idle player was seated; the previous occupant (if any) is now idle
    FromIdle { displaced: Option<String> },
    /// Two players of the same slot exchanged positions
    Exchanged { with_match: MatchId, displaced: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResetOutcome {
    Reset { released: usize },
    /// Nothing was assigned, nothing changed
    AlreadyEmpty,
}

impl ScheduleState {
    fn match_index(&self, match_id: MatchId) -> Result<usize, ScheduleError> {
        self.matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(ScheduleError::UnknownMatch(match_id))
    }

    pub fn match_by_id(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Puts `new_name` at `position` of a match.
    ///
    /// Seating an idle player moves the displaced occupant to idle and shifts
    /// one game between their counters. Seating a player who already plays in
    /// the same slot exchanges the two positions and leaves counters alone.
    pub fn swap_player(&mut self, match_id: MatchId, position: usize, new_name: &str) -> Result<SwapOutcome, ScheduleError> {
        if position > 3 {
            return Err(ScheduleError::InvalidPosition(position));
        }
        let target = self.match_index(match_id)?;
        let slot = self.matches[target].slot;

        if self.matches[target].players[position].as_deref() == Some(new_name) {
            return Ok(SwapOutcome::Unchanged);
        }

        let seated = self
            .matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.slot == slot)
            .find_map(|(i, m)| m.position_of(new_name).map(|p| (i, p)));

        if let Some((other, other_position)) = seated {
            let displaced = self.matches[target].players[position].take();
            self.matches[other].players[other_position] = displaced.clone();
            self.matches[target].players[position] = Some(new_name.to_string());
            self.manually_edited = true;
            debug!("{}: {} exchanged into match {} position {}", slot, new_name, match_id, position);
            return Ok(SwapOutcome::Exchanged {
                with_match: self.matches[other].id,
                displaced,
            });
        }

        let unknown = || ScheduleError::UnknownPlayer {
            name: new_name.to_string(),
            slot,
        };
        let idle = self.idle.get_mut(&slot).ok_or_else(unknown)?;
        let idle_position = idle.iter().position(|n| n == new_name).ok_or_else(unknown)?;
        idle.remove(idle_position);

        let displaced = self.matches[target].players[position].replace(new_name.to_string());
        if let Some(name) = &displaced {
            idle.push(name.clone());
            if let Some(count) = self.games_played.get_mut(name) {
                *count = count.saturating_sub(1);
            }
        }
        *self.games_played.entry(new_name.to_string()).or_insert(0) += 1;
        self.manually_edited = true;

        debug!("{}: {} seated in match {} position {}, displacing {:?}", slot, new_name, match_id, position, displaced);
        Ok(SwapOutcome::FromIdle { displaced })
    }

    /// Empties every match, sends everyone back to idle and zeroes all counters
    pub fn reset_all_assignments(&mut self) -> ResetOutcome {
        if self.matches.iter().all(Match::is_empty) {
            return ResetOutcome::AlreadyEmpty;
        }

        let mut released = 0;
        for m in &mut self.matches {
            let idle = self.idle.entry(m.slot).or_default();
            for player in m.players.iter_mut() {
                if let Some(name) = player.take() {
                    idle.push(name);
                    released += 1;
                }
            }
        }
        for count in self.games_played.values_mut() {
            *count = 0;
        }
        self.manually_edited = true;

        info!("Reset all assignments, {} players released", released);
        ResetOutcome::Reset { released }
    }

    pub fn set_score(&mut self, match_id: MatchId, team: usize, value: u32) -> Result<(), ScheduleError> {
        if team > 1 {
            return Err(ScheduleError::InvalidTeam(team));
        }
        let target = self.match_index(match_id)?;
        let m = &mut self.matches[target];
        m.score[team] = value;
        m.scored = true;
        self.manually_edited = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::builder::ScheduleBuilder;
    use crate::schedule::slot_utils::parse_time;
    use crate::schedule::types::{Attendee, Court, Gender};

    fn t(s: &str) -> chrono::NaiveTime {
        parse_time(s).unwrap()
    }

    // 9 players, 2 courts, 19:00-20:00: one idle per slot
    fn built() -> ScheduleState {
        let roster = ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
            .iter()
            .map(|n| Attendee::new(*n, Gender::F, t("19:00"), t("20:00")))
            .collect();
        let courts = vec![
            Court::new("1", t("19:00"), t("20:00")),
            Court::new("2", t("19:00"), t("20:00")),
        ];
        ScheduleBuilder::new(roster, courts).build().unwrap()
    }

    fn assert_conserved(state: &ScheduleState) {
        for slot in &state.slots {
            let mut everyone = state.assigned_at(*slot);
            everyone.extend(state.idle[slot].iter().map(String::as_str));
            everyone.sort();
            let before = everyone.len();
            everyone.dedup();
            assert_eq!(before, everyone.len(), "assigned and idle overlap at {slot}");
            assert_eq!(everyone.len(), 9);
        }
    }

    #[test]
    fn idle_player_takes_a_seat() {
        let mut state = built();
        let slot = state.slots[0];
        // I is idle in the first slot, A plays on court 1
        let outcome = state.swap_player(0, 0, "I").unwrap();

        assert_eq!(outcome, SwapOutcome::FromIdle { displaced: Some("A".into()) });
        assert_eq!(state.matches[0].players[0].as_deref(), Some("I"));
        assert_eq!(state.idle[&slot], ["A"]);
        assert_eq!(state.games_played["I"], 2);
        assert_eq!(state.games_played["A"], 1);
        assert!(state.manually_edited);
        assert_conserved(&state);
    }

    #[test]
    fn cross_match_exchange_keeps_counters() {
        let mut state = built();
        let counters = state.games_played.clone();
        // E plays on court 2 in the first slot
        let outcome = state.swap_player(0, 1, "E").unwrap();

        assert_eq!(outcome, SwapOutcome::Exchanged { with_match: 1, displaced: Some("B".into()) });
        assert_eq!(state.matches[0].players[1].as_deref(), Some("E"));
        assert_eq!(state.matches[1].players[0].as_deref(), Some("B"));
        assert_eq!(state.games_played, counters);
        assert_conserved(&state);
    }

    #[test]
    fn exchange_within_one_match_swaps_teams() {
        let mut state = built();
        state.swap_player(0, 0, "C").unwrap();
        assert_eq!(state.matches[0].players[0].as_deref(), Some("C"));
        assert_eq!(state.matches[0].players[2].as_deref(), Some("A"));
    }

    #[test]
    fn same_player_same_position_is_unchanged() {
        let mut state = built();
        assert_eq!(state.swap_player(0, 0, "A").unwrap(), SwapOutcome::Unchanged);
        assert!(!state.manually_edited);
    }

    #[test]
    fn swap_rejects_bad_references() {
        let mut state = built();
        let before = state.clone();
        assert!(matches!(state.swap_player(0, 0, "Zed"), Err(ScheduleError::UnknownPlayer { .. })));
        assert_eq!(state.swap_player(99, 0, "I"), Err(ScheduleError::UnknownMatch(99)));
        assert_eq!(state.swap_player(0, 4, "I"), Err(ScheduleError::InvalidPosition(4)));
        assert_eq!(state, before);
    }

    #[test]
    fn player_absent_from_the_slot_is_unknown() {
        let mut roster: Vec<Attendee> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| Attendee::new(*n, Gender::M, t("19:00"), t("20:00")))
            .collect();
        roster.push(Attendee::new("Late", Gender::F, t("19:30"), t("20:00")));
        let courts = vec![Court::new("1", t("19:00"), t("20:00"))];
        let mut state = ScheduleBuilder::new(roster, courts).build().unwrap();

        // Late only idles at 19:30, never at 19:00
        assert!(state.idle[&state.slots[0]].is_empty());
        assert_eq!(state.idle[&state.slots[1]], ["D"]);
        assert_eq!(
            state.swap_player(0, 0, "Late"),
            Err(ScheduleError::UnknownPlayer { name: "Late".into(), slot: state.slots[0] })
        );
        assert_eq!(state.swap_player(1, 0, "D").unwrap(), SwapOutcome::FromIdle { displaced: Some("Late".into()) });
    }

    #[test]
    fn reset_then_refill_from_idle() {
        let mut state = built();
        assert_eq!(state.reset_all_assignments(), ResetOutcome::Reset { released: 16 });
        assert!(state.matches.iter().all(Match::is_empty));
        assert!(state.games_played.values().all(|&g| g == 0));
        assert_eq!(state.idle[&state.slots[0]].len(), 9);
        assert_conserved(&state);

        let outcome = state.swap_player(0, 2, "G").unwrap();
        assert_eq!(outcome, SwapOutcome::FromIdle { displaced: None });
        assert_eq!(state.games_played["G"], 1);
        assert_conserved(&state);
    }

    #[test]
    fn second_reset_is_a_no_op() {
        let mut state = built();
        state.reset_all_assignments();
        let after_first = state.clone();
        assert_eq!(state.reset_all_assignments(), ResetOutcome::AlreadyEmpty);
        assert_eq!(state, after_first);
    }

    #[test]
    fn set_score_only_touches_the_score() {
        let mut state = built();
        let counters = state.games_played.clone();
        state.set_score(1, 0, 6).unwrap();
        state.set_score(1, 1, 11).unwrap();
        assert_eq!(state.matches[1].score, [6, 11]);
        assert!(state.matches[1].is_completed());
        assert!(!state.matches[0].is_completed());
        assert_eq!(state.games_played, counters);
        assert_eq!(state.set_score(1, 2, 3), Err(ScheduleError::InvalidTeam(2)));
        assert_eq!(state.set_score(42, 0, 3), Err(ScheduleError::UnknownMatch(42)));
    }
}
