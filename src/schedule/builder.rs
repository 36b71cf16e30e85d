use std::collections::{BTreeMap, HashSet};

use log::{debug, info};

use crate::error::ScheduleError;
use super::availability::{court_availability, eligible_at};
use super::selector::{FairAssignmentSelector, TieBreak};
use super::slot_utils::{time_slots, DEFAULT_STEP_MINUTES};
use super::types::{Attendee, Court, Match, ScheduleState, TimeRange};

/// Builds a complete schedule from a roster and a court configuration.
///
/// The builder owns copies of its inputs, so building never touches the
/// caller's roster and every `build` starts from a clean slate.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    roster: Vec<Attendee>,
    courts: Vec<Court>,
    range: Option<TimeRange>,
    step_minutes: u32,
    tie_break: TieBreak,
}

impl ScheduleBuilder {
    pub fn new(roster: Vec<Attendee>, courts: Vec<Court>) -> Self {
        Self {
            roster,
            courts,
            range: None,
            step_minutes: DEFAULT_STEP_MINUTES,
            tie_break: TieBreak::ByName,
        }
    }

    /// Explicit time range; without one the span of the court windows is used
    pub fn range(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn roster(&self) -> &[Attendee] {
        &self.roster
    }

    pub fn courts(&self) -> &[Court] {
        &self.courts
    }

    /// Runs the slot/court loop and returns a fresh state
    ///
    /// Courts are filled in configuration order against one shared pool per
    /// slot, so earlier courts always get first pick.
    pub fn build(&self) -> Result<ScheduleState, ScheduleError> {
        let mut seen = HashSet::new();
        for attendee in &self.roster {
            if !seen.insert(attendee.name.as_str()) {
                return Err(ScheduleError::DuplicateAttendee(attendee.name.clone()));
            }
        }

        let range = self
            .range
            .or_else(|| TimeRange::spanning(&self.courts))
            .ok_or(ScheduleError::NoTimeRange)?;
        let slots = time_slots(range.start, range.end, self.step_minutes)?;
        let open_courts = court_availability(&self.courts, &slots);

        let mut games_played: BTreeMap<String, u32> = self
            .roster
            .iter()
            .filter(|a| slots.iter().any(|&slot| a.is_present_at(slot)))
            .map(|a| (a.name.clone(), 0))
            .collect();
        let mut selector = FairAssignmentSelector::new(self.tie_break);
        let mut matches = Vec::new();
        let mut idle = BTreeMap::new();

        for &slot in &slots {
            let mut pool: Vec<String> = eligible_at(&self.roster, slot)
                .into_iter()
                .map(str::to_string)
                .collect();

            for court in open_courts.get(&slot).into_iter().flatten() {
                match selector.select(&mut pool, &mut games_played) {
                    Some(players) => {
                        let id = matches.len();
                        matches.push(Match::new(id, slot, court.clone(), players));
                    }
                    None => {
                        debug!("{}: court {} left empty, {} players remaining", slot, court, pool.len());
                        break;
                    }
                }
            }

            idle.insert(slot, pool);
        }

        info!(
            "Built schedule: {} slots, {} matches, {} players",
            slots.len(),
            matches.len(),
            games_played.len()
        );

        Ok(ScheduleState {
            slots,
            matches,
            idle,
            games_played,
            manually_edited: false,
        })
    }
}
