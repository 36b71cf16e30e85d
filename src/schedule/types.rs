use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Index of a match inside a `ScheduleState`
pub type MatchId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

/// A roster member with a personal availability window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub available_from: Option<NaiveTime>,
    #[serde(default)]
    pub available_until: Option<NaiveTime>,
}

impl Attendee {
    pub fn new(name: impl Into<String>, gender: Gender, from: NaiveTime, until: NaiveTime) -> Self {
        Self {
            name: name.into(),
            gender,
            available_from: Some(from),
            available_until: Some(until),
        }
    }

    /// The attendee's window, or `None` when either bound is missing or the
    /// window is empty
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.available_from, self.available_until) {
            (Some(from), Some(until)) if from < until => Some((from, until)),
            _ => None,
        }
    }

    pub fn is_present_at(&self, slot: TimeSlot) -> bool {
        self.window()
            .map(|(from, until)| from <= slot.time() && slot.time() < until)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub label: String,
    pub available_from: NaiveTime,
    pub available_until: NaiveTime,
}

impl Court {
    pub fn new(label: impl Into<String>, from: NaiveTime, until: NaiveTime) -> Self {
        Self {
            label: label.into(),
            available_from: from,
            available_until: until,
        }
    }

    pub fn is_open_at(&self, slot: TimeSlot) -> bool {
        self.available_from <= slot.time() && slot.time() < self.available_until
    }
}

/// A discrete point in the scheduling range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Start and end of one scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Earliest court opening to latest court closing
    pub fn spanning(courts: &[Court]) -> Option<Self> {
        let start = courts.iter().map(|c| c.available_from).min()?;
        let end = courts.iter().map(|c| c.available_until).max()?;
        Some(Self { start, end })
    }
}

/// One court in one slot. Positions 0 and 1 are team A, 2 and 3 team B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub slot: TimeSlot,
    pub court: String,
    pub players: [Option<String>; 4],
    pub score: [u32; 2],
    /// Set once a score has been entered; unscored matches are not results
    #[serde(default)]
    pub scored: bool,
}

impl Match {
    pub fn new(id: MatchId, slot: TimeSlot, court: impl Into<String>, players: [String; 4]) -> Self {
        Self {
            id,
            slot,
            court: court.into(),
            players: players.map(Some),
            score: [0, 0],
            scored: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.iter().all(Option::is_none)
    }

    /// Played to a final score with at least one player seated
    pub fn is_completed(&self) -> bool {
        self.scored && !self.is_empty()
    }

    pub fn seated(&self) -> impl Iterator<Item = &str> {
        self.players.iter().flatten().map(String::as_str)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.as_deref() == Some(name))
    }
}

/// Full result of a scheduling run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub slots: Vec<TimeSlot>,
    pub matches: Vec<Match>,
    pub idle: BTreeMap<TimeSlot, Vec<String>>,
    pub games_played: BTreeMap<String, u32>,
    /// Set once a manual edit changed the state; regenerating discards it
    #[serde(default)]
    pub manually_edited: bool,
}

/// Games and idle turns of one player across a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub games: u32,
    pub idle: u32,
}
