use chrono::NaiveTime;

use crate::schedule::types::{MatchId, TimeSlot};

/// Errors raised by the scheduling engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("start time {start} must be before end time {end}")]
    InvalidRange { start: NaiveTime, end: NaiveTime },
    #[error("slot step must be at least one minute")]
    InvalidStep,
    #[error("no time range given and no courts to derive one from")]
    NoTimeRange,
    #[error("attendee {0:?} appears more than once in the roster")]
    DuplicateAttendee(String),
    #[error("{name:?} is not present at {slot}")]
    UnknownPlayer { name: String, slot: TimeSlot },
    #[error("no match with id {0}")]
    UnknownMatch(MatchId),
    #[error("position {0} is out of range (0-3)")]
    InvalidPosition(usize),
    #[error("team {0} is out of range (0 or 1)")]
    InvalidTeam(usize),
}

/// Errors raised while loading roster, court or result files
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
