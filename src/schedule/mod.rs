pub mod types;
pub mod slot_utils;
pub mod availability;
pub mod selector;
pub mod builder;
pub mod editor;
pub mod report;

pub use types::{Attendee, Court, Gender, Match, MatchId, PlayerSummary, ScheduleState, TimeRange, TimeSlot};
pub use slot_utils::{parse_time, time_slots};
pub use availability::{court_availability, eligible_at};
pub use selector::{FairAssignmentSelector, TieBreak};
pub use builder::ScheduleBuilder;
pub use editor::{ResetOutcome, SwapOutcome};
