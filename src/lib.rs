//! Fair doubles scheduling for a club night.
//!
//! A roster with personal arrival/departure times and a set of courts with
//! their own opening hours are cut into fixed time slots. Every open court in
//! every slot gets the four present players with the fewest games so far;
//! everyone else present sits idle. The resulting [`ScheduleState`] can be
//! edited by hand, and [`stats`] turns finished matches into standings.

pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod schedule;
pub mod stats;
pub mod web;

pub use config::SchedulerConfig;
pub use error::{InputError, ScheduleError};
pub use schedule::{
    Attendee, Court, Gender, Match, MatchId, ResetOutcome, ScheduleBuilder, ScheduleState, SwapOutcome, TieBreak,
    TimeRange, TimeSlot,
};
pub use stats::{compute_pair_stats, compute_stats, pair_stats_for, MatchResult, PairStats, PlayerStats, WinRateBasis};
