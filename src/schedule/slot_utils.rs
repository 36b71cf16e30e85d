use chrono::{Duration, NaiveTime};

use crate::error::ScheduleError;
use super::types::TimeSlot;

/// Slot width used by the club unless configured otherwise
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// Parses a time string (HH:MM or HH:MM:SS)
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
    let trimmed = time_str.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

/// Calculates the time slots of a run
/// Slot 1 = start, every following slot = previous + step_minutes,
/// continuing while the slot is strictly before end
pub fn time_slots(start: NaiveTime, end: NaiveTime, step_minutes: u32) -> Result<Vec<TimeSlot>, ScheduleError> {
    if start >= end {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    if step_minutes == 0 {
        return Err(ScheduleError::InvalidStep);
    }

    let step = Duration::minutes(i64::from(step_minutes));
    let mut slots = Vec::new();
    let mut current = start;

    while current < end {
        slots.push(TimeSlot::new(current));
        let (next, wrapped) = current.overflowing_add_signed(step);
        // Past midnight means past end
        if wrapped != 0 {
            break;
        }
        current = next;
    }

    Ok(slots)
}
