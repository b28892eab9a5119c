//! Proposed appointment slots for a danger level.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use tips_core::{DangerLevel, SLOT_FORMAT};

/// Times of day cycled through by slot position.
pub const SLOT_TIMES: [(u32, u32); 5] = [(9, 0), (10, 30), (14, 0), (15, 30), (16, 0)];

/// Days from `now` for each of the three proposals.
pub fn day_offsets(level: DangerLevel) -> [i64; 3] {
    match level {
        DangerLevel::Urgent => [1, 3, 5],
        DangerLevel::Elevated => [5, 8, 12],
        DangerLevel::Routine => [28, 35, 42],
    }
}

/// Three weekday slots, in local wall-clock time.
pub fn proposed_slot_times(level: DangerLevel, now: NaiveDateTime) -> Vec<NaiveDateTime> {
    day_offsets(level)
        .iter()
        .enumerate()
        .filter_map(|(index, days)| {
            let (hour, minute) = SLOT_TIMES[index % SLOT_TIMES.len()];
            skip_weekend(now.date() + Duration::days(*days)).and_hms_opt(hour, minute, 0)
        })
        .collect()
}

/// Same as [`proposed_slot_times`], formatted `YYYY-MM-DD HH:MM`.
pub fn generate_proposed_slots(level: DangerLevel, now: NaiveDateTime) -> Vec<String> {
    proposed_slot_times(level, now)
        .into_iter()
        .map(|slot| slot.format(SLOT_FORMAT).to_string())
        .collect()
}

/// Sunday moves to Monday, Saturday moves to Monday.
fn skip_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sun => date + Duration::days(1),
        Weekday::Sat => date + Duration::days(2),
        _ => date,
    }
}
