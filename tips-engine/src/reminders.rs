use chrono::{Duration, NaiveDateTime};
use tips_core::DangerLevel;

/// Lead times before an appointment, most distant first.
pub fn reminder_offsets(level: DangerLevel) -> Vec<Duration> {
    match level {
        DangerLevel::Urgent => vec![
            Duration::days(7),
            Duration::days(3),
            Duration::hours(24),
            Duration::hours(6),
            Duration::hours(2),
        ],
        DangerLevel::Elevated => vec![Duration::days(7), Duration::hours(48), Duration::hours(12)],
        DangerLevel::Routine => vec![Duration::hours(72), Duration::hours(24)],
    }
}

/// Reminder times for an appointment, dropping any not after `now`.
pub fn reminder_schedule(
    appointment_at: NaiveDateTime,
    level: DangerLevel,
    now: NaiveDateTime,
) -> Vec<NaiveDateTime> {
    reminder_offsets(level)
        .into_iter()
        .map(|lead| appointment_at - lead)
        .filter(|remind_at| *remind_at > now)
        .collect()
}
