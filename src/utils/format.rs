use chrono::{Datelike, TimeZone, Timelike};

/// `HH:MM` from a number of seconds. Hours are not wrapped into days, so a
/// 25 hour total reads `25:00`.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let magnitude = seconds.unsigned_abs();

    format!(
        "{sign}{:02}:{:02}",
        magnitude / 3600,
        (magnitude % 3600) / 60
    )
}

/// 12-hour `h:mm` wall clock time, without AM/PM.
pub fn format_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<String> {
    let local = tz.timestamp_opt(timestamp, 0).single()?;
    let (_, hour) = local.hour12();

    Some(format!("{hour}:{:02}", local.minute()))
}

/// US short date, `M/D/YYYY`.
pub fn format_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<String> {
    let local = tz.timestamp_opt(timestamp, 0).single()?;

    Some(format!("{}/{}/{}", local.month(), local.day(), local.year()))
}

/// Day bucket key `MM/DD/YY`, the format check-ins are stored under.
pub fn date_key<D: Datelike>(day: &D) -> String {
    format!(
        "{:02}/{:02}/{:02}",
        day.month(),
        day.day(),
        day.year().rem_euclid(100)
    )
}
