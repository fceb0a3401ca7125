use chrono::{DateTime, Days, TimeZone};
use serde::Serialize;

use crate::model::{AttendanceRecord, User};
use crate::utils::format::date_key;

/// Today plus the seven days before it.
const WEEK_DAYS_BACK: u64 = 7;
pub const HISTORY_LIMIT: usize = 100;

/// ===============================
/// Visit counters
/// ===============================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub date: String,
    /// Check-ins on that day, open ones included.
    pub total_visits: usize,
    pub unique_visitors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    #[serde(flatten)]
    pub visits: DayStats,
    pub completed_visits: usize,
    /// Mean of closed sessions, rounded to two decimals; 0 when none closed.
    pub average_duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub date: String,
    pub check_in: i64,
    pub check_out: Option<i64>,
    /// Whole minutes, truncated toward zero. `None` while still open.
    pub duration_minutes: Option<i64>,
    pub auto_checkout: bool,
}

fn records_on<'a>(user: &'a User, date: &'a str) -> impl Iterator<Item = &'a AttendanceRecord> {
    user.attendance.iter().filter(move |record| record.date == date)
}

pub fn day_stats(users: &[User], date: &str) -> DayStats {
    let (total_visits, unique_visitors) = users
        .iter()
        .map(|user| records_on(user, date).count())
        .filter(|&visits| visits > 0)
        .fold((0, 0), |(total, unique), visits| (total + visits, unique + 1));

    DayStats {
        date: date.to_string(),
        total_visits,
        unique_visitors,
    }
}

/// Visit counts for `date` plus the average length of the sessions that
/// were closed that day.
pub fn daily_stats(users: &[User], date: &str) -> DailyStats {
    let durations: Vec<i64> = users
        .iter()
        .flat_map(|user| records_on(user, date))
        .filter_map(AttendanceRecord::closed_duration)
        .collect();

    let average_duration_minutes = if durations.is_empty() {
        0.0
    } else {
        let total_minutes: f64 = durations.iter().map(|&seconds| seconds as f64 / 60.0).sum();
        (total_minutes / durations.len() as f64 * 100.0).round() / 100.0
    };

    DailyStats {
        visits: day_stats(users, date),
        completed_visits: durations.len(),
        average_duration_minutes,
    }
}

/// Per-day counters for the eight calendar days ending on `now`'s day
/// (in `now`'s zone), oldest first. Days without visits are left out.
pub fn weekly_stats<Tz: TimeZone>(users: &[User], now: &DateTime<Tz>) -> Vec<DayStats> {
    let today = now.date_naive();

    (0..=WEEK_DAYS_BACK)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| day_stats(users, &date_key(&day)))
        .filter(|stats| stats.total_visits > 0)
        .collect()
}

/// Most recent sessions first, at most `limit` of them.
pub fn user_history(records: &[AttendanceRecord], limit: usize) -> Vec<HistoryEntry> {
    let mut ordered: Vec<&AttendanceRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.check_in().cmp(&a.check_in()));

    ordered
        .into_iter()
        .take(limit)
        .map(|record| HistoryEntry {
            date: record.date.clone(),
            check_in: record.check_in(),
            check_out: record.check_out(),
            duration_minutes: record.closed_duration().map(|seconds| seconds / 60),
            auto_checkout: record.auto_checkout,
        })
        .collect()
}
