use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::model::{CardEntry, CardStatus, DaySummary, User};
use crate::services::{
    build_day_summaries, daily_stats, evaluate_card, format_card_id, is_present, ranked,
    user_history, weekly_stats, CardEvaluation, DailyStats, DayStats, HistoryEntry, RankedUser,
    HISTORY_LIMIT,
};
use crate::utils::format::{date_key, format_date, format_duration, format_time};

const UNKNOWN: &str = "?";
const STILL_PRESENT: &str = "Present";

/// Everything the dashboard fetched in one pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub cards: Vec<CardEntry>,
}

impl Snapshot {
    /// Runs the end-of-day sweep over every user. Returns the number of
    /// sessions closed.
    pub fn auto_checkout(&mut self, today: &str, now: i64) -> usize {
        self.users
            .iter_mut()
            .map(|user| user.auto_checkout(today, now))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub date: String,
    pub daily: DailyStats,
    pub week: Vec<DayStats>,
    pub users: Vec<UserReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReport {
    #[serde(flatten)]
    pub standing: RankedUser,
    pub present: bool,
    pub days: Vec<DayReport>,
    pub cards: Vec<CardReport>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: String,
    pub today: bool,
    pub total_seconds: i64,
    pub duration: String,
    pub sessions: Vec<SessionSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSpan {
    pub check_in: String,
    pub check_out: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CardReport {
    Evaluated {
        id: String,
        academic_year: String,
        issued: String,
        expires: String,
        days_until: i64,
        status: CardStatus,
        usable: bool,
    },
    /// Unreadable document or malformed academic year.
    Invalid {
        id: String,
        academic_year: String,
        issued: String,
        error: String,
    },
}

fn day_report<Tz: TimeZone>(summary: DaySummary, today: &str, tz: &Tz) -> DayReport {
    let sessions = summary
        .records
        .iter()
        .map(|record| SessionSpan {
            check_in: format_time(record.check_in(), tz).unwrap_or_else(|| UNKNOWN.to_string()),
            check_out: match record.check_out() {
                Some(out) => format_time(out, tz).unwrap_or_else(|| UNKNOWN.to_string()),
                None => STILL_PRESENT.to_string(),
            },
        })
        .collect();

    DayReport {
        today: summary.date == today,
        duration: format_duration(summary.total_seconds),
        total_seconds: summary.total_seconds,
        date: summary.date,
        sessions,
    }
}

fn card_report<Tz: TimeZone>(evaluation: CardEvaluation, tz: &Tz) -> CardReport {
    let CardEvaluation { card, outcome } = evaluation;
    let id = format_card_id(card.id);
    let issued = format_date(card.issued, tz).unwrap_or_else(|| UNKNOWN.to_string());

    match outcome {
        Ok(lifecycle) => CardReport::Evaluated {
            id,
            academic_year: card.academic_year,
            issued,
            expires: format_date(lifecycle.expires_at, tz).unwrap_or_else(|| UNKNOWN.to_string()),
            days_until: lifecycle.days_until,
            status: lifecycle.status,
            usable: lifecycle.status.is_usable(),
        },
        Err(e) => CardReport::Invalid {
            id,
            academic_year: card.academic_year,
            issued,
            error: e.to_string(),
        },
    }
}

/// Newest card first. Entries that failed to load are listed as invalid
/// next to the evaluated ones.
fn card_section<Tz: TimeZone>(
    entries: &[CardEntry],
    user_id: &str,
    now: &DateTime<Tz>,
) -> Vec<CardReport> {
    let tz = now.timezone();

    entries
        .iter()
        .rev()
        .filter(|entry| entry.user_id() == Some(user_id))
        .map(|entry| match entry {
            CardEntry::Card(card) => card_report(evaluate_card(card, now), &tz),
            CardEntry::Rejected(rejected) => CardReport::Invalid {
                id: rejected.id.clone(),
                academic_year: rejected.academic_year.clone().unwrap_or_default(),
                issued: rejected
                    .issued
                    .and_then(|ts| format_date(ts, &tz))
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                error: rejected.error.clone(),
            },
        })
        .collect()
}

/// Today's counters, the past week and one report per user in leaderboard
/// order.
///
/// `now` is the single clock sample used for every user and card.
#[instrument(
    name = "build_report",
    skip_all,
    fields(users = snapshot.users.len(), cards = snapshot.cards.len())
)]
pub fn build_report<Tz: TimeZone>(snapshot: &Snapshot, now: &DateTime<Tz>) -> Report {
    let tz = now.timezone();
    let today = date_key(now);
    let timestamp = now.timestamp();

    let users: Vec<UserReport> = ranked(&snapshot.users)
        .map(|(standing, user)| {
            let days = build_day_summaries(&user.attendance, &today, timestamp)
                .into_iter()
                .map(|summary| day_report(summary, &today, &tz))
                .collect();

            UserReport {
                present: is_present(&user.attendance, &today),
                days,
                cards: card_section(&snapshot.cards, &user.id, now),
                history: user_history(&user.attendance, HISTORY_LIMIT),
                standing,
            }
        })
        .collect();

    tracing::info!(today = %today, reports = users.len(), "Report built");

    Report {
        daily: daily_stats(&snapshot.users, &today),
        week: weekly_stats(&snapshot.users, now),
        date: today,
        users,
    }
}
