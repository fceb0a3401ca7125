use std::collections::HashMap;

use crate::model::{AttendanceRecord, DaySummary};

/// ===============================
/// Day buckets
/// ===============================
///
/// Records grouped by their exact `date` key. Buckets iterate in order of
/// first appearance and keep arrival order inside each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateGroups {
    buckets: Vec<(String, Vec<AttendanceRecord>)>,
    index: HashMap<String, usize>,
}

impl DateGroups {
    fn push(&mut self, record: AttendanceRecord) {
        match self.index.get(&record.date) {
            Some(&slot) => self.buckets[slot].1.push(record),
            None => {
                self.index.insert(record.date.clone(), self.buckets.len());
                self.buckets.push((record.date.clone(), vec![record]));
            }
        }
    }

    pub fn get(&self, date: &str) -> Option<&[AttendanceRecord]> {
        self.index
            .get(date)
            .map(|&slot| self.buckets[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttendanceRecord])> {
        self.buckets
            .iter()
            .map(|(date, records)| (date.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl IntoIterator for DateGroups {
    type Item = (String, Vec<AttendanceRecord>);
    type IntoIter = std::vec::IntoIter<(String, Vec<AttendanceRecord>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Buckets `records` by date key. Keys are compared verbatim; callers must
/// supply one canonical date format.
pub fn group_by_date(records: &[AttendanceRecord]) -> DateGroups {
    let mut groups = DateGroups::default();
    for record in records {
        groups.push(record.clone());
    }
    groups
}

pub fn records_for_date(records: &[AttendanceRecord], date: &str) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|record| record.date == date)
        .cloned()
        .collect()
}

/// Totals one day bucket.
///
/// Closed sessions add `out - in` unclamped. An open session only counts on
/// `current_date`, where it accrues up to `now`; open sessions on any other
/// day are stale and add nothing. Arithmetic saturates at the `i64` bounds.
pub fn summarize_day(
    date: &str,
    records: Vec<AttendanceRecord>,
    now: i64,
    current_date: &str,
) -> DaySummary {
    let is_today = date == current_date;

    let total_seconds = records
        .iter()
        .map(|record| match record.closed_duration() {
            Some(duration) => duration,
            None if is_today => now.saturating_sub(record.check_in()),
            None => {
                tracing::debug!(date, check_in = record.check_in(), "Ignoring stale open session");
                0
            }
        })
        .fold(0i64, i64::saturating_add);

    DaySummary {
        date: date.to_string(),
        records,
        total_seconds,
    }
}

/// Builds the day list shown on a profile: `current_date` first (present
/// even without records), then every other day in order of first appearance.
///
/// `now` must be sampled once by the caller so every bucket sees the same clock.
pub fn build_day_summaries(
    all_records: &[AttendanceRecord],
    current_date: &str,
    now: i64,
) -> Vec<DaySummary> {
    let groups = group_by_date(all_records);
    let mut today_records = Vec::new();
    let mut past = Vec::with_capacity(groups.len());

    for (date, records) in groups {
        if date == current_date {
            today_records = records;
        } else {
            past.push(summarize_day(&date, records, now, current_date));
        }
    }

    let mut summaries = Vec::with_capacity(past.len() + 1);
    summaries.push(summarize_day(current_date, today_records, now, current_date));
    summaries.extend(past);

    tracing::debug!(
        records = all_records.len(),
        days = summaries.len(),
        "Built day summaries"
    );

    summaries
}

/// True when the most recent record is today's and still open.
pub fn is_present(records: &[AttendanceRecord], today: &str) -> bool {
    records
        .last()
        .is_some_and(|record| record.date == today && record.is_open())
}
