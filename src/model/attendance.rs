use serde::{Deserialize, Serialize};

/// A single check-in/check-out pair. Instants are seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Closed { check_in: i64, check_out: i64 },
    /// The user is still checked in.
    Open { check_in: i64 },
}

/// One attendance entry as stored on the user document.
///
/// On the wire this is `{ "date": "05/14/25", "in": 1747224000, "out": null }`;
/// a null or missing `out` marks an open session. `"auto": true` is set
/// when the session was closed by the end-of-day sweep instead of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttendanceRow", into = "AttendanceRow")]
pub struct AttendanceRecord {
    pub date: String,
    pub session: Session,
    pub auto_checkout: bool,
}

#[derive(Serialize, Deserialize)]
struct AttendanceRow {
    date: String,
    #[serde(rename = "in")]
    check_in: i64,
    #[serde(rename = "out", default)]
    check_out: Option<i64>,
    #[serde(rename = "auto", default, skip_serializing_if = "std::ops::Not::not")]
    auto_checkout: bool,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        let session = match row.check_out {
            Some(check_out) => Session::Closed {
                check_in: row.check_in,
                check_out,
            },
            None => Session::Open {
                check_in: row.check_in,
            },
        };

        Self {
            date: row.date,
            session,
            auto_checkout: row.auto_checkout,
        }
    }
}

impl From<AttendanceRecord> for AttendanceRow {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            check_in: record.check_in(),
            check_out: record.check_out(),
            auto_checkout: record.auto_checkout,
            date: record.date,
        }
    }
}

impl AttendanceRecord {
    pub fn closed(date: impl Into<String>, check_in: i64, check_out: i64) -> Self {
        Self {
            date: date.into(),
            session: Session::Closed {
                check_in,
                check_out,
            },
            auto_checkout: false,
        }
    }

    pub fn open(date: impl Into<String>, check_in: i64) -> Self {
        Self {
            date: date.into(),
            session: Session::Open { check_in },
            auto_checkout: false,
        }
    }

    pub fn check_in(&self) -> i64 {
        match self.session {
            Session::Closed { check_in, .. } | Session::Open { check_in } => check_in,
        }
    }

    pub fn check_out(&self) -> Option<i64> {
        match self.session {
            Session::Closed { check_out, .. } => Some(check_out),
            Session::Open { .. } => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.session, Session::Open { .. })
    }

    /// `out - in` for a closed session. Not clamped: a check-out before the
    /// check-in yields a negative value. Saturates at the `i64` bounds.
    pub fn closed_duration(&self) -> Option<i64> {
        match self.session {
            Session::Closed {
                check_in,
                check_out,
            } => Some(check_out.saturating_sub(check_in)),
            Session::Open { .. } => None,
        }
    }
}

/// Presence totals for one day bucket.
///
/// `total_seconds` depends on the clock when the bucket is today's and holds
/// an open session, so summaries are rebuilt for every presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub records: Vec<AttendanceRecord>,
    pub total_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({ "date": "01/01/24", "in": 10, "out": null }))]
    #[case(json!({ "date": "01/01/24", "in": 10 }))]
    fn null_or_missing_out_is_an_open_session(#[case] raw: serde_json::Value) {
        let record: AttendanceRecord = serde_json::from_value(raw).unwrap();

        assert_eq!(record, AttendanceRecord::open("01/01/24", 10));
        assert!(record.is_open());
        assert_eq!(record.closed_duration(), None);
    }

    #[rstest]
    fn present_out_is_closed_even_when_before_in() {
        let record: AttendanceRecord =
            serde_json::from_value(json!({ "date": "01/01/24", "in": 500, "out": 400 })).unwrap();

        assert!(!record.is_open());
        assert_eq!(record.closed_duration(), Some(-100));
    }

    #[rstest]
    fn extreme_instants_saturate() {
        assert_eq!(
            AttendanceRecord::closed("d", i64::MIN, 1).closed_duration(),
            Some(i64::MAX)
        );
        assert_eq!(
            AttendanceRecord::closed("d", i64::MAX, i64::MIN).closed_duration(),
            Some(i64::MIN)
        );
    }

    #[rstest]
    fn auto_flag_round_trips_only_when_set() {
        let record: AttendanceRecord = serde_json::from_value(
            json!({ "date": "01/02/24", "in": 1, "out": 2, "auto": true }),
        )
        .unwrap();
        assert!(record.auto_checkout);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "date": "01/02/24", "in": 1, "out": 2, "auto": true })
        );

        let manual = serde_json::to_value(AttendanceRecord::closed("01/02/24", 1, 2)).unwrap();
        assert_eq!(manual, json!({ "date": "01/02/24", "in": 1, "out": 2 }));
    }

    #[rstest]
    fn open_session_serializes_with_null_out() {
        let value = serde_json::to_value(AttendanceRecord::open("01/02/24", 42)).unwrap();

        assert_eq!(value, json!({ "date": "01/02/24", "in": 42, "out": null }));
    }
}
