use serde::{Deserialize, Serialize};

use super::attendance::{AttendanceRecord, Session};

/// User document as returned by the roster endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScanOutcome {
    CheckedIn,
    CheckedOut { minutes_earned: i64 },
}

impl User {
    /// Applies one RFID scan taken at `now` on day `today`.
    ///
    /// Closes the first open session dated `today` and credits the whole
    /// minutes spent to `score`, or opens a new session when there is none.
    /// Open sessions left on earlier days are not touched.
    pub fn record_scan(&mut self, today: &str, now: i64) -> ScanOutcome {
        let open_today = self
            .attendance
            .iter_mut()
            .find(|record| record.is_open() && record.date == today);

        match open_today {
            Some(record) => {
                let check_in = record.check_in();
                record.session = Session::Closed {
                    check_in,
                    check_out: now,
                };

                // whole minutes, truncated toward zero
                let minutes_earned = now.saturating_sub(check_in) / 60;
                self.score = self.score.saturating_add(minutes_earned);
                tracing::debug!(user_id = %self.id, minutes_earned, "Checked out");

                ScanOutcome::CheckedOut { minutes_earned }
            }
            None => {
                self.attendance.push(AttendanceRecord::open(today, now));
                tracing::debug!(user_id = %self.id, "Checked in");

                ScanOutcome::CheckedIn
            }
        }
    }

    /// End-of-day sweep: closes every open session and flags it as automatic.
    ///
    /// Today's sessions close at `now`. Sessions left open on earlier days
    /// close at their own check-in, so they keep contributing nothing. No
    /// score is credited. Returns how many sessions were closed.
    pub fn auto_checkout(&mut self, today: &str, now: i64) -> usize {
        let mut closed = 0;

        for record in self.attendance.iter_mut().filter(|record| record.is_open()) {
            let check_in = record.check_in();
            let check_out = if record.date == today { now } else { check_in };

            record.session = Session::Closed {
                check_in,
                check_out,
            };
            record.auto_checkout = true;
            closed += 1;
        }

        if closed > 0 {
            tracing::debug!(user_id = %self.id, closed, "Auto checkout");
        }
        closed
    }
}
