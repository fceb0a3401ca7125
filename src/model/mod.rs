pub mod attendance;
pub mod card;
pub mod user;

pub use attendance::{AttendanceRecord, DaySummary, Session};
pub use card::{Card, CardEntry, CardStatus, RejectedCard};
pub use user::{ScanOutcome, User};
