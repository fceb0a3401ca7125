//! Attendance aggregation and ID-card lifecycle evaluation for the RFID
//! check-in dashboard.
//!
//! Everything here works on values the caller already fetched; the clock is
//! always passed in.

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod services;
pub mod utils;

pub use error::FormatError;
