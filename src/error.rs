use derive_more::Display;

/// ===============================
/// Academic year parsing errors
/// ===============================
///
/// Raised per card; callers decide whether to skip the card or surface the
/// message, but never substitute a default expiration.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FormatError {
    #[display(fmt = "academic year {:?} has no '-' separator", _0)]
    MissingSeparator(String),

    #[display(fmt = "academic year {:?} has more than one '-' separator", _0)]
    TooManySeparators(String),

    #[display(fmt = "academic year {:?} does not end with an integer year", _0)]
    InvalidYear(String),

    #[display(fmt = "May 22 {} has no local midnight", _0)]
    UnrepresentableDate(i32),
}

impl std::error::Error for FormatError {}
