use chrono::{DateTime, Local, TimeZone};

use crate::error::FormatError;
use crate::model::{Card, CardStatus};

const EXPIRATION_MONTH: u32 = 5;
const EXPIRATION_DAY: u32 = 22;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Derived display state of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLifecycle {
    /// Seconds since the epoch.
    pub expires_at: i64,
    pub days_until: i64,
    pub status: CardStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEvaluation {
    pub card: Card,
    pub outcome: Result<CardLifecycle, FormatError>,
}

fn parse_end_year(academic_year: &str) -> Result<i32, FormatError> {
    let mut parts = academic_year.split('-');

    let end = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(end), None) => end,
        (_, None, _) => return Err(FormatError::MissingSeparator(academic_year.to_string())),
        _ => return Err(FormatError::TooManySeparators(academic_year.to_string())),
    };

    end.parse()
        .map_err(|_| FormatError::InvalidYear(academic_year.to_string()))
}

/// Midnight of May 22 of the academic year's end year, in `tz`.
pub fn compute_expiration_in<Tz: TimeZone>(
    academic_year: &str,
    tz: &Tz,
) -> Result<DateTime<Tz>, FormatError> {
    let year = parse_end_year(academic_year)?;

    tz.with_ymd_and_hms(year, EXPIRATION_MONTH, EXPIRATION_DAY, 0, 0, 0)
        .earliest()
        .ok_or(FormatError::UnrepresentableDate(year))
}

pub fn compute_expiration(academic_year: &str) -> Result<DateTime<Local>, FormatError> {
    compute_expiration_in(academic_year, &Local)
}

/// Whole days left before `expires_at`, rounded up. Negative once expired.
pub fn days_until<Tz: TimeZone>(expires_at: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    let millis = expires_at
        .timestamp_millis()
        .saturating_sub(now.timestamp_millis());

    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}

/// Disabled wins over expired; the expiration is only computed for enabled
/// cards, in the timezone of `now`.
pub fn classify<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> Result<CardStatus, FormatError> {
    if !card.enabled {
        return Ok(CardStatus::Disabled);
    }

    let expires_at = compute_expiration_in(&card.academic_year, &now.timezone())?;

    Ok(if *now > expires_at {
        CardStatus::Expired
    } else {
        CardStatus::Active
    })
}

pub fn format_card_id(id: u32) -> String {
    format!("{id:06}")
}

/// `MM/DD/YY` expiration sent along with a card issuance request.
pub fn expiration_key(academic_year: &str) -> Result<String, FormatError> {
    let year = parse_end_year(academic_year)?;

    Ok(format!(
        "{EXPIRATION_MONTH:02}/{EXPIRATION_DAY:02}/{:02}",
        year.rem_euclid(100)
    ))
}

fn lifecycle<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> Result<CardLifecycle, FormatError> {
    let expires_at = compute_expiration_in(&card.academic_year, &now.timezone())?;

    Ok(CardLifecycle {
        expires_at: expires_at.timestamp(),
        days_until: days_until(&expires_at, now),
        status: classify(card, now)?,
    })
}

pub fn evaluate_card<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> CardEvaluation {
    let outcome = lifecycle(card, now);
    if let Err(e) = &outcome {
        tracing::warn!(card_id = card.id, error = %e, "Card evaluation failed");
    }

    CardEvaluation {
        card: card.clone(),
        outcome,
    }
}

/// Evaluates every card against one clock sample, newest card first.
///
/// A card with a malformed academic year carries its own error; the rest of
/// the batch is still evaluated.
pub fn evaluate_cards<Tz: TimeZone>(cards: &[Card], now: &DateTime<Tz>) -> Vec<CardEvaluation> {
    cards.iter().rev().map(|card| evaluate_card(card, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};
    use rstest::{fixture, rstest};

    fn card(id: u32, academic_year: &str, enabled: bool) -> Card {
        Card {
            id,
            user_id: "jdoe25".to_string(),
            academic_year: academic_year.to_string(),
            issued: 1_700_000_000,
            enabled,
        }
    }

    #[fixture]
    fn expiry_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 22, 0, 0, 0).unwrap()
    }

    #[rstest]
    fn expiration_is_local_midnight_may_22_of_end_year() {
        let expected = Local
            .with_ymd_and_hms(2025, 5, 22, 0, 0, 0)
            .earliest()
            .unwrap();

        assert_eq!(compute_expiration("2024-2025").unwrap(), expected);
    }

    #[rstest]
    fn expiration_follows_the_given_zone() {
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();
        let expires = compute_expiration_in("2030-2031", &eastern).unwrap();

        assert_eq!(expires.to_rfc3339(), "2031-05-22T00:00:00-04:00");
    }

    #[rstest]
    #[case("2024/2025", FormatError::MissingSeparator("2024/2025".to_string()))]
    #[case("20242025", FormatError::MissingSeparator("20242025".to_string()))]
    #[case("2024-2025-2026", FormatError::TooManySeparators("2024-2025-2026".to_string()))]
    #[case("2024-", FormatError::InvalidYear("2024-".to_string()))]
    #[case("2024-20x5", FormatError::InvalidYear("2024-20x5".to_string()))]
    #[case("2024- 2025", FormatError::InvalidYear("2024- 2025".to_string()))]
    fn malformed_academic_year(#[case] academic_year: &str, #[case] expected: FormatError) {
        assert_eq!(compute_expiration_in(academic_year, &Utc), Err(expected));
    }

    #[rstest]
    fn out_of_range_year_is_unrepresentable() {
        assert_eq!(
            compute_expiration_in("0-999999999", &Utc),
            Err(FormatError::UnrepresentableDate(999_999_999))
        );
    }

    #[rstest]
    #[case(Duration::zero(), 0)]
    #[case(Duration::seconds(1), 1)]
    #[case(Duration::days(1), 1)]
    #[case(Duration::days(1) + Duration::milliseconds(1), 2)]
    #[case(Duration::seconds(-1), 0)]
    #[case(-Duration::days(1), -1)]
    #[case(-Duration::days(1) - Duration::seconds(1), -1)]
    #[case(-Duration::days(2), -2)]
    fn days_until_rounds_up(
        expiry_2025: DateTime<Utc>,
        #[case] remaining: Duration,
        #[case] days: i64,
    ) {
        let now = expiry_2025 - remaining;

        assert_eq!(days_until(&expiry_2025, &now), days);
    }

    #[rstest]
    #[case(true, Duration::seconds(-1), CardStatus::Active)]
    #[case(true, Duration::zero(), CardStatus::Active)]
    #[case(true, Duration::seconds(1), CardStatus::Expired)]
    #[case(false, Duration::days(-300), CardStatus::Disabled)]
    #[case(false, Duration::days(300), CardStatus::Disabled)]
    fn classification_table(
        expiry_2025: DateTime<Utc>,
        #[case] enabled: bool,
        #[case] offset: Duration,
        #[case] expected: CardStatus,
    ) {
        let now = expiry_2025 + offset;

        assert_eq!(classify(&card(1, "2024-2025", enabled), &now), Ok(expected));
    }

    #[rstest]
    fn classify_uses_local_expiration() {
        let expiry = compute_expiration("2024-2025").unwrap();
        let just_after = expiry + Duration::seconds(1);

        assert_eq!(
            classify(&card(1, "2024-2025", true), &just_after),
            Ok(CardStatus::Expired)
        );
    }

    #[rstest]
    fn disabled_card_skips_year_parsing(expiry_2025: DateTime<Utc>) {
        assert_eq!(
            classify(&card(1, "garbage", false), &expiry_2025),
            Ok(CardStatus::Disabled)
        );
        assert!(classify(&card(1, "garbage", true), &expiry_2025).is_err());
    }

    #[rstest]
    #[case(42, "000042")]
    #[case(0, "000000")]
    #[case(999_999, "999999")]
    #[case(1_234_567, "1234567")]
    fn card_id_padding(#[case] id: u32, #[case] rendered: &str) {
        assert_eq!(format_card_id(id), rendered);
    }

    #[rstest]
    #[case("2024-2025", "05/22/25")]
    #[case("2108-2109", "05/22/09")]
    fn issuance_expiration_key(#[case] academic_year: &str, #[case] key: &str) {
        assert_eq!(expiration_key(academic_year).unwrap(), key);
    }

    #[rstest]
    fn batch_isolates_malformed_cards(expiry_2025: DateTime<Utc>) {
        let now = expiry_2025 - Duration::days(10);
        let cards = vec![
            card(1, "2023-2024", true),
            card(2, "2024/2025", true),
            card(3, "2024-2025", true),
        ];

        let evaluations = evaluate_cards(&cards, &now);
        let ids: Vec<u32> = evaluations.iter().map(|e| e.card.id).collect();

        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(
            evaluations[0].outcome,
            Ok(CardLifecycle {
                expires_at: expiry_2025.timestamp(),
                days_until: 10,
                status: CardStatus::Active,
            })
        );
        assert_eq!(
            evaluations[1].outcome,
            Err(FormatError::MissingSeparator("2024/2025".to_string()))
        );
        assert_eq!(
            evaluations[2].outcome.as_ref().map(|l| l.status),
            Ok(CardStatus::Expired)
        );
        assert_eq!(
            evaluations[2].outcome.as_ref().map(|l| l.days_until),
            Ok(-355)
        );
    }
}
