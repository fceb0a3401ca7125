use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Photo ID card as kept by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "deserialize_card_id")]
    pub id: u32,
    pub user_id: String,
    /// `"YYYY-YYYY"`; the end year fixes the expiration date.
    pub academic_year: String,
    /// Seconds since the epoch.
    pub issued: i64,
    pub enabled: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardStatus {
    Active,
    Expired,
    Disabled,
}

impl CardStatus {
    /// Only active cards get the green border and open the door.
    pub fn is_usable(self) -> bool {
        self == CardStatus::Active
    }
}

/// Card document left out of the lifecycle because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCard {
    /// The id exactly as stored, e.g. `"A00043"`.
    pub id: String,
    pub user_id: Option<String>,
    pub academic_year: Option<String>,
    pub issued: Option<i64>,
    pub error: String,
}

/// One entry of the card collection. A document that does not parse as a
/// [`Card`] is kept as [`CardEntry::Rejected`] so the rest still load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEntry {
    Card(Card),
    Rejected(RejectedCard),
}

impl CardEntry {
    pub fn from_value(value: Value) -> Self {
        match Card::deserialize(&value) {
            Ok(card) => CardEntry::Card(card),
            Err(e) => {
                let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
                let rejected = RejectedCard {
                    id: value.get("id").map(raw_text).unwrap_or_default(),
                    user_id: text("user_id"),
                    academic_year: text("academic_year"),
                    issued: value.get("issued").and_then(Value::as_i64),
                    error: e.to_string(),
                };

                tracing::warn!(card_id = %rejected.id, error = %e, "Skipping unreadable card");
                CardEntry::Rejected(rejected)
            }
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            CardEntry::Card(card) => Some(&card.user_id),
            CardEntry::Rejected(rejected) => rejected.user_id.as_deref(),
        }
    }
}

impl From<Card> for CardEntry {
    fn from(card: Card) -> Self {
        CardEntry::Card(card)
    }
}

impl<'de> Deserialize<'de> for CardEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(CardEntry::from_value)
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// Older documents persisted the id already zero-padded ("000042").
#[derive(Deserialize)]
#[serde(untagged)]
enum CardIdRepr {
    Number(u32),
    Text(String),
}

fn deserialize_card_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match CardIdRepr::deserialize(deserializer)? {
        CardIdRepr::Number(id) => Ok(id),
        CardIdRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid card id {text:?}: {e}"))),
    }
}
