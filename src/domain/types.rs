use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Substituted for any absent textual field of an upstream record.
pub const UNKNOWN: &str = "Unknown";

/// Opaque pagination token handed out by the upstream API.
///
/// Only emptiness is ever inspected; the content is forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor used for the first request of every pagination loop.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One parsed upstream page.
///
/// Parsing never fails: a payload that does not have the expected
/// envelope becomes [`Page::Malformed`], which callers treat as a
/// terminal page rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Valid {
        records: Vec<Value>,
        next_cursor: Cursor,
    },
    Malformed,
}

impl Page {
    /// Parses an envelope whose records live at the JSON pointer `records_at`
    /// and whose continuation token is the top-level `nextPageCursor`.
    pub fn parse(mut body: Value, records_at: &str) -> Self {
        if !body.is_object() {
            return Page::Malformed;
        }

        let next_cursor = match body.get("nextPageCursor") {
            Some(Value::String(token)) => Cursor::new(token.as_str()),
            _ => Cursor::start(),
        };

        match body.pointer_mut(records_at).map(Value::take) {
            Some(Value::Array(records)) => Page::Valid {
                records,
                next_cursor,
            },
            _ => Page::Malformed,
        }
    }

    /// `{ data: [...], nextPageCursor }`
    pub fn parse_data(body: Value) -> Self {
        Self::parse(body, "/data")
    }

    /// `{ data: { gamePasses: [...] }, nextPageCursor }`
    pub fn parse_game_passes(body: Value) -> Self {
        Self::parse(body, "/data/gamePasses")
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Page::Malformed)
    }
}

/// Integer field, truncating fractions. Values outside `i64` count as absent.
fn int_field(record: &Value, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    let parsed = if let Some(v) = value.as_i64() {
        Some(v)
    } else if let Some(v) = value.as_u64() {
        i64::try_from(v).ok()
    } else {
        value
            .as_f64()
            .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
            .map(|v| v.trunc() as i64)
    };

    if parsed.is_none() && !value.is_null() {
        debug!(field = key, value = %value, "Ignoring unusable integer field");
    }
    parsed
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// A user-created catalog asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub creator: String,
}

impl Item {
    /// Projects a raw catalog record, substituting defaults for absent fields.
    pub fn from_record(record: &Value) -> Self {
        let creator = record
            .get("creator")
            .and_then(|creator| str_field(creator, "name"))
            .or_else(|| str_field(record, "creatorName"))
            .unwrap_or(UNKNOWN);

        Self {
            id: int_field(record, "id").unwrap_or(0),
            name: str_field(record, "name").unwrap_or(UNKNOWN).to_string(),
            price: int_field(record, "price").unwrap_or(0),
            creator: creator.to_string(),
        }
    }
}

/// A monetization pass, joined with the name of the game it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub game_name: String,
}

impl Pass {
    /// Projects a raw pass record. The game name always comes from the
    /// enclosing game, never from the pass record.
    pub fn from_record(record: &Value, game: &Game) -> Self {
        let price = int_field(record, "priceInRobux")
            .or_else(|| int_field(record, "price"))
            .unwrap_or(0);

        Self {
            id: int_field(record, "id").unwrap_or(0),
            name: str_field(record, "name").unwrap_or(UNKNOWN).to_string(),
            price,
            game_name: game.name.clone(),
        }
    }
}

/// A published game owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Join key for the pass lookup. Games without one are skipped.
    pub universe_id: Option<u64>,
    pub name: String,
}

impl Game {
    pub fn from_record(record: &Value) -> Self {
        let raw = record.get("universeId").filter(|id| !id.is_null());
        let universe_id = raw.and_then(|id| match id {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        if let (Some(raw), None) = (raw, universe_id) {
            debug!(universe_id = %raw, "Ignoring unusable universeId");
        }

        Self {
            universe_id,
            name: str_field(record, "name").unwrap_or(UNKNOWN).to_string(),
        }
    }
}

/// Query for `GET /user-assets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserAssetsQuery {
    /// Creator name to search the catalog for
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,
}

/// Query for `GET /user-gamepasses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct UserGamePassesQuery {
    /// Numeric id of the user whose public games are scanned
    #[serde(default)]
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// Error detail in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub r#type: String,
    pub message: String,
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Liveness report for the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}
