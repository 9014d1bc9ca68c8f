//! Text codec for the persisted card collection.
//!
//! # Responsibility
//! - Encode a card collection into one self-describing JSON document.
//! - Decode it back without losing the type of date fields.
//!
//! # Invariants
//! - Output is deterministic for a given collection.
//! - Every date field is tagged `Date` in `meta.values`; an untagged date
//!   is rejected instead of being read as a plain string.
//! - `decode(encode(cards)) == cards`.
//!
//! # Format
//! ```json
//! {"json":[{"id":"..","name":"..","data":[true],"createdAt":"2024-09-20T10:00:00Z"}],
//!  "meta":{"values":{"0.createdAt":["Date"]}}}
//! ```
//! This is the superjson envelope used by the browser version, so its
//! stores decode as-is.

use crate::model::card::{Card, CardId};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_TAG: &str = "Date";
const CREATED_AT_FIELD: &str = "createdAt";

pub type CodecResult<T> = Result<T, CodecError>;

/// Structural decode/encode failure.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    /// A date field has no `Date` annotation in `meta.values`.
    MissingDateTag { path: String },
    /// A tagged date field does not hold an RFC 3339 timestamp.
    InvalidDate { path: String, value: String },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed card document: {err}"),
            Self::MissingDateTag { path } => {
                write!(f, "field `{path}` is not tagged as `{DATE_TAG}`")
            }
            Self::InvalidDate { path, value } => {
                write!(f, "field `{path}` holds an invalid date `{value}`")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::MissingDateTag { .. } | Self::InvalidDate { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    json: Vec<CardRecord>,
    #[serde(default, skip_serializing_if = "Meta::is_empty")]
    meta: Meta,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Meta {
    #[serde(default)]
    values: BTreeMap<String, Value>,
}

impl Meta {
    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn is_date(&self, path: &str) -> bool {
        match self.values.get(path) {
            Some(Value::Array(tags)) => tags.first().and_then(Value::as_str) == Some(DATE_TAG),
            Some(Value::String(tag)) => tag == DATE_TAG,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    id: String,
    name: String,
    data: Vec<bool>,
    created_at: String,
}

/// Encodes `cards` into the persisted text form.
pub fn encode(cards: &[Card]) -> CodecResult<String> {
    let mut meta = Meta::default();
    let json: Vec<CardRecord> = cards
        .iter()
        .enumerate()
        .map(|(position, card)| {
            meta.values.insert(
                created_at_path(position),
                Value::Array(vec![Value::String(DATE_TAG.to_string())]),
            );
            CardRecord {
                id: card.id.as_str().to_string(),
                name: card.name.clone(),
                data: card.entries.clone(),
                created_at: encode_date(&card.created_at),
            }
        })
        .collect();

    Ok(serde_json::to_string(&Envelope { json, meta })?)
}

/// Decodes persisted text back into a card collection.
///
/// # Errors
/// - `CodecError::Json` when the text is not a card document.
/// - `CodecError::MissingDateTag` / `InvalidDate` when a date lost its type.
pub fn decode(text: &str) -> CodecResult<Vec<Card>> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let meta = envelope.meta;

    envelope
        .json
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let path = created_at_path(position);
            if !meta.is_date(&path) {
                return Err(CodecError::MissingDateTag { path });
            }
            let created_at = decode_date(&record.created_at)
                .ok_or_else(|| CodecError::InvalidDate {
                    path,
                    value: record.created_at.clone(),
                })?;
            Ok(Card {
                id: CardId::from(record.id),
                name: record.name,
                entries: record.data,
                created_at,
            })
        })
        .collect()
}

fn created_at_path(position: usize) -> String {
    format!("{position}.{CREATED_AT_FIELD}")
}

fn encode_date(value: &DateTime<Local>) -> String {
    value
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn decode_date(value: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Local))
}
