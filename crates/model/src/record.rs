use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const YEAR: &str = "year";
pub const TITLE: &str = "title";
pub const ID: &str = "id";

const DEFAULT_YEAR: &str = "2012";
const DEFAULT_TITLE: &str = "The Amazing Spider-Man 2";

/// A single row written to the table, keyed by `id`.
///
/// `year` holds the exact text of a JSON number literal, written with the numeric attribute type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Record {
    pub year: String,
    pub title: String,
    pub id: String,
}

impl Record {
    /// Build a record from a caller supplied payload object.
    ///
    /// All three keys are looked up before any value is coerced, so a missing
    /// key is reported even when an earlier value could not be converted.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Record, RecordError> {
        let year: &Value = field(payload, YEAR)?;
        let title: &Value = field(payload, TITLE)?;
        let id: &Value = field(payload, ID)?;

        Ok(Record {
            year: coerce_number(YEAR, year)?,
            title: coerce_string(title),
            id: coerce_string(id),
        })
    }

    /// The record written when a request carries no body.
    /// A new id is generated on every call.
    pub fn default_movie() -> Record {
        Record {
            year: DEFAULT_YEAR.to_string(),
            title: DEFAULT_TITLE.to_string(),
            id: Uuid::new_v4().to_string(),
        }
    }
}

fn field<'a>(payload: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, RecordError> {
    payload.get(key).ok_or(RecordError::MissingField(key))
}

/// Numbers keep their literal text, strings must hold a JSON number literal.
/// Parsing relies on `arbitrary_precision`, so no digits are lost.
pub fn coerce_number(field: &'static str, value: &Value) -> Result<String, RecordError> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => serde_json::from_str::<Number>(text.trim())
            .map(|number| number.to_string())
            .map_err(|err| RecordError::Coercion {
                field,
                reason: format!("{:?} is not a number: {}", text, err),
            }),
        other => Err(RecordError::Coercion {
            field,
            reason: format!("{} is not a number", other),
        }),
    }
}

/// Strings pass through unquoted, every other value becomes its compact JSON text.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Errors building a record from a payload.
#[derive(Debug)]
pub enum RecordError {
    // A required key was absent from the payload
    MissingField(&'static str),
    // The value could not be converted to the stored type
    Coercion { field: &'static str, reason: String },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::MissingField(field) => write!(f, "missing field '{}'", field),
            RecordError::Coercion { field, reason } => {
                write!(f, "cannot convert field '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for RecordError {}
