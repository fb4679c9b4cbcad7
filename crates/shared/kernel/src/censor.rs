//! Field-removing projection of serializable records.
//!
//! [`censor`] turns a record into a detached JSON object without one named field. The source
//! record is never touched, so callers can hand the projection out while keeping the original.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

#[sbox_derive::sbox_error]
pub enum CensorError {
    #[error("Serialization failed{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Record is not an object{}: {message}", format_context(.context))]
    NotAnObject { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A shallow copy of a record with one field removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Censored(Map<String, Value>);

impl Censored {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Returns a copy of `record` without `field`.
///
/// A field the record does not have leaves the copy identical to the record.
///
/// # Errors
/// * [`CensorError::Serialize`] if the record cannot be serialized.
/// * [`CensorError::NotAnObject`] if the record does not serialize to a JSON object.
pub fn censor<T>(record: &T, field: &str) -> Result<Censored, CensorError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(record).context("Censoring record")? {
        Value::Object(mut map) => {
            map.remove(field);
            Ok(Censored(map))
        },
        other => Err(CensorError::NotAnObject {
            message: kind_of(&other).into(),
            context: Some(format!("removing '{field}'").into()),
        }),
    }
}

/// Censors every record of a slice, preserving order.
///
/// # Errors
/// Fails on the first record [`censor`] rejects.
pub fn censor_all<T>(records: &[T], field: &str) -> Result<Vec<Censored>, CensorError>
where
    T: Serialize,
{
    records.iter().map(|record| censor(record, field)).collect()
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
