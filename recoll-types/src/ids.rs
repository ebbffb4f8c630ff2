//! Record identifiers.
//!
//! Remote APIs hand out either numeric or string ids, so [`RecordId`] keeps
//! both shapes and compares loosely against raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a remote record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Reads an id out of a JSON value.
    ///
    /// Integral numbers are accepted in any JSON encoding (`1`, `1.0`).
    /// Unsigned ids beyond `i64::MAX` are kept as their decimal text.
    /// Returns `None` for `null`, empty strings, fractional numbers, and
    /// anything that is neither a number nor a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Number(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::Text(u.to_string()))
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0)
                        .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                        .map(|f| Self::Number(f as i64))
                }
            }
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Converts back into the JSON representation stored in a record.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }

    /// Compares against a raw JSON value, treating `1`, `1.0` and `"1"` as equal.
    pub fn loosely_equals(&self, value: &Value) -> bool {
        let other = match value {
            Value::String(s) => s.as_str().into(),
            Value::Number(_) => match Self::from_value(value) {
                Some(id) => id,
                None => return false,
            },
            _ => return false,
        };
        self.canonical() == other.canonical()
    }

    /// Numeric-looking text collapses onto the number it spells.
    fn canonical(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n.to_string(),
                Err(_) => s.clone(),
            },
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for RecordId {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
