//! Lenient field access over loosely-shaped backend JSON.
//!
//! The backend emits optional fields under more than one key name and is not
//! consistent about numbers vs numeric strings. Each accessor takes the
//! candidate keys in fallback order and returns the first usable value.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use fleetdesk_core::format::parse_timestamp;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>) -> Self {
        Self(map)
    }

    fn first(&self, keys: &[&str]) -> impl Iterator<Item = &'a Value> {
        let map: &'a Map<String, Value> = self.0;
        keys.iter()
            .filter_map(move |k| map.get(*k))
            .filter(|v| !v.is_null())
    }

    /// Non-empty (after trim) string. Numbers are stringified.
    pub(crate) fn string(&self, keys: &[&str]) -> Option<String> {
        self.first(keys).find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Finite number, accepting numeric strings (`"12,345"` included).
    pub(crate) fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys).find_map(as_number)
    }

    pub(crate) fn integer(&self, keys: &[&str]) -> Option<i64> {
        self.number(keys)
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }

    /// Boolean, accepting `0/1` and `"true"/"false"`.
    pub(crate) fn boolean(&self, keys: &[&str]) -> Option<bool> {
        self.first(keys).find_map(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|i| i != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    pub(crate) fn timestamp(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        self.first(keys).find_map(|v| v.as_str().and_then(parse_timestamp))
    }

    pub(crate) fn array(&self, keys: &[&str]) -> Option<&'a Vec<Value>> {
        self.first(keys).find_map(Value::as_array)
    }
}

pub(crate) fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    n.filter(|n| n.is_finite())
}
