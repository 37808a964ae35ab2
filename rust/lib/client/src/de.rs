//! Lenient decoders for fields the backend is inconsistent about.
//!
//! Ids arrive as strings or integers; aggregate counts sometimes arrive as
//! numeric strings (`"12"`). Counts are clamped into `u32`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let n = match Value::deserialize(d)? {
        Value::Null => 0,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("expected count, got {s:?}")))?,
        other => return Err(serde::de::Error::custom(format!("expected count, got {other}"))),
    };
    Ok(n.clamp(0, u32::MAX as i64) as u32)
}
