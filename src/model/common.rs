use chrono::SecondsFormat;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Upstream primary keys are positive integers.
pub type Id = i64;

/// Coerce a JSON value into a positive integer id.
///
/// Accepts integral numbers and strings holding an integer, which is how the
/// upstream service sometimes encodes keys.
pub fn id_from_value(value: &Value) -> Option<Id> {
    let id = match value {
        Value::Number(number) => match number.as_i64() {
            Some(id) => Some(id),
            None => number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64),
        },
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
}

/// Serde helper for id fields that may be numeric, string-encoded, null or garbage.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

/// Current time as an ISO 8601 UTC string with millisecond precision.
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
