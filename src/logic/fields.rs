use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::model::{id_from_value, Id};

/// Inbound JSON object body.
pub type Body = Map<String, Value>;

/// Inbound query string, last value wins.
pub type QueryParams = HashMap<String, String>;

/// Parse a request body. An empty body is an empty object.
pub fn parse_body(bytes: &[u8]) -> Result<Body, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Body::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(body)) => Ok(body),
        Ok(_) => Err(ApiError::bad_request("INVALID_BODY")),
        Err(e) => Err(ApiError::bad_request("INVALID_JSON").with_details(e.to_string())),
    }
}

fn required_code(field: &str) -> String {
    format!("{}_REQUIRED", field.to_ascii_uppercase())
}

fn invalid_code(field: &str) -> String {
    format!("INVALID_{}", field.to_ascii_uppercase())
}

fn mismatch_code(field: &str) -> String {
    format!("{}_MISMATCH", field.to_ascii_uppercase())
}

fn present<'a>(body: &'a Body, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

/// Trimmed, non-empty string; blank counts as missing.
pub fn required_string(body: &Body, field: &str) -> Result<String, ApiError> {
    optional_string(body, field)?.ok_or_else(|| ApiError::bad_request(required_code(field)))
}

/// Like `required_string`, but an absent field is `None`.
pub fn optional_string(body: &Body, field: &str) -> Result<Option<String>, ApiError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Err(ApiError::bad_request(required_code(field)))
            } else {
                Ok(Some(text.to_string()))
            }
        }
        Some(Value::Null) => Err(ApiError::bad_request(required_code(field))),
        Some(_) => Err(ApiError::bad_request(invalid_code(field))),
    }
}

/// Optional text that may be cleared: absent → `None`, null or blank → `Some(None)`.
pub fn nullable_string(body: &Body, field: &str) -> Result<Option<Option<String>>, ApiError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(text)) => {
            let text = text.trim();
            Ok(Some((!text.is_empty()).then(|| text.to_string())))
        }
        Some(_) => Err(ApiError::bad_request(invalid_code(field))),
    }
}

pub fn parse_id(value: &Value, field: &str) -> Result<Id, ApiError> {
    id_from_value(value).ok_or_else(|| ApiError::bad_request(invalid_code(field)))
}

/// Positive integer id; missing or malformed is `INVALID_<FIELD>`.
pub fn required_id(body: &Body, field: &str) -> Result<Id, ApiError> {
    match present(body, field) {
        Some(value) => parse_id(value, field),
        None => Err(ApiError::bad_request(invalid_code(field))),
    }
}

pub fn optional_id(body: &Body, field: &str) -> Result<Option<Id>, ApiError> {
    present(body, field)
        .map(|value| parse_id(value, field))
        .transpose()
}

/// Id that may be cleared with an explicit null.
pub fn nullable_id(body: &Body, field: &str) -> Result<Option<Option<Id>>, ApiError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => parse_id(value, field).map(|id| Some(Some(id))),
    }
}

/// Any integer (not only positive), given as a number or a numeric string.
pub fn optional_integer(body: &Body, field: &str) -> Result<Option<i64>, ApiError> {
    let Some(value) = present(body, field) else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| ApiError::bad_request(invalid_code(field)))
}

/// Caller-supplied ISO timestamp, or `now` when absent or blank.
pub fn timestamp(body: &Body, field: &str, now: &str) -> Result<String, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(now.to_string()),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(now.to_string()),
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        Some(_) => Err(ApiError::bad_request(invalid_code(field))),
    }
}

/// A body copy of an id already fixed by the URL must agree with it.
pub fn ensure_matches(body: &Body, field: &str, expected: Id) -> Result<(), ApiError> {
    match optional_id(body, field)? {
        Some(id) if id != expected => Err(ApiError::bad_request(mismatch_code(field))),
        _ => Ok(()),
    }
}

/// Id from the query string; missing or malformed is `INVALID_<FIELD>`.
pub fn query_id(query: &QueryParams, field: &str) -> Result<Id, ApiError> {
    optional_query_id(query, field)?.ok_or_else(|| ApiError::bad_request(invalid_code(field)))
}

pub fn optional_query_id(query: &QueryParams, field: &str) -> Result<Option<Id>, ApiError> {
    match query.get(field).map(|raw| raw.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(&Value::String(raw.to_string()), field).map(Some),
    }
}

pub fn path_id(raw: &str, field: &str) -> Result<Id, ApiError> {
    parse_id(&Value::String(raw.to_string()), field)
}

/// A company id named by the caller must be the caller's own.
pub fn ensure_company(requested: Option<Id>, company_id: Id) -> Result<(), ApiError> {
    match requested {
        Some(requested) if requested != company_id => {
            Err(ApiError::forbidden("FORBIDDEN_COMPANY_ID"))
        }
        _ => Ok(()),
    }
}
