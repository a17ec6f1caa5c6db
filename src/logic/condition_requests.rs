use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::logic::fields::{
    ensure_matches, optional_string, query_id, required_string, timestamp, Body, QueryParams,
};
use crate::model::Id;

/// `?edge_id&source_node_id`, both required for any condition route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionScope {
    pub source_node_id: Id,
    pub edge_id: Id,
}

pub fn parse_condition_scope(query: &QueryParams) -> Result<ConditionScope, ApiError> {
    Ok(ConditionScope {
        edge_id: query_id(query, "edge_id")?,
        source_node_id: query_id(query, "source_node_id")?,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCondition {
    pub edge_id: Id,
    pub operator: String,
    pub compare_value: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_value: Option<String>,
    pub updated_at: String,
}

/// Compare values are text upstream; numbers and booleans are accepted and stringified.
fn compare_value(body: &Body) -> Result<Option<String>, ApiError> {
    match body.get("compare_value") {
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        _ => optional_string(body, "compare_value"),
    }
}

pub fn parse_new_condition(
    body: &Body,
    scope: ConditionScope,
    now: &str,
) -> Result<NewCondition, ApiError> {
    ensure_matches(body, "edge_id", scope.edge_id)?;

    let operator = required_string(body, "operator")?;
    let compare_value =
        compare_value(body)?.ok_or_else(|| ApiError::bad_request("COMPARE_VALUE_REQUIRED"))?;

    Ok(NewCondition {
        edge_id: scope.edge_id,
        operator,
        compare_value,
        created_at: timestamp(body, "created_at", now)?,
        updated_at: timestamp(body, "updated_at", now)?,
    })
}

/// Ids repeated in the body must name the condition and edge from the URL.
pub fn parse_condition_update(
    body: &Body,
    condition_id: Id,
    scope: ConditionScope,
    now: &str,
) -> Result<ConditionUpdate, ApiError> {
    ensure_matches(body, "condition_id", condition_id)?;
    ensure_matches(body, "edge_id", scope.edge_id)?;

    let update = ConditionUpdate {
        operator: optional_string(body, "operator")?,
        compare_value: compare_value(body)?,
        updated_at: timestamp(body, "updated_at", now)?,
    };
    if update.operator.is_none() && update.compare_value.is_none() {
        return Err(ApiError::bad_request("NO_UPDATABLE_FIELDS"));
    }
    Ok(update)
}
