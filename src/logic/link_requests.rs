use serde::Serialize;

use crate::error::ApiError;
use crate::logic::condition_requests::ConditionScope;
use crate::logic::fields::{ensure_matches, optional_id, query_id, required_id, Body, QueryParams};
use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNodeProperty {
    pub node_id: Id,
    pub property_id: Id,
}

pub fn parse_new_node_property(body: &Body, node_id: Id) -> Result<NewNodeProperty, ApiError> {
    ensure_matches(body, "node_id", node_id)?;
    Ok(NewNodeProperty {
        node_id,
        property_id: required_id(body, "property_id")?,
    })
}

/// `?condition_id&edge_id&source_node_id`, the full path down to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionPropertyScope {
    pub condition: ConditionScope,
    pub condition_id: Id,
}

pub fn parse_condition_property_scope(
    query: &QueryParams,
) -> Result<ConditionPropertyScope, ApiError> {
    let condition_id = query_id(query, "condition_id")?;
    Ok(ConditionPropertyScope {
        condition: ConditionScope {
            edge_id: query_id(query, "edge_id")?,
            source_node_id: query_id(query, "source_node_id")?,
        },
        condition_id,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConditionProperty {
    pub condition_id: Id,
    pub property_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionPropertyUpdate {
    pub property_id: Id,
}

pub fn parse_new_condition_property(
    body: &Body,
    condition_id: Id,
) -> Result<NewConditionProperty, ApiError> {
    ensure_matches(body, "condition_id", condition_id)?;
    Ok(NewConditionProperty {
        condition_id,
        property_id: required_id(body, "property_id")?,
    })
}

/// Only the linked property can change; the condition is fixed by the URL.
pub fn parse_condition_property_update(
    body: &Body,
    condition_id: Id,
) -> Result<ConditionPropertyUpdate, ApiError> {
    ensure_matches(body, "condition_id", condition_id)?;
    let property_id =
        optional_id(body, "property_id")?.ok_or_else(|| ApiError::bad_request("NO_UPDATABLE_FIELDS"))?;
    Ok(ConditionPropertyUpdate { property_id })
}
