use serde::Serialize;

use crate::error::ApiError;
use crate::logic::fields::{
    ensure_matches, nullable_id, optional_id, optional_integer, optional_string,
    required_string, timestamp, Body,
};
use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEdge {
    pub source_node_id: Id,
    pub destination_node_id: Option<Id>,
    pub label: String,
    pub priority: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_node_id: Option<Option<Id>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    pub updated_at: String,
}

impl EdgeUpdate {
    /// Destination node that must be checked for ownership before the update.
    pub fn new_destination(&self) -> Option<Id> {
        self.destination_node_id.flatten()
    }
}

/// `source_node_id` may come from the body, the query string, or both (then equal).
pub fn parse_new_edge(
    body: &Body,
    query_source_node_id: Option<Id>,
    now: &str,
) -> Result<NewEdge, ApiError> {
    let source_node_id = match (optional_id(body, "source_node_id")?, query_source_node_id) {
        (Some(from_body), Some(from_query)) if from_body != from_query => {
            return Err(ApiError::bad_request("SOURCE_NODE_ID_MISMATCH"));
        }
        (Some(id), _) | (None, Some(id)) => id,
        (None, None) => return Err(ApiError::bad_request("INVALID_SOURCE_NODE_ID")),
    };

    Ok(NewEdge {
        source_node_id,
        destination_node_id: optional_id(body, "destination_node_id")?,
        label: required_string(body, "label")?,
        priority: optional_integer(body, "priority")?.unwrap_or(0),
        created_at: timestamp(body, "created_at", now)?,
        updated_at: timestamp(body, "updated_at", now)?,
    })
}

/// The source node is fixed by the URL; an edge cannot be moved to another source.
pub fn parse_edge_update(
    body: &Body,
    source_node_id: Id,
    edge_id: Id,
    now: &str,
) -> Result<EdgeUpdate, ApiError> {
    ensure_matches(body, "source_node_id", source_node_id)?;
    ensure_matches(body, "edge_id", edge_id)?;

    let update = EdgeUpdate {
        destination_node_id: nullable_id(body, "destination_node_id")?,
        label: optional_string(body, "label")?,
        priority: optional_integer(body, "priority")?,
        updated_at: timestamp(body, "updated_at", now)?,
    };
    if update.destination_node_id.is_none() && update.label.is_none() && update.priority.is_none() {
        return Err(ApiError::bad_request("NO_UPDATABLE_FIELDS"));
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fields::parse_body;
    use serde_json::json;

    const NOW: &str = "2026-10-15T12:00:00.000Z";

    #[test]
    fn test_new_edge_from_query_source() {
        let body = parse_body(br#"{"label": "yes", "destination_node_id": 8, "priority": 2}"#).unwrap();
        let edge = parse_new_edge(&body, Some(7), NOW).unwrap();
        assert_eq!(
            serde_json::to_value(edge).unwrap(),
            json!({
                "source_node_id": 7,
                "destination_node_id": 8,
                "label": "yes",
                "priority": 2,
                "created_at": NOW,
                "updated_at": NOW
            })
        );
    }

    #[test]
    fn test_new_edge_validation() {
        let body = parse_body(br#"{"label": "x"}"#).unwrap();
        assert_eq!(
            parse_new_edge(&body, None, NOW).unwrap_err().code,
            "INVALID_SOURCE_NODE_ID"
        );

        let body = parse_body(br#"{"label": "x", "source_node_id": 3}"#).unwrap();
        assert_eq!(
            parse_new_edge(&body, Some(4), NOW).unwrap_err().code,
            "SOURCE_NODE_ID_MISMATCH"
        );

        let body = parse_body(br#"{"source_node_id": 3}"#).unwrap();
        assert_eq!(parse_new_edge(&body, None, NOW).unwrap_err().code, "LABEL_REQUIRED");

        let body = parse_body(br#"{"source_node_id": 3, "label": "x", "priority": "high"}"#).unwrap();
        assert_eq!(parse_new_edge(&body, None, NOW).unwrap_err().code, "INVALID_PRIORITY");

        let body = parse_body(br#"{"source_node_id": 3, "label": "x", "destination_node_id": "abc"}"#).unwrap();
        assert_eq!(
            parse_new_edge(&body, None, NOW).unwrap_err().code,
            "INVALID_DESTINATION_NODE_ID"
        );
    }

    #[test]
    fn test_edge_update_only_sends_submitted_fields() {
        let body = parse_body(br#"{"destination_node_id": null}"#).unwrap();
        let update = parse_edge_update(&body, 1, 2, NOW).unwrap();
        assert_eq!(update.new_destination(), None);
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({"destination_node_id": null, "updated_at": NOW})
        );

        let body = parse_body(br#"{"label": "no"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(parse_edge_update(&body, 1, 2, NOW).unwrap()).unwrap(),
            json!({"label": "no", "updated_at": NOW})
        );
    }

    #[test]
    fn test_edge_update_rejects_moves_and_empty_bodies() {
        let body = parse_body(br#"{"source_node_id": 5, "label": "x"}"#).unwrap();
        assert_eq!(
            parse_edge_update(&body, 1, 2, NOW).unwrap_err().code,
            "SOURCE_NODE_ID_MISMATCH"
        );

        let body = parse_body(br#"{}"#).unwrap();
        assert_eq!(
            parse_edge_update(&body, 1, 2, NOW).unwrap_err().code,
            "NO_UPDATABLE_FIELDS"
        );
    }
}
