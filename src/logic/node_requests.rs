use serde::Serialize;

use crate::error::ApiError;
use crate::logic::fields::{ensure_company, optional_id, optional_string, required_string, timestamp, Body};
use crate::model::Id;

/// Validated `POST /nodes` body, before the company is known.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub requested_company_id: Option<Id>,
    pub prompt: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNode {
    pub company_id: Id,
    pub prompt: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub updated_at: String,
}

pub fn parse_new_node(body: &Body, now: &str) -> Result<NodeDraft, ApiError> {
    Ok(NodeDraft {
        requested_company_id: optional_id(body, "company_id")?,
        prompt: required_string(body, "prompt")?,
        created_at: timestamp(body, "created_at", now)?,
        updated_at: timestamp(body, "updated_at", now)?,
    })
}

impl NodeDraft {
    pub fn into_payload(self, company_id: Id) -> Result<NewNode, ApiError> {
        ensure_company(self.requested_company_id, company_id)?;
        Ok(NewNode {
            company_id,
            prompt: self.prompt,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub fn parse_node_update(body: &Body, now: &str) -> Result<NodeUpdate, ApiError> {
    let prompt = optional_string(body, "prompt")?;
    if prompt.is_none() {
        return Err(ApiError::bad_request("NO_UPDATABLE_FIELDS"));
    }
    Ok(NodeUpdate {
        prompt,
        updated_at: timestamp(body, "updated_at", now)?,
    })
}
