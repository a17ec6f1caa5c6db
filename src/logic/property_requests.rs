use serde::Serialize;

use crate::error::ApiError;
use crate::logic::fields::{
    ensure_company, nullable_string, optional_id, optional_string, required_string, timestamp,
    Body,
};
use crate::model::Id;

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub requested_company_id: Option<Id>,
    pub name: String,
    pub property_type: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Upstream create payload; `description` is always present, `null` when not given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProperty {
    pub company_id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub updated_at: String,
}

pub fn parse_new_property(body: &Body, now: &str) -> Result<PropertyDraft, ApiError> {
    Ok(PropertyDraft {
        requested_company_id: optional_id(body, "company_id")?,
        name: required_string(body, "name")?,
        property_type: required_string(body, "type")?,
        description: nullable_string(body, "description")?.flatten(),
        created_at: timestamp(body, "created_at", now)?,
        updated_at: timestamp(body, "updated_at", now)?,
    })
}

impl PropertyDraft {
    pub fn into_payload(self, company_id: Id) -> Result<NewProperty, ApiError> {
        ensure_company(self.requested_company_id, company_id)?;
        Ok(NewProperty {
            company_id,
            name: self.name,
            property_type: self.property_type,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub fn parse_property_update(body: &Body, now: &str) -> Result<PropertyUpdate, ApiError> {
    let update = PropertyUpdate {
        name: optional_string(body, "name")?,
        property_type: optional_string(body, "type")?,
        description: nullable_string(body, "description")?,
        updated_at: timestamp(body, "updated_at", now)?,
    };
    if update.name.is_none() && update.property_type.is_none() && update.description.is_none() {
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
    fn test_omitted_description_is_sent_as_null() {
        let body = parse_body(br#"{"name": "x", "type": "string"}"#).unwrap();
        let payload = parse_new_property(&body, NOW).unwrap().into_payload(3).unwrap();
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "company_id": 3,
                "name": "x",
                "type": "string",
                "description": null,
                "created_at": NOW,
                "updated_at": NOW
            })
        );
    }

    #[test]
    fn test_required_fields() {
        let body = parse_body(br#"{"name": "", "type": "string"}"#).unwrap();
        assert_eq!(parse_new_property(&body, NOW).unwrap_err().code, "NAME_REQUIRED");

        let body = parse_body(br#"{"name": "x"}"#).unwrap();
        assert_eq!(parse_new_property(&body, NOW).unwrap_err().code, "TYPE_REQUIRED");
    }

    #[test]
    fn test_property_update() {
        let body = parse_body(br#"{"description": null}"#).unwrap();
        assert_eq!(
            serde_json::to_value(parse_property_update(&body, NOW).unwrap()).unwrap(),
            json!({"description": null, "updated_at": NOW})
        );

        let body = parse_body(br#"{"type": "number"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(parse_property_update(&body, NOW).unwrap()).unwrap(),
            json!({"type": "number", "updated_at": NOW})
        );

        let body = parse_body(br#"{"company_id": 1}"#).unwrap();
        assert_eq!(
            parse_property_update(&body, NOW).unwrap_err().code,
            "NO_UPDATABLE_FIELDS"
        );
    }
}
