use serde::{Deserialize, Serialize};

use crate::model::{deserialize_flexible_id, Id};

/// A conversation node as returned by the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub company_id: Option<Id>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
