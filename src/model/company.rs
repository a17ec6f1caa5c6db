use serde::{Deserialize, Serialize};

use crate::model::{deserialize_flexible_id, Id};

/// Upstream company record. Older upstream versions key it as `company_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub company_id: Option<Id>,
    #[serde(default)]
    pub unique_identifier: Option<String>,
}

impl Company {
    pub fn resolved_id(&self) -> Option<Id> {
        self.id.or(self.company_id)
    }
}
